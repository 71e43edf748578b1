//! Ray picking through the renderer chain
//!
//! Picking reuses the same traversal and renderer plumbing as drawing. The
//! scene is "rendered" into a [`PickingContext`], which instead of
//! rasterizing tests each model's bounds against a world-space ray and
//! records a hit with a copy of the name stack, the way a selection buffer
//! does. A [`NamePassingRenderer`] loads each node's ID as the current name.

use crate::core::config::PickingConfig;
use crate::foundation::math::Ray;
use crate::render::{
    walk_scene, ClearBuffers, GraphicsContext, Model, ModelRenderer, NamePassingRenderer,
    RenderResult, RenderState, Renderer, RendererScope,
};
use crate::scene::{NodeId, NodeKey, SceneGraph, Traversal};

/// One selection record
#[derive(Debug, Clone, PartialEq)]
pub struct PickHit {
    /// Name stack at the time of the draw, bottom first
    pub names: Vec<u32>,
    /// Distance along the pick ray
    pub depth: f32,
}

/// Graphics context that collects ray hits instead of drawing
#[derive(Debug)]
pub struct PickingContext {
    state: RenderState,
    ray: Ray,
    hits: Vec<PickHit>,
    max_hits: usize,
    overflowed: bool,
}

impl PickingContext {
    /// Context testing against `ray` (world space), keeping at most `max_hits` records
    pub fn new(ray: Ray, max_hits: usize) -> Self {
        Self {
            state: RenderState::new(),
            ray,
            hits: Vec::new(),
            max_hits,
            overflowed: false,
        }
    }

    /// Records in draw order
    pub fn hits(&self) -> &[PickHit] {
        &self.hits
    }

    /// Whether hits were dropped because the buffer was full
    pub fn overflowed(&self) -> bool {
        self.overflowed
    }

    /// Closest record along the ray; the earlier one wins ties
    pub fn nearest_hit(&self) -> Option<&PickHit> {
        self.hits
            .iter()
            .reduce(|best, hit| if hit.depth < best.depth { hit } else { best })
    }
}

impl GraphicsContext for PickingContext {
    fn state(&self) -> &RenderState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut RenderState {
        &mut self.state
    }

    fn draw_model(&mut self, model: &Model) -> RenderResult<()> {
        let Some(inverse) = self.state.current_matrix().try_inverse() else {
            log::warn!("skipping '{}' while picking: model matrix is singular", model.name());
            return Ok(());
        };

        // The direction is not renormalized, so the local hit parameter is
        // also the world-space distance.
        let local_ray = self.ray.transformed(&inverse);
        let Some(depth) = model.bounds().intersect_ray(&local_ray) else {
            return Ok(());
        };

        if self.hits.len() >= self.max_hits {
            if !self.overflowed {
                log::warn!("pick buffer full ({} hits), dropping further hits", self.max_hits);
            }
            self.overflowed = true;
            return Ok(());
        }

        self.hits.push(PickHit {
            names: self.state.names().to_vec(),
            depth,
        });
        Ok(())
    }

    fn clear(&mut self, _buffers: ClearBuffers) {}
}

/// Resolves a pick ray to the nearest node with a model
#[derive(Debug)]
pub struct Picker {
    renderer: NamePassingRenderer<ModelRenderer>,
    config: PickingConfig,
}

impl Default for Picker {
    fn default() -> Self {
        Self::new(PickingConfig::default())
    }
}

impl Picker {
    /// Create a picker
    pub fn new(config: PickingConfig) -> Self {
        Self {
            renderer: NamePassingRenderer::new(ModelRenderer::new()),
            config,
        }
    }

    /// Nearest node hit by `ray`, if any
    pub fn pick(&mut self, graph: &SceneGraph, ray: Ray) -> RenderResult<Option<NodeKey>> {
        let mut ctx = PickingContext::new(ray, self.config.max_hits);
        let mut traversal = Traversal::new(graph, graph.root());

        {
            let mut scope = RendererScope::begin(&mut self.renderer, &mut ctx);
            let (renderer, ctx) = scope.split();
            walk_scene(&mut traversal, ctx, |ctx, _, node| {
                let (Some(model), Some(id)) = (node.model(), node.id()) else {
                    return Ok(());
                };
                renderer.set_name(id.0);
                renderer.render_model(ctx, model)
            })?;
        }

        let picked = ctx
            .nearest_hit()
            .and_then(|hit| hit.names.last().copied())
            .and_then(|name| graph.get_node(NodeId(name)));
        log::debug!("pick: {} hits, picked {:?}", ctx.hits().len(), picked);
        Ok(picked)
    }
}
