//! Traversal-driven frame rendering
//!
//! Walks the scene graph with [`Traversal`], keeps the model-view matrix
//! stack in step with the tree using the backtrack count, and hands every
//! model to the renderer chain. Unselected models go through the plain
//! renderer; selected models go through the outline renderer in a second
//! pass so the silhouette is drawn over the finished scene.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::core::config::RenderConfig;
use crate::foundation::math::Mat4;
use crate::render::{
    ClearBuffers, GraphicsContext, ModelRenderer, OutlineRenderer, PolygonMode, RenderResult,
    Renderer, RendererScope,
};
use crate::scene::{Node, NodeKey, SceneGraph, Traversal};

/// How models are rasterized for a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DrawingMode {
    /// Filled polygons
    #[default]
    Solid,
    /// Edges only
    Wireframe,
    /// Vertices only
    Points,
}

impl DrawingMode {
    /// Polygon mode applied for the frame
    pub fn polygon_mode(self) -> PolygonMode {
        match self {
            DrawingMode::Solid => PolygonMode::Fill,
            DrawingMode::Wireframe => PolygonMode::Line,
            DrawingMode::Points => PolygonMode::Point,
        }
    }
}

/// Counters gathered while rendering a frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Nodes visited by the plain pass
    pub nodes_visited: usize,
    /// Models drawn by the plain renderer
    pub models_drawn: usize,
    /// Models drawn by the outline renderer
    pub models_outlined: usize,
}

/// Walk the subtree of `traversal` from its start, applying each node's
/// transform on the context matrix stack before calling `visit`.
///
/// The traversal is reset first. The matrix stack is left exactly as deep
/// as it was on entry, also when `visit` fails.
pub fn walk_scene<F>(
    traversal: &mut Traversal<'_>,
    ctx: &mut dyn GraphicsContext,
    mut visit: F,
) -> RenderResult<()>
where
    F: FnMut(&mut dyn GraphicsContext, NodeKey, &Node) -> RenderResult<()>,
{
    traversal.reset();
    let graph = traversal.graph();
    let base_depth = ctx.state().matrix_depth();

    while let Some(key) = traversal.get_next_node() {
        let Some(node) = graph.node(key) else {
            continue;
        };

        let state = ctx.state_mut();
        state.push_matrix();
        state.mult_matrix(node.transform());

        if let Err(e) = visit(&mut *ctx, key, node) {
            ctx.state_mut().truncate_matrices(base_depth);
            return Err(e);
        }

        for _ in 0..traversal.backtracks_to_next_node() {
            ctx.state_mut().pop_matrix()?;
        }
    }

    debug_assert_eq!(ctx.state().matrix_depth(), base_depth);
    Ok(())
}

/// Renders a scene graph through a plain and an outline renderer
pub struct SceneRenderer {
    plain: Box<dyn Renderer>,
    outline: Box<dyn Renderer>,
    drawing_mode: DrawingMode,
}

impl SceneRenderer {
    /// Create from explicit renderer chains
    pub fn new(plain: Box<dyn Renderer>, outline: Box<dyn Renderer>) -> Self {
        Self {
            plain,
            outline,
            drawing_mode: DrawingMode::default(),
        }
    }

    /// Stock chains configured from `config`
    pub fn from_config(config: &RenderConfig) -> Self {
        let outline = OutlineRenderer::standard(
            config.outline_colour,
            config.stencil_reference,
            config.outline_style,
        );
        let mut renderer = Self::new(Box::new(ModelRenderer::new()), Box::new(outline));
        renderer.drawing_mode = config.drawing_mode;
        renderer
    }

    /// Current drawing mode
    pub fn drawing_mode(&self) -> DrawingMode {
        self.drawing_mode
    }

    /// Change the drawing mode for subsequent frames
    pub fn set_drawing_mode(&mut self, mode: DrawingMode) {
        self.drawing_mode = mode;
    }

    /// Render one frame of `graph` as seen through `view` and `projection`.
    ///
    /// Projection, polygon mode and the matrix stack are restored before
    /// returning.
    pub fn render(
        &mut self,
        graph: &SceneGraph,
        view: &Mat4,
        projection: &Mat4,
        selection: &HashSet<NodeKey>,
        ctx: &mut dyn GraphicsContext,
    ) -> RenderResult<FrameStats> {
        ctx.clear(ClearBuffers::all());

        let state = ctx.state_mut();
        let saved_projection = state.projection;
        let saved_polygon_mode = state.polygon_mode;
        state.projection = *projection;
        state.polygon_mode = self.drawing_mode.polygon_mode();
        state.push_matrix();
        state.load_matrix(*view);

        let result = self.draw_passes(graph, selection, &mut *ctx);

        let state = ctx.state_mut();
        let popped = state.pop_matrix();
        state.polygon_mode = saved_polygon_mode;
        state.projection = saved_projection;

        let stats = result?;
        popped?;
        log::trace!(
            "frame: {} nodes, {} drawn, {} outlined",
            stats.nodes_visited,
            stats.models_drawn,
            stats.models_outlined
        );
        Ok(stats)
    }

    fn draw_passes(
        &mut self,
        graph: &SceneGraph,
        selection: &HashSet<NodeKey>,
        ctx: &mut dyn GraphicsContext,
    ) -> RenderResult<FrameStats> {
        let mut stats = FrameStats::default();
        let mut traversal = Traversal::new(graph, graph.root());

        {
            let mut scope = RendererScope::begin(self.plain.as_mut(), &mut *ctx);
            let (renderer, ctx) = scope.split();
            walk_scene(&mut traversal, ctx, |ctx, key, node| {
                stats.nodes_visited += 1;
                match node.model() {
                    Some(model) if !selection.contains(&key) => {
                        stats.models_drawn += 1;
                        renderer.render_model(ctx, model)
                    }
                    _ => Ok(()),
                }
            })?;
        }

        let any_selected = selection
            .iter()
            .any(|&key| graph.is_attached(key) && graph.node(key).and_then(Node::model).is_some());
        if any_selected {
            let mut scope = RendererScope::begin(self.outline.as_mut(), &mut *ctx);
            let (renderer, ctx) = scope.split();
            walk_scene(&mut traversal, ctx, |ctx, key, node| match node.model() {
                Some(model) if selection.contains(&key) => {
                    stats.models_outlined += 1;
                    renderer.render_model(ctx, model)
                }
                _ => Ok(()),
            })?;
        }

        Ok(stats)
    }
}

impl std::fmt::Debug for SceneRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneRenderer")
            .field("drawing_mode", &self.drawing_mode)
            .finish_non_exhaustive()
    }
}
