//! Stencil-based selection outline
//!
//! The fill pass draws the solid model while stamping the stencil buffer.
//! The silhouette pass redraws it as thick lines (or points) with culling
//! and lighting off, masked to pixels the fill pass did not touch, which
//! leaves only the rim around the model visible.

use serde::{Deserialize, Serialize};

use crate::foundation::math::Colour;
use crate::render::{
    Capabilities, ClearBuffers, GraphicsContext, Model, ModelRenderer, MonoColourRenderer,
    PolygonMode, RenderResult, Renderer, RendererScope, RenderState, StencilAlwaysRenderer,
    StencilNotEqualRenderer,
};

/// How the silhouette pass rasterizes the model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutlineStyle {
    /// `Line` or `Point`; `Fill` would cover the whole stencil hole
    pub mode: PolygonMode,
    /// Line width or point size
    pub width: f32,
}

impl Default for OutlineStyle {
    fn default() -> Self {
        Self {
            mode: PolygonMode::Line,
            width: 3.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct SwappedState {
    cull_face: bool,
    lighting: bool,
    polygon_mode: PolygonMode,
    line_width: f32,
    point_size: f32,
}

impl SwappedState {
    fn swap(state: &mut RenderState, style: OutlineStyle) -> Self {
        let saved = Self {
            cull_face: state.is_enabled(Capabilities::CULL_FACE),
            lighting: state.is_enabled(Capabilities::LIGHTING),
            polygon_mode: state.polygon_mode,
            line_width: state.line_width,
            point_size: state.point_size,
        };
        state.disable(Capabilities::CULL_FACE);
        state.disable(Capabilities::LIGHTING);
        state.polygon_mode = style.mode;
        match style.mode {
            PolygonMode::Point => state.point_size = style.width,
            PolygonMode::Line | PolygonMode::Fill => state.line_width = style.width,
        }
        saved
    }

    fn restore(self, state: &mut RenderState) {
        state.point_size = self.point_size;
        state.line_width = self.line_width;
        state.polygon_mode = self.polygon_mode;
        state.set_enabled(Capabilities::LIGHTING, self.lighting);
        state.set_enabled(Capabilities::CULL_FACE, self.cull_face);
    }
}

/// Composite renderer drawing a fill pass and a masked silhouette pass
#[derive(Debug)]
pub struct OutlineRenderer<F, S> {
    fill: F,
    silhouette: S,
    style: OutlineStyle,
}

/// Outline chain built from the stock decorators
pub type StandardOutlineRenderer = OutlineRenderer<
    StencilAlwaysRenderer<ModelRenderer>,
    StencilNotEqualRenderer<MonoColourRenderer<ModelRenderer>>,
>;

impl<F: Renderer, S: Renderer> OutlineRenderer<F, S> {
    /// Compose an outline from a fill pass and a silhouette pass
    pub fn new(fill: F, silhouette: S, style: OutlineStyle) -> Self {
        Self { fill, silhouette, style }
    }

    /// Silhouette rasterization settings
    pub fn style(&self) -> OutlineStyle {
        self.style
    }
}

impl StandardOutlineRenderer {
    /// Stock outline: stamp `reference`, then draw `colour` where it is absent
    pub fn standard(colour: Colour, reference: u8, style: OutlineStyle) -> Self {
        Self::new(
            StencilAlwaysRenderer::new(ModelRenderer::new(), reference),
            StencilNotEqualRenderer::new(
                MonoColourRenderer::new(ModelRenderer::new(), colour),
                reference,
            ),
            style,
        )
    }
}

impl<F: Renderer, S: Renderer> Renderer for OutlineRenderer<F, S> {
    fn init(&mut self, ctx: &mut dyn GraphicsContext) {
        ctx.clear(ClearBuffers::STENCIL);
    }

    fn render_model(&mut self, ctx: &mut dyn GraphicsContext, model: &Model) -> RenderResult<()> {
        {
            let mut fill = RendererScope::begin(&mut self.fill, &mut *ctx);
            fill.render_model(model)?;
        }

        let swapped = SwappedState::swap(ctx.state_mut(), self.style);
        let result = {
            let mut silhouette = RendererScope::begin(&mut self.silhouette, &mut *ctx);
            silhouette.render_model(model)
        };
        swapped.restore(ctx.state_mut());
        result
    }

    fn dispose(&mut self, _ctx: &mut dyn GraphicsContext) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::recording::RecordedCommand;
    use crate::render::renderer::tests::JournalRenderer;
    use crate::render::{RecordingContext, StencilFunction};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_outline_two_passes() {
        let mut ctx = RecordingContext::new();
        let before = ctx.state().clone();
        let mut outline = OutlineRenderer::standard(Colour::SELECTION, 1, OutlineStyle::default());
        let model = Model::cube("selected", 1.0, Colour::WHITE);

        {
            let mut scope = RendererScope::begin(&mut outline, &mut ctx);
            scope.render_model(&model).unwrap();
        }

        assert_eq!(ctx.commands()[0], RecordedCommand::Clear(ClearBuffers::STENCIL));
        let draws: Vec<_> = ctx.draws().collect();
        assert_eq!(draws.len(), 2);

        let fill = draws[0];
        assert_eq!(fill.colour, Colour::WHITE);
        assert_eq!(fill.polygon_mode, PolygonMode::Fill);
        assert_eq!(fill.stencil_func.function, StencilFunction::Always);
        assert!(fill.capabilities.contains(Capabilities::LIGHTING));

        let rim = draws[1];
        assert_eq!(rim.colour, Colour::SELECTION);
        assert_eq!(rim.polygon_mode, PolygonMode::Line);
        assert_eq!(rim.line_width, 3.0);
        assert_eq!(rim.stencil_func.function, StencilFunction::NotEqual);
        assert!(!rim.capabilities.contains(Capabilities::CULL_FACE));
        assert!(!rim.capabilities.contains(Capabilities::LIGHTING));

        assert_eq!(*ctx.state(), before);
    }

    #[test]
    fn test_point_style_sets_point_size() {
        let mut ctx = RecordingContext::new();
        let style = OutlineStyle { mode: PolygonMode::Point, width: 5.0 };
        let mut outline = OutlineRenderer::standard(Colour::BLACK, 1, style);
        let model = Model::cube("m", 1.0, Colour::WHITE);

        outline.init(&mut ctx);
        outline.render_model(&mut ctx, &model).unwrap();
        outline.dispose(&mut ctx);

        let rim = ctx.draws().nth(1).unwrap();
        assert_eq!(rim.polygon_mode, PolygonMode::Point);
        assert_eq!(ctx.state().point_size, 1.0);
        assert_eq!(ctx.state().line_width, 1.0);
    }

    #[test]
    fn test_sub_renderers_are_fully_nested() {
        let journal = Rc::new(RefCell::new(Vec::new()));
        let mut outline = OutlineRenderer::new(
            JournalRenderer::new("fill", &journal),
            JournalRenderer::new("silhouette", &journal),
            OutlineStyle::default(),
        );
        let mut ctx = RecordingContext::new();
        let model = Model::cube("m", 1.0, Colour::WHITE);

        outline.render_model(&mut ctx, &model).unwrap();

        assert_eq!(
            *journal.borrow(),
            vec![
                "fill.init",
                "fill.render",
                "fill.dispose",
                "silhouette.init",
                "silhouette.render",
                "silhouette.dispose",
            ]
        );
    }

    #[test]
    fn test_failed_fill_skips_silhouette() {
        let journal = Rc::new(RefCell::new(Vec::new()));
        let mut fill = JournalRenderer::new("fill", &journal);
        fill.fail = true;
        let silhouette = JournalRenderer::new("silhouette", &journal);
        let mut outline = OutlineRenderer::new(fill, silhouette, OutlineStyle::default());
        let mut ctx = RecordingContext::new();
        let before = ctx.state().clone();
        let model = Model::cube("m", 1.0, Colour::WHITE);

        assert!(outline.render_model(&mut ctx, &model).is_err());
        assert_eq!(*journal.borrow(), vec!["fill.init", "fill.render", "fill.dispose"]);
        assert_eq!(*ctx.state(), before);
    }
}
