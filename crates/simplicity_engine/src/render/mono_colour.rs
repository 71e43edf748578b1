//! Single-colour decorator

use crate::foundation::math::Colour;
use crate::render::{Capabilities, GraphicsContext, Model, RenderResult, Renderer};

#[derive(Debug, Clone, Copy)]
struct SavedState {
    colour_override: Option<Colour>,
    lighting: bool,
}

/// Draws every model in one flat colour with lighting disabled
#[derive(Debug)]
pub struct MonoColourRenderer<R> {
    inner: R,
    colour: Colour,
    saved: Option<SavedState>,
}

impl<R: Renderer> MonoColourRenderer<R> {
    /// Wrap `inner`, forcing `colour`
    pub fn new(inner: R, colour: Colour) -> Self {
        Self { inner, colour, saved: None }
    }

    /// Colour applied to every model
    pub fn colour(&self) -> Colour {
        self.colour
    }

    /// Change the colour; takes effect at the next `init`
    pub fn set_colour(&mut self, colour: Colour) {
        self.colour = colour;
    }
}

impl<R: Renderer> Renderer for MonoColourRenderer<R> {
    fn init(&mut self, ctx: &mut dyn GraphicsContext) {
        self.inner.init(ctx);

        let state = ctx.state_mut();
        self.saved = Some(SavedState {
            colour_override: state.colour_override,
            lighting: state.is_enabled(Capabilities::LIGHTING),
        });
        state.colour_override = Some(self.colour);
        state.disable(Capabilities::LIGHTING);
    }

    fn render_model(&mut self, ctx: &mut dyn GraphicsContext, model: &Model) -> RenderResult<()> {
        self.inner.render_model(ctx, model)
    }

    fn dispose(&mut self, ctx: &mut dyn GraphicsContext) {
        if let Some(saved) = self.saved.take() {
            let state = ctx.state_mut();
            state.colour_override = saved.colour_override;
            state.set_enabled(Capabilities::LIGHTING, saved.lighting);
        }

        self.inner.dispose(ctx);
    }
}
