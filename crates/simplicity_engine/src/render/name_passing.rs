//! Name-stack decorator for picking
//!
//! Tags every draw with the name of the node being rendered so a selection
//! context can report which node produced a hit.

use crate::render::{GraphicsContext, Model, RenderResult, Renderer};

/// Loads the current name onto the name stack before each draw
#[derive(Debug)]
pub struct NamePassingRenderer<R> {
    inner: R,
    name: u32,
    pushed: bool,
}

impl<R: Renderer> NamePassingRenderer<R> {
    /// Wrap `inner`
    pub fn new(inner: R) -> Self {
        Self { inner, name: 0, pushed: false }
    }

    /// Name attached to subsequent draws
    pub fn set_name(&mut self, name: u32) {
        self.name = name;
    }

    /// Current name
    pub fn name(&self) -> u32 {
        self.name
    }
}

impl<R: Renderer> Renderer for NamePassingRenderer<R> {
    fn init(&mut self, ctx: &mut dyn GraphicsContext) {
        self.inner.init(ctx);
        ctx.state_mut().push_name(0);
        self.pushed = true;
    }

    fn render_model(&mut self, ctx: &mut dyn GraphicsContext, model: &Model) -> RenderResult<()> {
        ctx.state_mut().load_name(self.name)?;
        self.inner.render_model(ctx, model)
    }

    fn dispose(&mut self, ctx: &mut dyn GraphicsContext) {
        if std::mem::take(&mut self.pushed) {
            if let Err(e) = ctx.state_mut().pop_name() {
                log::error!("name stack unbalanced while disposing name pass: {e}");
            }
        }
        self.inner.dispose(ctx);
    }
}
