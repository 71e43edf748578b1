//! Renderer capability interface and scoped acquisition
//!
//! A renderer configures shared context state in `init`, draws models with
//! `render_model`, and restores exactly what it changed in `dispose`.
//! Decorators wrap another renderer and forward to it explicitly: `init`
//! runs the wrapped renderer first, `dispose` runs it last, so state is
//! unwound in LIFO order.

use crate::render::{GraphicsContext, Model, RenderResult};

/// A stage in the renderer chain
pub trait Renderer {
    /// Acquire and configure shared rendering state
    fn init(&mut self, ctx: &mut dyn GraphicsContext);

    /// Draw a model using the state configured by `init`
    fn render_model(&mut self, ctx: &mut dyn GraphicsContext, model: &Model) -> RenderResult<()>;

    /// Restore the state changed by `init`
    fn dispose(&mut self, ctx: &mut dyn GraphicsContext);
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn init(&mut self, ctx: &mut dyn GraphicsContext) {
        (**self).init(ctx);
    }

    fn render_model(&mut self, ctx: &mut dyn GraphicsContext, model: &Model) -> RenderResult<()> {
        (**self).render_model(ctx, model)
    }

    fn dispose(&mut self, ctx: &mut dyn GraphicsContext) {
        (**self).dispose(ctx);
    }
}

/// Block-scoped `init`/`dispose` pair.
///
/// `init` runs when the scope begins and `dispose` when it is dropped,
/// including on early return through `?`.
pub struct RendererScope<'a, R: Renderer + ?Sized> {
    renderer: &'a mut R,
    ctx: &'a mut dyn GraphicsContext,
}

impl<'a, R: Renderer + ?Sized> RendererScope<'a, R> {
    /// Initialize `renderer` against `ctx`
    pub fn begin(renderer: &'a mut R, ctx: &'a mut dyn GraphicsContext) -> Self {
        renderer.init(ctx);
        Self { renderer, ctx }
    }

    /// Draw a model with the scoped renderer
    pub fn render_model(&mut self, model: &Model) -> RenderResult<()> {
        self.renderer.render_model(&mut *self.ctx, model)
    }

    /// Borrow the renderer and the context at the same time
    pub fn split(&mut self) -> (&mut R, &mut dyn GraphicsContext) {
        (&mut *self.renderer, &mut *self.ctx)
    }
}

impl<R: Renderer + ?Sized> Drop for RendererScope<'_, R> {
    fn drop(&mut self) {
        self.renderer.dispose(&mut *self.ctx);
    }
}

/// Leaf renderer that draws a model as-is
#[derive(Debug, Default, Clone, Copy)]
pub struct ModelRenderer;

impl ModelRenderer {
    /// Create a new model renderer
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for ModelRenderer {
    fn init(&mut self, _ctx: &mut dyn GraphicsContext) {}

    fn render_model(&mut self, ctx: &mut dyn GraphicsContext, model: &Model) -> RenderResult<()> {
        ctx.draw_model(model)
    }

    fn dispose(&mut self, _ctx: &mut dyn GraphicsContext) {}
}
