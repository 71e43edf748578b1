//! Stencil-buffer decorators
//!
//! [`StencilAlwaysRenderer`] stamps a reference value wherever the wrapped
//! renderer draws; [`StencilNotEqualRenderer`] only lets the wrapped
//! renderer draw where that value is absent.

use crate::render::{
    Capabilities, GraphicsContext, Model, RenderResult, Renderer, StencilAction, StencilFunc,
    StencilFunction, StencilOp,
};

#[derive(Debug, Clone, Copy)]
struct SavedStencil {
    enabled: bool,
    func: StencilFunc,
    op: StencilOp,
}

impl SavedStencil {
    fn apply(ctx: &mut dyn GraphicsContext, func: StencilFunc, op: StencilOp) -> Self {
        let state = ctx.state_mut();
        let saved = Self {
            enabled: state.is_enabled(Capabilities::STENCIL_TEST),
            func: state.stencil_func,
            op: state.stencil_op,
        };
        state.enable(Capabilities::STENCIL_TEST);
        state.stencil_func = func;
        state.stencil_op = op;
        saved
    }

    fn restore(self, ctx: &mut dyn GraphicsContext) {
        let state = ctx.state_mut();
        state.stencil_op = self.op;
        state.stencil_func = self.func;
        state.set_enabled(Capabilities::STENCIL_TEST, self.enabled);
    }
}

/// Writes `reference` into the stencil buffer for every drawn pixel
#[derive(Debug)]
pub struct StencilAlwaysRenderer<R> {
    inner: R,
    reference: u8,
    saved: Option<SavedStencil>,
}

impl<R: Renderer> StencilAlwaysRenderer<R> {
    /// Wrap `inner`, stamping `reference`
    pub fn new(inner: R, reference: u8) -> Self {
        Self { inner, reference, saved: None }
    }
}

impl<R: Renderer> Renderer for StencilAlwaysRenderer<R> {
    fn init(&mut self, ctx: &mut dyn GraphicsContext) {
        self.inner.init(ctx);

        let func = StencilFunc {
            function: StencilFunction::Always,
            reference: self.reference,
            mask: 0xFF,
        };
        let op = StencilOp {
            stencil_fail: StencilAction::Keep,
            depth_fail: StencilAction::Keep,
            depth_pass: StencilAction::Replace,
        };
        self.saved = Some(SavedStencil::apply(ctx, func, op));
    }

    fn render_model(&mut self, ctx: &mut dyn GraphicsContext, model: &Model) -> RenderResult<()> {
        self.inner.render_model(ctx, model)
    }

    fn dispose(&mut self, ctx: &mut dyn GraphicsContext) {
        if let Some(saved) = self.saved.take() {
            saved.restore(ctx);
        }
        self.inner.dispose(ctx);
    }
}

/// Draws only where the stencil buffer differs from `reference`
#[derive(Debug)]
pub struct StencilNotEqualRenderer<R> {
    inner: R,
    reference: u8,
    saved: Option<SavedStencil>,
}

impl<R: Renderer> StencilNotEqualRenderer<R> {
    /// Wrap `inner`, masking out pixels tagged with `reference`
    pub fn new(inner: R, reference: u8) -> Self {
        Self { inner, reference, saved: None }
    }
}

impl<R: Renderer> Renderer for StencilNotEqualRenderer<R> {
    fn init(&mut self, ctx: &mut dyn GraphicsContext) {
        self.inner.init(ctx);

        let func = StencilFunc {
            function: StencilFunction::NotEqual,
            reference: self.reference,
            mask: 0xFF,
        };
        self.saved = Some(SavedStencil::apply(ctx, func, StencilOp::default()));
    }

    fn render_model(&mut self, ctx: &mut dyn GraphicsContext, model: &Model) -> RenderResult<()> {
        self.inner.render_model(ctx, model)
    }

    fn dispose(&mut self, ctx: &mut dyn GraphicsContext) {
        if let Some(saved) = self.saved.take() {
            saved.restore(ctx);
        }
        self.inner.dispose(ctx);
    }
}
