//! Headless graphics context that records every command
//!
//! Used by the demo application and the tests to observe exactly which
//! state each model was drawn under.

use crate::foundation::math::{Colour, Mat4};
use crate::render::{
    Capabilities, ClearBuffers, GraphicsContext, Model, PolygonMode, RenderError, RenderResult,
    RenderState, StencilFunc, StencilOp,
};

/// Snapshot of one draw call
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    /// Name of the model that was drawn
    pub model: String,
    /// Effective colour (override or model colour)
    pub colour: Colour,
    /// Capabilities enabled at draw time
    pub capabilities: Capabilities,
    /// Stencil test configuration at draw time
    pub stencil_func: StencilFunc,
    /// Stencil update rules at draw time
    pub stencil_op: StencilOp,
    /// Polygon mode at draw time
    pub polygon_mode: PolygonMode,
    /// Line width at draw time
    pub line_width: f32,
    /// Model-view matrix at draw time
    pub model_view: Mat4,
    /// Name stack at draw time
    pub names: Vec<u32>,
}

/// A recorded command
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCommand {
    /// Buffers were cleared
    Clear(ClearBuffers),
    /// A model was drawn
    Draw(DrawCommand),
}

/// Context that keeps a log of clears and draws
#[derive(Debug, Default)]
pub struct RecordingContext {
    state: RenderState,
    commands: Vec<RecordedCommand>,
}

impl RecordingContext {
    /// Create a context with default state and an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded commands in order
    pub fn commands(&self) -> &[RecordedCommand] {
        &self.commands
    }

    /// Recorded draw calls in order
    pub fn draws(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter().filter_map(|command| match command {
            RecordedCommand::Draw(draw) => Some(draw),
            RecordedCommand::Clear(_) => None,
        })
    }
}

impl GraphicsContext for RecordingContext {
    fn state(&self) -> &RenderState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut RenderState {
        &mut self.state
    }

    fn draw_model(&mut self, model: &Model) -> RenderResult<()> {
        if model.mesh().is_empty() {
            return Err(RenderError::MissingGeometry(model.name().to_string()));
        }

        let state = &self.state;
        let draw = DrawCommand {
            model: model.name().to_string(),
            colour: state.colour_override.unwrap_or_else(|| model.colour()),
            capabilities: state.capabilities,
            stencil_func: state.stencil_func,
            stencil_op: state.stencil_op,
            polygon_mode: state.polygon_mode,
            line_width: state.line_width,
            model_view: *state.current_matrix(),
            names: state.names().to_vec(),
        };
        log::trace!("draw {} ({:?})", draw.model, draw.polygon_mode);
        self.commands.push(RecordedCommand::Draw(draw));
        Ok(())
    }

    fn clear(&mut self, buffers: ClearBuffers) {
        self.commands.push(RecordedCommand::Clear(buffers));
    }
}
