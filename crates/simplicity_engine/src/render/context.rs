//! Graphics context abstraction
//!
//! The renderer chain talks to a [`GraphicsContext`], which owns a GL-like
//! [`RenderState`] block: capability switches, stencil configuration,
//! polygon mode, a model-view matrix stack and a name stack for picking.
//! Renderers mutate this shared state in `init` and must restore it in
//! `dispose`.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::foundation::math::{Colour, Mat4};
use crate::render::{Model, RenderError, RenderResult};

bitflags! {
    /// Server-side capabilities that can be switched on and off
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u32 {
        /// Depth buffer testing
        const DEPTH_TEST = 1 << 0;
        /// Stencil buffer testing
        const STENCIL_TEST = 1 << 1;
        /// Back-face culling
        const CULL_FACE = 1 << 2;
        /// Fixed-function lighting
        const LIGHTING = 1 << 3;
    }
}

bitflags! {
    /// Buffers addressed by [`GraphicsContext::clear`]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ClearBuffers: u32 {
        /// Colour buffer
        const COLOUR = 1 << 0;
        /// Depth buffer
        const DEPTH = 1 << 1;
        /// Stencil buffer
        const STENCIL = 1 << 2;
    }
}

/// Comparison used by the stencil test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StencilFunction {
    /// Always passes
    Always,
    /// Passes where the buffer differs from the reference
    NotEqual,
}

/// Stencil test configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StencilFunc {
    /// Comparison function
    pub function: StencilFunction,
    /// Reference value
    pub reference: u8,
    /// Mask applied to both reference and buffer value
    pub mask: u8,
}

impl Default for StencilFunc {
    fn default() -> Self {
        Self {
            function: StencilFunction::Always,
            reference: 0,
            mask: 0xFF,
        }
    }
}

/// Action applied to the stencil buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StencilAction {
    /// Keep the current value
    Keep,
    /// Replace with the reference value
    Replace,
}

/// Stencil buffer update rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StencilOp {
    /// Stencil test fails
    pub stencil_fail: StencilAction,
    /// Stencil test passes, depth test fails
    pub depth_fail: StencilAction,
    /// Both tests pass
    pub depth_pass: StencilAction,
}

impl Default for StencilOp {
    fn default() -> Self {
        Self {
            stencil_fail: StencilAction::Keep,
            depth_fail: StencilAction::Keep,
            depth_pass: StencilAction::Keep,
        }
    }
}

/// Rasterization mode for polygons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PolygonMode {
    /// Filled polygons
    #[default]
    Fill,
    /// Polygon edges only
    Line,
    /// Polygon vertices only
    Point,
}

/// GL-like state shared by every renderer drawing through a context
#[derive(Debug, Clone, PartialEq)]
pub struct RenderState {
    /// Enabled capabilities
    pub capabilities: Capabilities,
    /// Stencil test configuration
    pub stencil_func: StencilFunc,
    /// Stencil update rules
    pub stencil_op: StencilOp,
    /// Polygon rasterization mode
    pub polygon_mode: PolygonMode,
    /// Width of rasterized lines
    pub line_width: f32,
    /// Size of rasterized points
    pub point_size: f32,
    /// Colour forced onto every draw, replacing model colours
    pub colour_override: Option<Colour>,
    /// Projection matrix
    pub projection: Mat4,
    matrix_stack: Vec<Mat4>,
    name_stack: Vec<u32>,
}

impl Default for RenderState {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderState {
    /// Fresh state: depth test, culling and lighting on, identity matrices
    pub fn new() -> Self {
        Self {
            capabilities: Capabilities::DEPTH_TEST
                | Capabilities::CULL_FACE
                | Capabilities::LIGHTING,
            stencil_func: StencilFunc::default(),
            stencil_op: StencilOp::default(),
            polygon_mode: PolygonMode::Fill,
            line_width: 1.0,
            point_size: 1.0,
            colour_override: None,
            projection: Mat4::identity(),
            matrix_stack: vec![Mat4::identity()],
            name_stack: Vec::new(),
        }
    }

    /// Check whether a capability is enabled
    pub fn is_enabled(&self, capability: Capabilities) -> bool {
        self.capabilities.contains(capability)
    }

    /// Enable a capability
    pub fn enable(&mut self, capability: Capabilities) {
        self.capabilities.insert(capability);
    }

    /// Disable a capability
    pub fn disable(&mut self, capability: Capabilities) {
        self.capabilities.remove(capability);
    }

    /// Enable or disable a capability, used when restoring saved state
    pub fn set_enabled(&mut self, capability: Capabilities, enabled: bool) {
        self.capabilities.set(capability, enabled);
    }

    /// Current model-view matrix
    pub fn current_matrix(&self) -> &Mat4 {
        // The stack always keeps its base entry.
        &self.matrix_stack[self.matrix_stack.len() - 1]
    }

    /// Number of entries on the matrix stack, including the base entry
    pub fn matrix_depth(&self) -> usize {
        self.matrix_stack.len()
    }

    /// Duplicate the current matrix
    pub fn push_matrix(&mut self) {
        let top = *self.current_matrix();
        self.matrix_stack.push(top);
    }

    /// Discard the current matrix
    pub fn pop_matrix(&mut self) -> RenderResult<()> {
        if self.matrix_stack.len() <= 1 {
            return Err(RenderError::MatrixStackUnderflow);
        }
        self.matrix_stack.pop();
        Ok(())
    }

    /// Pop matrices until the stack is `depth` entries deep
    pub fn truncate_matrices(&mut self, depth: usize) {
        self.matrix_stack.truncate(depth.max(1));
    }

    /// Post-multiply the current matrix
    pub fn mult_matrix(&mut self, matrix: &Mat4) {
        let last = self.matrix_stack.len() - 1;
        self.matrix_stack[last] *= matrix;
    }

    /// Replace the current matrix
    pub fn load_matrix(&mut self, matrix: Mat4) {
        let last = self.matrix_stack.len() - 1;
        self.matrix_stack[last] = matrix;
    }

    /// Names currently on the name stack, bottom first
    pub fn names(&self) -> &[u32] {
        &self.name_stack
    }

    /// Push a name
    pub fn push_name(&mut self, name: u32) {
        self.name_stack.push(name);
    }

    /// Pop the top name
    pub fn pop_name(&mut self) -> RenderResult<u32> {
        self.name_stack.pop().ok_or(RenderError::NameStackUnderflow)
    }

    /// Replace the top name
    pub fn load_name(&mut self, name: u32) -> RenderResult<()> {
        let top = self.name_stack.last_mut().ok_or(RenderError::NameStackUnderflow)?;
        *top = name;
        Ok(())
    }
}

/// Rendering environment shared by the renderer chain
pub trait GraphicsContext {
    /// Read the current state
    fn state(&self) -> &RenderState;

    /// Mutate the current state
    fn state_mut(&mut self) -> &mut RenderState;

    /// Draw a model under the current state
    fn draw_model(&mut self, model: &Model) -> RenderResult<()>;

    /// Clear the given buffers
    fn clear(&mut self, buffers: ClearBuffers);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;

    #[test]
    fn test_default_state() {
        let state = RenderState::new();
        assert!(state.is_enabled(Capabilities::DEPTH_TEST));
        assert!(state.is_enabled(Capabilities::LIGHTING));
        assert!(!state.is_enabled(Capabilities::STENCIL_TEST));
        assert_eq!(state.matrix_depth(), 1);
        assert!(state.names().is_empty());
    }

    #[test]
    fn test_matrix_stack_push_pop() {
        let mut state = RenderState::new();
        let translation = Mat4::new_translation(&Vec3::new(1.0, 2.0, 3.0));

        state.push_matrix();
        state.mult_matrix(&translation);
        assert_eq!(*state.current_matrix(), translation);

        state.pop_matrix().unwrap();
        assert_eq!(*state.current_matrix(), Mat4::identity());
        assert!(matches!(state.pop_matrix(), Err(RenderError::MatrixStackUnderflow)));
    }

    #[test]
    fn test_truncate_keeps_base_matrix() {
        let mut state = RenderState::new();
        state.push_matrix();
        state.push_matrix();
        state.truncate_matrices(0);
        assert_eq!(state.matrix_depth(), 1);
    }

    #[test]
    fn test_name_stack() {
        let mut state = RenderState::new();
        assert!(matches!(state.load_name(3), Err(RenderError::NameStackUnderflow)));

        state.push_name(0);
        state.load_name(7).unwrap();
        assert_eq!(state.names(), &[7]);
        assert_eq!(state.pop_name().unwrap(), 7);
        assert!(state.pop_name().is_err());
    }

    #[test]
    fn test_set_enabled_round_trip() {
        let mut state = RenderState::new();
        let was_culling = state.is_enabled(Capabilities::CULL_FACE);
        state.disable(Capabilities::CULL_FACE);
        state.set_enabled(Capabilities::CULL_FACE, was_culling);
        assert!(state.is_enabled(Capabilities::CULL_FACE));
    }
}
