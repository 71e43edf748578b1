//! # Rendering
//!
//! Backend-agnostic rendering layer built around a [`GraphicsContext`]
//! (the state a fixed-function pipeline exposes: capabilities, stencil,
//! polygon mode, matrix and name stacks) and a chain of [`Renderer`]
//! stages.
//!
//! ## Renderer chain
//!
//! - **ModelRenderer**: leaf that draws a model as-is
//! - **MonoColourRenderer**: forces one colour with lighting off
//! - **StencilAlwaysRenderer / StencilNotEqualRenderer**: stencil stamping and masking
//! - **OutlineRenderer**: two-pass selection outline composed from the above
//! - **NamePassingRenderer**: tags draws with a pick name
//!
//! [`SceneRenderer`] drives a chain over a scene graph, and
//! [`RecordingContext`] is the headless context used by the demo and tests.

pub mod context;
pub mod model;
pub mod renderer;
pub mod recording;
pub mod mono_colour;
pub mod stencil;
pub mod outline;
pub mod name_passing;
pub mod scene_renderer;

pub use context::{
    Capabilities, ClearBuffers, GraphicsContext, PolygonMode, RenderState, StencilAction,
    StencilFunc, StencilFunction, StencilOp,
};
pub use model::{Mesh, Model};
pub use renderer::{ModelRenderer, Renderer, RendererScope};
pub use recording::{DrawCommand, RecordedCommand, RecordingContext};
pub use mono_colour::MonoColourRenderer;
pub use stencil::{StencilAlwaysRenderer, StencilNotEqualRenderer};
pub use outline::{OutlineRenderer, OutlineStyle, StandardOutlineRenderer};
pub use name_passing::NamePassingRenderer;
pub use scene_renderer::{walk_scene, DrawingMode, FrameStats, SceneRenderer};

use thiserror::Error;

/// Rendering errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// Matrix stack popped past its base entry
    #[error("Matrix stack underflow")]
    MatrixStackUnderflow,

    /// Name stack popped or loaded while empty
    #[error("Name stack underflow")]
    NameStackUnderflow,

    /// Model has no geometry to draw
    #[error("Model '{0}' has no geometry")]
    MissingGeometry(String),

    /// Failure reported by a graphics backend
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;
