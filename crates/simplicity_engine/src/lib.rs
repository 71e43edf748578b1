//! # Simplicity Engine
//!
//! Scene core of a small 3D editor: a hierarchical scene graph, a
//! depth-first traversal that reports how many levels to unwind between
//! nodes, and a chain of decorator renderers that draws selected models
//! with a stencil-buffer outline.
//!
//! ## Features
//!
//! - **Scene Graph**: arena-backed tree with parent back-links and numeric IDs
//! - **Traversal**: restartable preorder walk with backtrack counts for matrix stacks
//! - **Renderer Chain**: explicit `init`/`render_model`/`dispose` decorators
//! - **Picking**: ray picking through the same traversal and renderer plumbing
//! - **Configuration**: TOML/RON settings and persistable view state
//!
//! ## Quick Start
//!
//! ```rust
//! use simplicity_engine::prelude::*;
//!
//! let mut graph = SceneGraph::new();
//! let cube = graph.create_model_node(Mat4::identity(), Model::cube("cube", 1.0, Colour::WHITE));
//! graph.add_subgraph(cube).unwrap();
//!
//! let eye = graph.create_node(Mat4::new_translation(&Vec3::new(0.0, 0.0, 5.0)));
//! graph.add_subgraph(eye).unwrap();
//!
//! let config = ApplicationConfig::default();
//! let mut scene = SceneManager::new(graph, Camera::new(eye, Projection::default()), &config);
//! scene.select(cube, SelectionMode::Replace).unwrap();
//!
//! let mut ctx = RecordingContext::new();
//! let stats = scene.render_frame(&mut ctx).unwrap();
//! assert_eq!(stats.models_outlined, 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod core;
pub mod config;
pub mod foundation;
pub mod scene;
pub mod render;
pub mod input;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        core::config::{
            ApplicationConfig, Config, ConfigError, EngineConfig, PickingConfig, RenderConfig,
        },
        foundation::math::{Aabb, Colour, Mat4, Mat4Ext, Point3, Ray, Vec3},
        input::{PickHit, Picker, PickingContext},
        render::{
            DrawingMode, FrameStats, GraphicsContext, Mesh, Model, ModelRenderer, OutlineRenderer,
            OutlineStyle, RecordingContext, RenderError, RenderResult, Renderer, RendererScope,
            SceneRenderer,
        },
        scene::{
            Camera, EngineError, Node, NodeId, NodeKey, Projection, ProjectionMode, SceneError,
            SceneGraph, SceneManager, SelectionMode, Traversal, TraversalStep, ViewState,
        },
    };
}
