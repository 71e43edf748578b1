//! # Scene Management
//!
//! Hierarchical scene graph with ID-addressable nodes, a restartable
//! depth-first traversal that reports how far to unwind between nodes, the
//! camera, and the manager that ties a graph to its selection and renderers.

pub mod node;
pub mod scene_graph;
pub mod traversal;
pub mod camera;
pub mod scene_manager;

#[cfg(test)]
mod tests;

pub use node::{Node, NodeId, NodeKey};
pub use scene_graph::{SceneError, SceneGraph, SceneResult};
pub use traversal::{Traversal, TraversalStep};
pub use camera::{Camera, Projection, ProjectionMode};
pub use scene_manager::{EngineError, SceneManager, SelectionMode, ViewState};
