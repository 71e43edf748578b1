//! Scene nodes
//!
//! Nodes live in the arena owned by [`SceneGraph`](super::SceneGraph) and
//! are addressed by [`NodeKey`]. Children are held as an ordered list of
//! keys; the parent link is a plain key used for lookup only, so the tree
//! has no ownership cycles.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::foundation::math::Mat4;
use crate::render::Model;

slotmap::new_key_type! {
    /// Stable arena handle identifying a node for the lifetime of its graph
    pub struct NodeKey;
}

/// Numeric ID assigned by the owning graph when a node enters it.
///
/// `0` is reserved for the root, which is never assigned an ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Value reserved for the root
    pub const RESERVED: NodeId = NodeId(0);
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Tree element with a local transform and an optional model
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) transform: Mat4,
    pub(crate) parent: Option<NodeKey>,
    pub(crate) children: Vec<NodeKey>,
    pub(crate) id: Option<NodeId>,
    name: Option<String>,
    model: Option<Model>,
}

impl Node {
    pub(crate) fn new(transform: Mat4) -> Self {
        Self {
            transform,
            parent: None,
            children: Vec::new(),
            id: None,
            name: None,
            model: None,
        }
    }

    /// Transform relative to the parent
    pub fn transform(&self) -> &Mat4 {
        &self.transform
    }

    /// Replace the local transform
    pub fn set_transform(&mut self, transform: Mat4) {
        self.transform = transform;
    }

    /// Parent link, if attached
    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    /// Children in visiting order
    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    /// ID assigned by the graph, if any
    pub fn id(&self) -> Option<NodeId> {
        self.id
    }

    /// Display name
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Set the display name
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// Attached model
    pub fn model(&self) -> Option<&Model> {
        self.model.as_ref()
    }

    /// Attach a model, returning the previous one
    pub fn set_model(&mut self, model: Model) -> Option<Model> {
        self.model.replace(model)
    }
}
