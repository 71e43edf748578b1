//! Scene graph with ID-addressable nodes
//!
//! The graph owns every node in a slot-map arena. A node is "in the graph"
//! when it is reachable from the root; nodes can also exist detached in the
//! arena, waiting to be attached.
//!
//! IDs are handed out in depth-first preorder whenever a subtree enters the
//! graph, starting from the next unused integer. Detaching a subtree keeps
//! its IDs in the lookup table, so a removed node stays resolvable through
//! [`SceneGraph::get_node`] until it is attached again and renumbered.

use std::collections::HashMap;

use slotmap::SlotMap;
use thiserror::Error;

use crate::foundation::math::Mat4;
use crate::render::Model;
use crate::scene::{Node, NodeId, NodeKey, Traversal};

/// Structural and math errors raised by the scene layer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// Key does not refer to a node of this graph
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeKey),

    /// Node already has a parent
    #[error("Node {0:?} is already attached to a parent")]
    AlreadyAttached(NodeKey),

    /// Attaching would make a node its own ancestor
    #[error("Attaching {child:?} under {parent:?} would create a cycle")]
    CycleDetected {
        /// Intended parent
        parent: NodeKey,
        /// Intended child
        child: NodeKey,
    },

    /// The root cannot become a child
    #[error("The root node cannot be attached to another node")]
    RootNotAttachable,

    /// The root cannot be removed
    #[error("The root node cannot be removed")]
    RootNotRemovable,

    /// Node is not a child of the given parent
    #[error("Node {child:?} is not a child of {parent:?}")]
    NotAChild {
        /// Expected parent
        parent: NodeKey,
        /// Node that was not found among its children
        child: NodeKey,
    },

    /// Node is not reachable from the root
    #[error("Node {0:?} not found in graph")]
    NodeNotInGraph(NodeKey),

    /// A world transform could not be inverted
    #[error("Transform of node {0:?} is not invertible")]
    NonInvertibleTransform(NodeKey),
}

/// Result type for scene operations
pub type SceneResult<T> = Result<T, SceneError>;

/// Tree of nodes under a permanent root
#[derive(Debug, Clone)]
pub struct SceneGraph {
    root: NodeKey,
    nodes: SlotMap<NodeKey, Node>,
    ids: HashMap<NodeId, NodeKey>,
    next_id: u32,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    /// Create a graph holding only the root
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::new(Mat4::identity()));

        Self {
            root,
            nodes,
            ids: HashMap::new(),
            next_id: NodeId::RESERVED.0 + 1,
        }
    }

    /// The root node; always present
    pub fn root(&self) -> NodeKey {
        self.root
    }

    /// Create a detached node
    pub fn create_node(&mut self, transform: Mat4) -> NodeKey {
        self.nodes.insert(Node::new(transform))
    }

    /// Create a detached node carrying a model
    pub fn create_model_node(&mut self, transform: Mat4, model: Model) -> NodeKey {
        let mut node = Node::new(transform);
        node.set_name(model.name());
        node.set_model(model);
        self.nodes.insert(node)
    }

    /// Look up a node
    pub fn node(&self, key: NodeKey) -> Option<&Node> {
        self.nodes.get(key)
    }

    /// Look up a node for mutation
    pub fn node_mut(&mut self, key: NodeKey) -> Option<&mut Node> {
        self.nodes.get_mut(key)
    }

    /// Parent of a node
    pub fn parent(&self, key: NodeKey) -> Option<NodeKey> {
        self.nodes.get(key).and_then(Node::parent)
    }

    /// Children of a node, empty for unknown keys
    pub fn children(&self, key: NodeKey) -> &[NodeKey] {
        self.nodes.get(key).map(Node::children).unwrap_or_default()
    }

    /// The node last assigned `id`
    pub fn get_node(&self, id: NodeId) -> Option<NodeKey> {
        self.ids.get(&id).copied()
    }

    /// Number of IDs resolvable through [`get_node`](Self::get_node)
    pub fn assigned_id_count(&self) -> usize {
        self.ids.len()
    }

    /// Whether `candidate` is reachable by following parent links from `node`
    pub fn is_ancestor(&self, node: NodeKey, candidate: NodeKey) -> bool {
        let mut current = self.parent(node);
        while let Some(key) = current {
            if key == candidate {
                return true;
            }
            current = self.parent(key);
        }
        false
    }

    /// Whether `candidate` is reachable by following child links from `node`
    pub fn is_successor(&self, node: NodeKey, candidate: NodeKey) -> bool {
        candidate != node && self.is_ancestor(candidate, node)
    }

    /// Whether the node is the root or hangs below it
    pub fn is_attached(&self, key: NodeKey) -> bool {
        key == self.root || self.is_ancestor(key, self.root)
    }

    /// Attach `child` as the last child of `parent`.
    ///
    /// When `parent` is in the graph, `child` and its whole subtree receive
    /// fresh IDs. On error the graph is left unmodified.
    pub fn add_child(&mut self, parent: NodeKey, child: NodeKey) -> SceneResult<()> {
        if !self.nodes.contains_key(parent) {
            return Err(SceneError::NodeNotFound(parent));
        }
        let Some(child_node) = self.nodes.get(child) else {
            return Err(SceneError::NodeNotFound(child));
        };
        if child == self.root {
            return Err(SceneError::RootNotAttachable);
        }
        if child_node.parent.is_some() {
            return Err(SceneError::AlreadyAttached(child));
        }
        if child == parent || self.is_ancestor(parent, child) {
            return Err(SceneError::CycleDetected { parent, child });
        }

        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.push(child);
        }
        log::debug!("attached {child:?} under {parent:?}");

        if self.is_attached(parent) {
            self.assign_ids(child);
        }
        Ok(())
    }

    /// Detach `child` from `parent`; the subtree keeps its IDs
    pub fn remove_child(&mut self, parent: NodeKey, child: NodeKey) -> SceneResult<()> {
        let parent_node = self.nodes.get_mut(parent).ok_or(SceneError::NodeNotFound(parent))?;
        let position = parent_node
            .children
            .iter()
            .position(|&key| key == child)
            .ok_or(SceneError::NotAChild { parent, child })?;
        parent_node.children.remove(position);

        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = None;
        }
        log::debug!("detached {child:?} from {parent:?}");
        Ok(())
    }

    /// Attach a detached subtree directly under the root
    pub fn add_subgraph(&mut self, node: NodeKey) -> SceneResult<()> {
        self.add_child(self.root, node)
    }

    /// Detach a node in the graph from its parent.
    ///
    /// The ID table is not touched and remaining nodes are not renumbered.
    pub fn remove_subgraph(&mut self, node: NodeKey) -> SceneResult<()> {
        if node == self.root {
            return Err(SceneError::RootNotRemovable);
        }
        if !self.nodes.contains_key(node) || !self.is_attached(node) {
            return Err(SceneError::NodeNotInGraph(node));
        }
        let parent = self.parent(node).ok_or(SceneError::NodeNotInGraph(node))?;
        self.remove_child(parent, node)
    }

    /// Product of the local transforms from the root down to `key`
    pub fn world_transform(&self, key: NodeKey) -> SceneResult<Mat4> {
        let mut node = self.nodes.get(key).ok_or(SceneError::NodeNotFound(key))?;
        let mut world = node.transform;
        while let Some(parent) = node.parent.and_then(|p| self.nodes.get(p)) {
            world = parent.transform * world;
            node = parent;
        }
        Ok(world)
    }

    fn assign_ids(&mut self, subtree: NodeKey) {
        let keys: Vec<NodeKey> = Traversal::new(self, subtree).map(|step| step.node).collect();
        for key in keys {
            let id = NodeId(self.next_id);
            self.next_id += 1;
            if let Some(node) = self.nodes.get_mut(key) {
                node.id = Some(id);
            }
            self.ids.insert(id, key);
        }
        log::debug!("assigned ids up to {} for subtree {subtree:?}", self.next_id - 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Colour, Vec3};
    use approx::assert_relative_eq;

    fn detached(graph: &mut SceneGraph) -> NodeKey {
        graph.create_node(Mat4::identity())
    }

    #[test]
    fn test_add_subgraph_links_and_ids() {
        let mut graph = SceneGraph::new();
        let node = detached(&mut graph);
        let child = detached(&mut graph);
        let grandchild = detached(&mut graph);
        graph.add_child(node, child).unwrap();
        graph.add_child(child, grandchild).unwrap();
        assert_eq!(graph.assigned_id_count(), 0);

        graph.add_subgraph(node).unwrap();

        assert!(graph.children(graph.root()).contains(&node));
        assert_eq!(graph.parent(node), Some(graph.root()));
        for key in [node, child, grandchild] {
            let id = graph.node(key).and_then(Node::id).unwrap();
            assert_eq!(graph.get_node(id), Some(key));
        }
        assert_eq!(graph.node(node).and_then(Node::id), Some(NodeId(1)));
        assert_eq!(graph.node(grandchild).and_then(Node::id), Some(NodeId(3)));
    }

    #[test]
    fn test_ids_follow_preorder_and_never_repeat() {
        let mut graph = SceneGraph::new();
        let a = detached(&mut graph);
        let b = detached(&mut graph);
        let c = detached(&mut graph);
        graph.add_child(a, b).unwrap();
        graph.add_child(a, c).unwrap();
        graph.add_subgraph(a).unwrap();

        let d = detached(&mut graph);
        graph.add_subgraph(d).unwrap();

        let ids: Vec<_> = [a, b, c, d]
            .iter()
            .map(|&k| graph.node(k).and_then(Node::id).unwrap())
            .collect();
        assert_eq!(ids, vec![NodeId(1), NodeId(2), NodeId(3), NodeId(4)]);
        assert!(graph.node(graph.root()).and_then(Node::id).is_none());
        assert_eq!(graph.get_node(NodeId::RESERVED), None);
    }

    #[test]
    fn test_attaching_under_attached_node_assigns_ids() {
        let mut graph = SceneGraph::new();
        let a = detached(&mut graph);
        graph.add_subgraph(a).unwrap();
        let b = detached(&mut graph);

        graph.add_child(a, b).unwrap();

        assert_eq!(graph.node(b).and_then(Node::id), Some(NodeId(2)));
    }

    #[test]
    fn test_reattach_overwrites_id_and_keeps_stale_entry() {
        let mut graph = SceneGraph::new();
        let a = detached(&mut graph);
        graph.add_subgraph(a).unwrap();
        graph.remove_subgraph(a).unwrap();

        assert_eq!(graph.get_node(NodeId(1)), Some(a));
        assert_eq!(graph.node(a).and_then(Node::id), Some(NodeId(1)));

        graph.add_subgraph(a).unwrap();
        assert_eq!(graph.node(a).and_then(Node::id), Some(NodeId(2)));
        assert_eq!(graph.get_node(NodeId(2)), Some(a));
        assert_eq!(graph.get_node(NodeId(1)), Some(a));
    }

    #[test]
    fn test_remove_subgraph_keeps_siblings_linked() {
        let mut graph = SceneGraph::new();
        let node1 = detached(&mut graph);
        let node2 = detached(&mut graph);
        let node4 = detached(&mut graph);
        let node7 = detached(&mut graph);
        graph.add_child(node1, node2).unwrap();
        graph.add_child(node1, node4).unwrap();
        graph.add_child(node4, node7).unwrap();
        graph.add_subgraph(node1).unwrap();

        graph.remove_subgraph(node4).unwrap();

        assert_eq!(graph.children(node1), &[node2]);
        assert_eq!(graph.parent(node2), Some(node1));
        assert_eq!(graph.parent(node4), None);
        assert_eq!(graph.children(node4), &[node7]);
        assert_eq!(graph.parent(node7), Some(node4));
        assert!(!graph.is_attached(node7));
    }

    #[test]
    fn test_remove_subgraph_of_detached_node_fails() {
        let mut graph = SceneGraph::new();
        let loose = detached(&mut graph);
        let child = detached(&mut graph);
        graph.add_child(loose, child).unwrap();

        assert_eq!(graph.remove_subgraph(child), Err(SceneError::NodeNotInGraph(child)));
        assert_eq!(graph.parent(child), Some(loose));
        assert_eq!(graph.remove_subgraph(graph.root()), Err(SceneError::RootNotRemovable));
    }

    #[test]
    fn test_structural_errors_leave_graph_unmodified() {
        let mut graph = SceneGraph::new();
        let a = detached(&mut graph);
        let b = detached(&mut graph);
        graph.add_child(a, b).unwrap();
        graph.add_subgraph(a).unwrap();

        assert_eq!(graph.add_subgraph(b), Err(SceneError::AlreadyAttached(b)));
        assert_eq!(graph.add_child(b, graph.root()), Err(SceneError::RootNotAttachable));

        let c = detached(&mut graph);
        assert_eq!(graph.add_child(c, c), Err(SceneError::CycleDetected { parent: c, child: c }));
        assert_eq!(graph.remove_child(a, c), Err(SceneError::NotAChild { parent: a, child: c }));

        assert_eq!(graph.children(graph.root()), &[a]);
        assert_eq!(graph.children(a), &[b]);
        assert_eq!(graph.assigned_id_count(), 2);
    }

    #[test]
    fn test_cycle_through_detached_subtree_is_rejected() {
        let mut graph = SceneGraph::new();
        let a = detached(&mut graph);
        let b = detached(&mut graph);
        graph.add_child(a, b).unwrap();
        let c = detached(&mut graph);
        graph.add_child(b, c).unwrap();

        graph.remove_child(a, b).unwrap();
        graph.add_child(c, a).unwrap();
        assert_eq!(graph.add_child(a, b), Err(SceneError::CycleDetected { parent: a, child: b }));
        assert_eq!(graph.parent(b), None);
    }

    #[test]
    fn test_ancestor_and_successor_are_strict() {
        let mut graph = SceneGraph::new();
        let a = detached(&mut graph);
        let b = detached(&mut graph);
        let c = detached(&mut graph);
        graph.add_child(a, b).unwrap();
        graph.add_child(b, c).unwrap();
        graph.add_subgraph(a).unwrap();

        assert!(graph.is_ancestor(c, a));
        assert!(graph.is_ancestor(c, graph.root()));
        assert!(!graph.is_ancestor(a, c));
        assert!(graph.is_successor(a, c));
        assert!(!graph.is_successor(c, a));

        for key in [a, b, c, graph.root()] {
            assert!(!graph.is_ancestor(key, key));
            assert!(!graph.is_successor(key, key));
        }
    }

    #[test]
    fn test_world_transform_composes_parents() {
        let mut graph = SceneGraph::new();
        let parent = graph.create_node(Mat4::new_translation(&Vec3::new(1.0, 0.0, 0.0)));
        let child = graph.create_model_node(
            Mat4::new_translation(&Vec3::new(0.0, 2.0, 0.0)),
            Model::cube("box", 1.0, Colour::WHITE),
        );
        graph.add_child(parent, child).unwrap();
        graph.add_subgraph(parent).unwrap();

        let world = graph.world_transform(child).unwrap();
        assert_relative_eq!(world, Mat4::new_translation(&Vec3::new(1.0, 2.0, 0.0)));
        assert_eq!(graph.node(child).and_then(Node::name), Some("box"));
    }
}
