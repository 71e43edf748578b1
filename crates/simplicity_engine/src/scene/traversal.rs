//! Depth-first traversal with backtrack reporting
//!
//! [`Traversal`] walks a subtree in preorder. After every
//! [`get_next_node`](Traversal::get_next_node) it knows how many levels the
//! cursor must climb before the following node is reached (or, after the
//! last node, before the walk is closed). Renderers use that count to pop
//! their matrix stack: push and apply a node's transform, draw, then pop
//! `backtracks_to_next_node()` times. Over a complete walk pushes and pops
//! balance exactly.
//!
//! A traversal borrows its graph, so the graph cannot be mutated while a
//! walk is in progress.

use crate::scene::{NodeKey, SceneGraph};

/// One visited node together with its backtrack count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraversalStep {
    /// The visited node
    pub node: NodeKey,
    /// Levels to climb before the next node (or to close the walk)
    pub backtracks: usize,
}

/// Restartable depth-first preorder cursor over a subtree
#[derive(Debug, Clone)]
pub struct Traversal<'a> {
    graph: &'a SceneGraph,
    start: NodeKey,
    /// Path from the start node to the current node, each entry paired with
    /// the index of the next child to visit.
    stack: Vec<(NodeKey, usize)>,
    next: Option<NodeKey>,
    backtracks: usize,
}

impl<'a> Traversal<'a> {
    /// Start a walk rooted at `start`; any node may be used
    pub fn new(graph: &'a SceneGraph, start: NodeKey) -> Self {
        let mut traversal = Self {
            graph,
            start,
            stack: Vec::new(),
            next: None,
            backtracks: 0,
        };
        traversal.reset();
        traversal
    }

    /// Graph being walked
    pub fn graph(&self) -> &'a SceneGraph {
        self.graph
    }

    /// Node the walk is rooted at
    pub fn start(&self) -> NodeKey {
        self.start
    }

    /// Rewind to the state right after construction
    pub fn reset(&mut self) {
        self.stack.clear();
        self.next = self.graph.node(self.start).map(|_| self.start);
        self.backtracks = 0;
    }

    /// Whether another call to `get_next_node` yields a node
    pub fn has_more_nodes(&self) -> bool {
        self.next.is_some()
    }

    /// Backtracks associated with the most recently returned node
    pub fn backtracks_to_next_node(&self) -> usize {
        self.backtracks
    }

    /// Advance and return the next node in preorder, or `None` once the walk
    /// is exhausted. Calls past the end keep returning `None`.
    pub fn get_next_node(&mut self) -> Option<NodeKey> {
        let current = self.next.take()?;

        self.backtracks = 0;
        self.stack.push((current, 0));
        while let Some((node, next_child)) = self.stack.last_mut() {
            if let Some(&child) = self.graph.children(*node).get(*next_child) {
                *next_child += 1;
                self.next = Some(child);
                break;
            }
            self.stack.pop();
            self.backtracks += 1;
        }

        Some(current)
    }
}

impl Iterator for Traversal<'_> {
    type Item = TraversalStep;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.get_next_node()?;
        Some(TraversalStep {
            node,
            backtracks: self.backtracks,
        })
    }
}

impl std::iter::FusedIterator for Traversal<'_> {}
