//! Scenario tests spanning the graph, the traversal and the matrix stack

use crate::foundation::math::{Mat4, Vec3};
use crate::render::{GraphicsContext, RecordingContext, RenderState};
use crate::scene::{NodeId, NodeKey, SceneGraph, Traversal, TraversalStep};

/// Seven nodes attached under the root as `node1`
struct SevenNodes {
    graph: SceneGraph,
    nodes: [NodeKey; 7],
}

impl SevenNodes {
    /// `edges` are `(parent, child)` pairs of 1-based node numbers
    fn build(edges: &[(usize, usize)]) -> Self {
        let mut graph = SceneGraph::new();
        let nodes: [NodeKey; 7] = std::array::from_fn(|i| {
            graph.create_node(Mat4::new_translation(&Vec3::new(i as f32 + 1.0, 0.0, 0.0)))
        });
        for &(parent, child) in edges {
            graph.add_child(nodes[parent - 1], nodes[child - 1]).unwrap();
        }
        graph.add_subgraph(nodes[0]).unwrap();
        Self { graph, nodes }
    }

    /// node1 {node2 {node3}, node4 {node5 {node6}, node7}}
    fn nested() -> Self {
        Self::build(&[(1, 2), (2, 3), (1, 4), (4, 5), (5, 6), (4, 7)])
    }

    /// node1 {node2 {node3}, node4 {node5, node6}, node7}
    fn flat() -> Self {
        Self::build(&[(1, 2), (2, 3), (1, 4), (4, 5), (4, 6), (1, 7)])
    }

    fn steps(&self) -> Vec<TraversalStep> {
        Traversal::new(&self.graph, self.nodes[0]).collect()
    }

    fn expected(&self, backtracks: [usize; 7]) -> Vec<TraversalStep> {
        self.nodes
            .iter()
            .zip(backtracks)
            .map(|(&node, backtracks)| TraversalStep { node, backtracks })
            .collect()
    }
}

#[test]
fn test_backtracks_for_nested_tree() {
    let tree = SevenNodes::nested();
    assert_eq!(tree.steps(), tree.expected([0, 0, 2, 0, 0, 2, 3]));
}

#[test]
fn test_backtracks_for_flat_tree() {
    let tree = SevenNodes::flat();
    assert_eq!(tree.steps(), tree.expected([0, 0, 2, 0, 1, 2, 2]));
}

#[test]
fn test_backtracks_close_every_level() {
    for tree in [SevenNodes::nested(), SevenNodes::flat()] {
        let total: usize = tree.steps().iter().map(|step| step.backtracks).sum();
        assert_eq!(total, tree.nodes.len());
    }
}

#[test]
fn test_full_walk_visits_each_node_once_in_preorder() {
    let tree = SevenNodes::nested();
    let mut traversal = Traversal::new(&tree.graph, tree.graph.root());
    let mut visited = Vec::new();
    let mut transitions = 0;
    let mut had_more = traversal.has_more_nodes();

    while let Some(node) = traversal.get_next_node() {
        visited.push(node);
        if had_more && !traversal.has_more_nodes() {
            transitions += 1;
        }
        had_more = traversal.has_more_nodes();
    }

    let mut expected = vec![tree.graph.root()];
    expected.extend(tree.nodes);
    assert_eq!(visited, expected);
    assert_eq!(transitions, 1);
}

#[test]
fn test_reset_replays_identical_walk() {
    let tree = SevenNodes::flat();
    let mut traversal = Traversal::new(&tree.graph, tree.nodes[0]);

    let first: Vec<TraversalStep> = traversal.by_ref().collect();
    traversal.reset();
    let second: Vec<TraversalStep> = traversal.by_ref().collect();

    assert_eq!(first, second);
}

#[test]
fn test_matrix_stack_balances_over_walk() {
    for tree in [SevenNodes::nested(), SevenNodes::flat()] {
        let mut state = RenderState::new();
        for step in Traversal::new(&tree.graph, tree.graph.root()) {
            state.push_matrix();
            let transform = *tree.graph.node(step.node).unwrap().transform();
            state.mult_matrix(&transform);
            assert_eq!(*state.current_matrix(), tree.graph.world_transform(step.node).unwrap());
            for _ in 0..step.backtracks {
                state.pop_matrix().unwrap();
            }
        }
        assert_eq!(state.matrix_depth(), 1);
        assert_eq!(*state.current_matrix(), Mat4::identity());
    }
}

#[test]
fn test_add_subgraph_assigns_round_tripping_ids() {
    let tree = SevenNodes::nested();
    let root = tree.graph.root();

    assert!(tree.graph.children(root).contains(&tree.nodes[0]));
    assert_eq!(tree.graph.parent(tree.nodes[0]), Some(root));

    let ids: Vec<NodeId> = tree
        .nodes
        .iter()
        .map(|&key| tree.graph.node(key).and_then(|node| node.id()).unwrap())
        .collect();
    assert_eq!(ids, (1..=7).map(NodeId).collect::<Vec<_>>());
    for (&key, &id) in tree.nodes.iter().zip(&ids) {
        assert_eq!(tree.graph.get_node(id), Some(key));
    }
}

#[test]
fn test_remove_internal_node_keeps_siblings_linked() {
    let mut tree = SevenNodes::nested();
    let [node1, node2, _, node4, _, _, node7] = tree.nodes;

    tree.graph.remove_subgraph(node4).unwrap();

    assert_eq!(tree.graph.children(node1), &[node2]);
    assert_eq!(tree.graph.parent(node2), Some(node1));
    assert_eq!(tree.graph.parent(node4), None);
    assert_eq!(tree.graph.parent(node7), Some(node4));
    assert!(tree.graph.children(node4).contains(&node7));
    assert!(!tree.graph.is_attached(node7));
}

#[test]
fn test_removed_nodes_stay_resolvable_by_id() {
    let mut tree = SevenNodes::nested();
    let node4 = tree.nodes[3];
    let id = tree.graph.node(node4).and_then(|node| node.id()).unwrap();

    tree.graph.remove_subgraph(node4).unwrap();

    assert_eq!(tree.graph.get_node(id), Some(node4));
}

#[test]
fn test_relations_are_strict() {
    let tree = SevenNodes::nested();
    for &node in &tree.nodes {
        assert!(!tree.graph.is_ancestor(node, node));
        assert!(!tree.graph.is_successor(node, node));
    }
    assert!(tree.graph.is_ancestor(tree.nodes[5], tree.nodes[0]));
    assert!(tree.graph.is_successor(tree.nodes[0], tree.nodes[5]));
}

#[test]
fn test_walk_into_recording_context_ends_balanced() {
    let tree = SevenNodes::flat();
    let mut ctx = RecordingContext::new();
    let mut traversal = Traversal::new(&tree.graph, tree.graph.root());
    let mut visited = 0;

    crate::render::walk_scene(&mut traversal, &mut ctx, |_, _, _| {
        visited += 1;
        Ok(())
    })
    .unwrap();

    assert_eq!(visited, 8);
    assert_eq!(ctx.state().matrix_depth(), 1);
}
