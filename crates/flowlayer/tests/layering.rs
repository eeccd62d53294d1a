//! Level assignment tests
//!
//! Covers the longest-path rules, the cycle policy and the termination
//! bound, including property tests over random graphs.

use flowlayer::{assign_levels, Edge, LayoutGraph, Node, NodeSize, TopologicalLayerer};
use flowlayer::LayoutAlgorithm;
use proptest::prelude::*;

fn graph(ids: &[&str], edges: &[(&str, &str)]) -> LayoutGraph {
    LayoutGraph::new(
        ids.iter()
            .map(|id| Node::new(*id, NodeSize::rect(120.0, 40.0)))
            .collect(),
        edges.iter().map(|(s, t)| Edge::new(*s, *t)).collect(),
    )
}

fn indexed_graph(n: usize, edges: &[(usize, usize)]) -> LayoutGraph {
    LayoutGraph::new(
        (0..n)
            .map(|i| Node::new(format!("n{}", i), NodeSize::rect(120.0, 40.0)))
            .collect(),
        edges
            .iter()
            .map(|(s, t)| Edge::new(format!("n{}", s % n), format!("n{}", t % n)))
            .collect(),
    )
}

#[test]
fn test_shortcut_edge_does_not_shorten_chain() {
    let g = graph(
        &["A", "B", "C", "D", "E"],
        &[("A", "B"), ("B", "C"), ("C", "D"), ("A", "D")],
    );
    let layering = assign_levels(&g, None);
    let levels: Vec<_> = ["A", "B", "C", "D", "E"]
        .iter()
        .map(|id| layering.level(id).unwrap())
        .collect();
    assert_eq!(levels, vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_diamond() {
    let g = graph(
        &["S", "L", "R", "T"],
        &[("S", "L"), ("S", "R"), ("L", "T"), ("R", "T")],
    );
    let layering = assign_levels(&g, None);
    assert_eq!(layering.level("L"), Some(1));
    assert_eq!(layering.level("R"), Some(1));
    assert_eq!(layering.level("T"), Some(2));
    assert_eq!(layering.columns().len(), 3);
}

#[test]
fn test_loop_back_to_start_is_cut() {
    // review loop: Submit -> Review -> Fix -> Review
    let g = graph(
        &["Submit", "Review", "Fix", "Done"],
        &[
            ("Submit", "Review"),
            ("Review", "Fix"),
            ("Fix", "Review"),
            ("Review", "Done"),
        ],
    );
    let layering = assign_levels(&g, None);
    assert_eq!(
        layering.cut_edge_pairs(&g),
        vec![("Fix".to_string(), "Review".to_string())]
    );
    assert_eq!(layering.level("Submit"), Some(0));
    assert_eq!(layering.level("Review"), Some(1));
    assert_eq!(layering.level("Fix"), Some(2));
    assert_eq!(layering.level("Done"), Some(2));
}

#[test]
fn test_layering_does_not_move_nodes() {
    let mut g = graph(&["A", "B"], &[("A", "B")]);
    g.node_mut("B").unwrap().position.x = 42.0;
    let before = g.nodes().to_vec();
    let _ = assign_levels(&g, None);
    assert_eq!(g.nodes(), &before[..]);
}

#[test]
fn test_layerer_through_trait() {
    let g = graph(&["A", "B", "C"], &[("A", "B"), ("B", "C"), ("C", "A")]);
    let layering = TopologicalLayerer::with_root("B").layout(&g).unwrap();
    assert_eq!(layering.root(), Some("B"));
    assert_eq!(layering.level("C"), Some(1));
    assert_eq!(layering.level("A"), Some(2));
}

fn random_graph() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    (1usize..14, prop::collection::vec((0usize..14, 0usize..14), 0..40))
}

proptest! {
    #[test]
    fn prop_uncut_edges_point_forward((n, edges) in random_graph()) {
        let g = indexed_graph(n, &edges);
        let layering = assign_levels(&g, None);
        for e in 0..g.edge_count() {
            if layering.is_cut(e) {
                continue;
            }
            let (s, t) = g.endpoints(e);
            prop_assert!(layering.level_at(t) >= layering.level_at(s) + 1);
        }
    }

    #[test]
    fn prop_relaxations_bounded((n, edges) in random_graph()) {
        let g = indexed_graph(n, &edges);
        let layering = assign_levels(&g, None);
        prop_assert!(layering.relaxations() <= g.node_count() * g.edge_count().max(1));
    }

    #[test]
    fn prop_root_is_level_zero((n, edges) in random_graph(), pick in 0usize..14) {
        let g = indexed_graph(n, &edges);
        let root = format!("n{}", pick % n);
        let layering = assign_levels(&g, Some(&root));
        prop_assert_eq!(layering.root(), Some(root.as_str()));
        prop_assert_eq!(layering.level(&root), Some(0));
    }

    #[test]
    fn prop_every_node_gets_a_level((n, edges) in random_graph()) {
        let g = indexed_graph(n, &edges);
        let layering = assign_levels(&g, None);
        prop_assert_eq!(layering.levels().len(), n);
        prop_assert!(layering.max_level() <= n);
    }
}
