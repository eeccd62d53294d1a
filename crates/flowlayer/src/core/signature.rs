//! Topology signatures
//!
//! A signature is the sorted node-id set plus the sorted set of
//! `(source, target)` pairs of the working edges. Positions, sizes and
//! edge ids are not part of it, so dragging a node or resizing it never
//! triggers a relayout.

use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};

use super::graph::LayoutGraph;
use super::input::GraphInput;

/// Canonical structural fingerprint of a graph
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TopologySignature {
    nodes: BTreeSet<String>,
    edges: BTreeSet<(String, String)>,
}

impl TopologySignature {
    /// Signature of an input document. Dangling edges are left out, matching the working graph.
    pub fn of_input(input: &GraphInput) -> Self {
        let ids: HashSet<&str> = input.nodes.iter().map(|n| n.id.as_str()).collect();
        let nodes = ids.iter().map(|id| id.to_string()).collect();
        let edges = input
            .edges
            .iter()
            .filter(|e| ids.contains(e.source.as_str()) && ids.contains(e.target.as_str()))
            .map(|e| (e.source.clone(), e.target.clone()))
            .collect();
        Self { nodes, edges }
    }

    /// Signature of a working graph
    pub fn of_graph(graph: &LayoutGraph) -> Self {
        let nodes = graph.nodes().iter().map(|n| n.id.clone()).collect();
        let edges = graph
            .edges()
            .iter()
            .map(|e| (e.source.clone(), e.target.clone()))
            .collect();
        Self { nodes, edges }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// 64-bit digest of the canonical form
    ///
    /// Built on `DefaultHasher`, so the value is only comparable between
    /// runs of the same build. Compare the `Display` form for anything
    /// persisted.
    pub fn digest(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

/// Canonical string form: `A,B,C|A>B,B>C`
impl fmt::Display for TopologySignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nodes: Vec<&str> = self.nodes.iter().map(String::as_str).collect();
        let edges: Vec<String> = self
            .edges
            .iter()
            .map(|(s, t)| format!("{}>{}", s, t))
            .collect();
        write!(f, "{}|{}", nodes.join(","), edges.join(","))
    }
}

/// True when `next` differs structurally from `current`.
///
/// Pure and idempotent: no state is touched, so asking twice about the same
/// graph gives the same answer.
pub fn should_relayout(current: Option<&TopologySignature>, next: &GraphInput) -> bool {
    match current {
        Some(signature) => *signature != TopologySignature::of_input(next),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SizingConfig;
    use crate::core::input::{EdgeInput, NodeInput};
    use crate::core::types::NodeSize;

    #[test]
    fn test_order_does_not_matter() {
        let a = GraphInput::new().node("A").node("B").edge("A", "B").edge("B", "A");
        let b = GraphInput::new().node("B").node("A").edge("B", "A").edge("A", "B");
        assert_eq!(TopologySignature::of_input(&a), TopologySignature::of_input(&b));
    }

    #[test]
    fn test_sizes_and_edge_ids_do_not_matter() {
        let a = GraphInput::new().node("A").node("B").edge("A", "B");
        let mut edge = EdgeInput::new("A", "B").with_distance(10.0);
        edge.id = Some("e1".to_string());
        let b = GraphInput::new()
            .node_input(NodeInput::new("A").sized(NodeSize::circle(4.0)))
            .node("B")
            .edge_input(edge);
        assert!(!should_relayout(Some(&TopologySignature::of_input(&a)), &b));
    }

    #[test]
    fn test_dangling_edges_ignored() {
        let a = GraphInput::new().node("A").node("B").edge("A", "B");
        let b = a.clone().edge("A", "ghost");
        assert_eq!(TopologySignature::of_input(&a), TopologySignature::of_input(&b));
    }

    #[test]
    fn test_input_and_graph_agree() {
        let input = GraphInput::new()
            .node("A")
            .node("B")
            .node("C")
            .edge("A", "B")
            .edge("B", "C")
            .edge("C", "nowhere");
        let graph = LayoutGraph::from_input(&input, &SizingConfig::default());
        assert_eq!(TopologySignature::of_input(&input), TopologySignature::of_graph(&graph));
    }

    #[test]
    fn test_structural_change_detected() {
        let a = GraphInput::new().node("A").node("B").edge("A", "B");
        let signature = TopologySignature::of_input(&a);
        assert!(should_relayout(Some(&signature), &a.clone().edge("B", "A")));
        assert!(should_relayout(Some(&signature), &a.clone().node("C")));
        assert!(should_relayout(None, &a));
    }

    #[test]
    fn test_display_and_digest() {
        let input = GraphInput::new().node("B").node("A").edge("A", "B");
        let signature = TopologySignature::of_input(&input);
        assert_eq!(signature.to_string(), "A,B|A>B");
        assert_eq!(signature.digest(), TopologySignature::of_input(&input).digest());
    }
}
