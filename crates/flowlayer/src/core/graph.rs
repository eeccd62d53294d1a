//! Working copy of the caller's graph
//!
//! The engine repositions nodes freely but never creates or deletes them.
//! Building the working copy applies the tolerance policies: dangling edges,
//! unknown parents and parent cycles are dropped and logged, never returned
//! as errors.

use std::collections::{HashMap, HashSet};
use tracing::{debug, trace};
use unicode_width::UnicodeWidthStr;

use super::config::SizingConfig;
use super::input::{GraphInput, Labels};
use super::types::{Edge, Node, NodeShape, NodeSize};

/// Node/edge working set with index-based adjacency
///
/// Nodes keep insertion order, which is the tie-breaker for every
/// deterministic choice the layout stages make.
#[derive(Debug, Clone, Default)]
pub struct LayoutGraph {
    nodes: Vec<Node>,
    index: HashMap<String, usize>,
    edges: Vec<Edge>,
    /// `(source, target)` node indices, parallel to `edges`
    ends: Vec<(usize, usize)>,
    outgoing: Vec<Vec<usize>>,
    incoming: Vec<Vec<usize>>,
    parents: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
    dropped_edges: usize,
}

impl LayoutGraph {
    /// Build a working graph from explicit nodes and edges
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        let mut graph = LayoutGraph::default();
        for node in nodes {
            if graph.index.contains_key(&node.id) {
                debug!(id = %node.id, "Ignoring duplicate node id");
                continue;
            }
            graph.index.insert(node.id.clone(), graph.nodes.len());
            graph.nodes.push(node);
        }
        graph.outgoing = vec![Vec::new(); graph.nodes.len()];
        graph.incoming = vec![Vec::new(); graph.nodes.len()];

        for edge in edges {
            let (Some(&s), Some(&t)) = (graph.index.get(&edge.source), graph.index.get(&edge.target))
            else {
                debug!(source = %edge.source, target = %edge.target, "Dropping dangling edge");
                graph.dropped_edges += 1;
                continue;
            };
            let edge_index = graph.edges.len();
            graph.outgoing[s].push(edge_index);
            graph.incoming[t].push(edge_index);
            graph.ends.push((s, t));
            graph.edges.push(edge);
        }

        graph.resolve_parents();
        trace!(
            node_count = graph.nodes.len(),
            edge_count = graph.edges.len(),
            dropped = graph.dropped_edges,
            "Built layout graph"
        );
        graph
    }

    /// Build a working graph from an input document, sizing nodes that have no explicit size
    pub fn from_input(input: &GraphInput, sizing: &SizingConfig) -> Self {
        let nodes = input
            .nodes
            .iter()
            .map(|n| {
                let size = n.size.unwrap_or_else(|| {
                    let boxed = label_size(input.labels.get(&n.id), sizing);
                    match n.shape {
                        Some(NodeShape::Circle) => {
                            NodeSize::circle(boxed.width().max(boxed.height()) / 2.0)
                        }
                        _ => boxed,
                    }
                });
                Node {
                    parent: n.parent.clone(),
                    ..Node::new(n.id.clone(), size)
                }
            })
            .collect();

        let edges = input
            .edges
            .iter()
            .map(|e| {
                let mut edge = Edge::new(e.source.clone(), e.target.clone());
                if let Some(id) = &e.id {
                    edge.id = id.clone();
                }
                edge.distance = e.distance;
                edge.kind = e.kind;
                edge
            })
            .collect();

        let mut graph = LayoutGraph::new(nodes, edges);
        let explicit_ids: HashSet<&str> = input
            .nodes
            .iter()
            .filter(|n| n.size.is_some())
            .map(|n| n.id.as_str())
            .collect();
        let explicit: Vec<bool> = graph
            .nodes
            .iter()
            .map(|n| explicit_ids.contains(n.id.as_str()))
            .collect();
        graph.fit_containers(&explicit, sizing);
        graph
    }

    /// Drop unknown parents and break parent cycles, then index children
    fn resolve_parents(&mut self) {
        let n = self.nodes.len();
        self.parents = vec![None; n];
        self.children = vec![Vec::new(); n];

        for i in 0..n {
            let Some(parent_id) = self.nodes[i].parent.clone() else {
                continue;
            };
            match self.index.get(&parent_id) {
                Some(&p) if p != i => self.parents[i] = Some(p),
                _ => {
                    debug!(id = %self.nodes[i].id, parent = %parent_id, "Dropping invalid parent");
                    self.nodes[i].parent = None;
                }
            }
        }

        // Walk up from every node; a walk longer than n steps means a cycle
        for i in 0..n {
            let mut current = i;
            let mut steps = 0;
            while let Some(p) = self.parents[current] {
                steps += 1;
                if p == i || steps > n {
                    debug!(id = %self.nodes[current].id, "Breaking parent cycle");
                    self.parents[current] = None;
                    self.nodes[current].parent = None;
                    break;
                }
                current = p;
            }
        }

        for i in 0..n {
            if let Some(p) = self.parents[i] {
                self.children[p].push(i);
            }
        }
    }

    /// Size containers from their child count, deepest containers first
    fn fit_containers(&mut self, explicit: &[bool], sizing: &SizingConfig) {
        let mut containers: Vec<usize> = (0..self.nodes.len())
            .filter(|&i| !self.children[i].is_empty() && !explicit[i])
            .collect();
        containers.sort_by_key(|&i| std::cmp::Reverse(self.depth(i)));

        for c in containers {
            let children = &self.children[c];
            let (cols, rows) = container_grid(children.len());
            let cell_w = children
                .iter()
                .map(|&k| self.nodes[k].size.width())
                .fold(0.0, f64::max);
            let cell_h = children
                .iter()
                .map(|&k| self.nodes[k].size.height())
                .fold(0.0, f64::max);
            let pad = sizing.container_padding;
            let width = cols as f64 * cell_w + (cols + 1) as f64 * pad;
            let height = rows as f64 * cell_h + (rows + 1) as f64 * pad;
            trace!(id = %self.nodes[c].id, count = children.len(), width, height, "Sized container");
            self.nodes[c].size = NodeSize::rect(
                width.max(self.nodes[c].size.width()),
                height.max(self.nodes[c].size.height()),
            );
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of edges dropped because an endpoint was missing
    pub fn dropped_edge_count(&self) -> usize {
        self.dropped_edges
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index_of(id).map(|i| &self.nodes[i])
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.index_of(id).map(move |i| &mut self.nodes[i])
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    /// Working edges (dangling edges already removed)
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// `(source, target)` indices of edge `e`
    pub fn endpoints(&self, e: usize) -> (usize, usize) {
        self.ends[e]
    }

    /// Outgoing edge indices of node `i`
    pub fn outgoing(&self, i: usize) -> &[usize] {
        &self.outgoing[i]
    }

    /// Incoming edge indices of node `i`
    pub fn incoming(&self, i: usize) -> &[usize] {
        &self.incoming[i]
    }

    pub fn in_degree(&self, i: usize) -> usize {
        self.incoming[i].len()
    }

    pub fn out_degree(&self, i: usize) -> usize {
        self.outgoing[i].len()
    }

    /// Node indices pointing to `i`
    pub fn predecessors(&self, i: usize) -> impl Iterator<Item = usize> + '_ {
        self.incoming[i].iter().map(move |&e| self.ends[e].0)
    }

    pub fn parent_of(&self, i: usize) -> Option<usize> {
        self.parents[i]
    }

    pub fn children_of(&self, i: usize) -> &[usize] {
        &self.children[i]
    }

    /// Containment depth (0 for top-level nodes)
    pub fn depth(&self, i: usize) -> usize {
        let mut depth = 0;
        let mut current = i;
        while let Some(p) = self.parents[current] {
            depth += 1;
            current = p;
        }
        depth
    }
}

/// Columns and rows of the grid `count` children are arranged in
pub fn container_grid(count: usize) -> (usize, usize) {
    if count == 0 {
        return (0, 0);
    }
    let cols = (count as f64).sqrt().ceil() as usize;
    (cols, count.div_ceil(cols))
}

/// Size a node from its label, or fall back to the default box
pub fn label_size(label: Option<&String>, sizing: &SizingConfig) -> NodeSize {
    match label {
        Some(label) if !label.is_empty() => {
            let columns = UnicodeWidthStr::width(label.as_str()) as f64;
            let width = (columns * sizing.char_width + sizing.label_padding).max(sizing.min_node_width);
            NodeSize::rect(width, sizing.default_node_height)
        }
        _ => NodeSize::rect(sizing.default_node_width, sizing.default_node_height),
    }
}

/// Labels for the nodes of `graph`, falling back to the node id
pub fn display_labels(graph: &LayoutGraph, labels: &Labels) -> Vec<String> {
    graph
        .nodes()
        .iter()
        .map(|n| labels.get(&n.id).cloned().unwrap_or_else(|| n.id.clone()))
        .collect()
}
