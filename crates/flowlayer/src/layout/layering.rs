//! Topological layering
//!
//! Longest-path BFS level assignment. Edges always point from a lower level
//! to a higher one, except edges that had to be cut to break a cycle.
//!
//! Cycle policy: back edges found by a DFS rooted at the layout root (then
//! at every other node in insertion order) are cut and excluded from the
//! BFS, as are self-loops and every edge into the root. Cut edges are
//! reported so callers can draw them as backward edges.

use anyhow::Result;
use std::collections::{BTreeMap, VecDeque};
use tracing::{debug, span, trace, Level};

use crate::core::{LayoutAlgorithm, LayoutGraph};

/// Output of the layerer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layering {
    /// Level per node index
    levels: Vec<usize>,
    ids: Vec<String>,
    /// Cut flag per edge index
    cut: Vec<bool>,
    root: Option<usize>,
    relaxations: usize,
}

impl Layering {
    /// Level of the node with the given id
    pub fn level(&self, id: &str) -> Option<usize> {
        self.ids
            .iter()
            .position(|n| n == id)
            .map(|i| self.levels[i])
    }

    /// Level of node index `i`
    pub fn level_at(&self, i: usize) -> usize {
        self.levels[i]
    }

    /// Levels by node index
    pub fn levels(&self) -> &[usize] {
        &self.levels
    }

    /// Levels keyed by node id
    pub fn by_id(&self) -> BTreeMap<String, usize> {
        self.ids
            .iter()
            .cloned()
            .zip(self.levels.iter().copied())
            .collect()
    }

    pub fn max_level(&self) -> usize {
        self.levels.iter().copied().max().unwrap_or(0)
    }

    /// Number of distinct columns
    pub fn level_count(&self) -> usize {
        if self.levels.is_empty() {
            0
        } else {
            self.max_level() + 1
        }
    }

    /// True if edge index `e` was excluded from layering
    pub fn is_cut(&self, e: usize) -> bool {
        self.cut.get(e).copied().unwrap_or(false)
    }

    /// Indices of the cut edges
    pub fn cut_edges(&self) -> Vec<usize> {
        (0..self.cut.len()).filter(|&e| self.cut[e]).collect()
    }

    /// `(source, target)` ids of the cut edges
    pub fn cut_edge_pairs(&self, graph: &LayoutGraph) -> Vec<(String, String)> {
        self.cut_edges()
            .into_iter()
            .map(|e| {
                let edge = &graph.edges()[e];
                (edge.source.clone(), edge.target.clone())
            })
            .collect()
    }

    /// Id of the level-0 root
    pub fn root(&self) -> Option<&str> {
        self.root.map(|r| self.ids[r].as_str())
    }

    /// Number of level updates performed by the BFS
    pub fn relaxations(&self) -> usize {
        self.relaxations
    }

    /// Node indices grouped by level, insertion order within a level
    pub fn columns(&self) -> Vec<Vec<usize>> {
        let mut columns = vec![Vec::new(); self.level_count()];
        for (i, &level) in self.levels.iter().enumerate() {
            columns[level].push(i);
        }
        columns
    }
}

/// Assign a level to every node of `graph`.
///
/// `start` forces a node to level 0. Without it the source with the most
/// outgoing edges is used, or the first node when every node sits on a cycle.
/// Nodes not reached from any seed land one column after the deepest level.
pub fn assign_levels(graph: &LayoutGraph, start: Option<&str>) -> Layering {
    let layer_span = span!(
        Level::DEBUG,
        "assign_levels",
        node_count = graph.node_count(),
        edge_count = graph.edge_count()
    );
    let _enter = layer_span.enter();

    let n = graph.node_count();
    let ids: Vec<String> = graph.nodes().iter().map(|node| node.id.clone()).collect();
    if n == 0 {
        return Layering {
            ids,
            cut: vec![false; graph.edge_count()],
            ..Default::default()
        };
    }

    let root = choose_root(graph, start);
    let cut = find_cut_edges(graph, root);

    let mut in_degree = vec![0usize; n];
    let mut out_degree = vec![0usize; n];
    for (e, &is_cut) in cut.iter().enumerate() {
        if !is_cut {
            let (s, t) = graph.endpoints(e);
            out_degree[s] += 1;
            in_degree[t] += 1;
        }
    }

    let mut levels: Vec<Option<usize>> = vec![None; n];
    let mut queued = vec![false; n];
    let mut queue = VecDeque::new();

    levels[root] = Some(0);
    queued[root] = true;
    queue.push_back(root);
    for i in 0..n {
        if i != root && in_degree[i] == 0 && out_degree[i] > 0 {
            levels[i] = Some(0);
            queued[i] = true;
            queue.push_back(i);
        }
    }
    trace!(seeds = queue.len(), root = %ids[root], "Seeded level 0");

    let mut relaxations = 0;
    while let Some(u) = queue.pop_front() {
        queued[u] = false;
        let next = levels[u].unwrap_or(0) + 1;
        for &e in graph.outgoing(u) {
            if cut[e] {
                continue;
            }
            let v = graph.endpoints(e).1;
            if levels[v].map_or(true, |current| current < next) {
                levels[v] = Some(next);
                relaxations += 1;
                if !queued[v] {
                    queued[v] = true;
                    queue.push_back(v);
                }
            }
        }
    }

    let max_assigned = levels.iter().flatten().copied().max().unwrap_or(0);
    let unreached = levels.iter().filter(|l| l.is_none()).count();
    let levels: Vec<usize> = levels
        .into_iter()
        .map(|l| l.unwrap_or(max_assigned + 1))
        .collect();

    let cut_count = cut.iter().filter(|&&c| c).count();
    debug!(
        root = %ids[root],
        max_level = max_assigned,
        unreached,
        cut_edges = cut_count,
        relaxations,
        "Assigned levels"
    );

    Layering {
        levels,
        ids,
        cut,
        root: Some(root),
        relaxations,
    }
}

fn choose_root(graph: &LayoutGraph, start: Option<&str>) -> usize {
    if let Some(id) = start {
        match graph.index_of(id) {
            Some(i) => return i,
            None => debug!(start = id, "Layout root not in graph, choosing automatically"),
        }
    }

    let mut best: Option<usize> = None;
    for i in 0..graph.node_count() {
        if graph.in_degree(i) != 0 {
            continue;
        }
        if best.map_or(true, |b| graph.out_degree(i) > graph.out_degree(b)) {
            best = Some(i);
        }
    }
    best.unwrap_or(0)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    New,
    OnStack,
    Done,
}

/// Flag self-loops, edges into the root and DFS back edges
fn find_cut_edges(graph: &LayoutGraph, root: usize) -> Vec<bool> {
    let n = graph.node_count();
    let mut cut: Vec<bool> = (0..graph.edge_count())
        .map(|e| {
            let (s, t) = graph.endpoints(e);
            s == t || t == root
        })
        .collect();

    let mut state = vec![Visit::New; n];
    let order = std::iter::once(root).chain((0..n).filter(|&i| i != root));
    for start in order {
        if state[start] != Visit::New {
            continue;
        }
        // (node, position in its outgoing list)
        let mut stack = vec![(start, 0usize)];
        state[start] = Visit::OnStack;
        while let Some(frame) = stack.last_mut() {
            let (u, pos) = *frame;
            let outgoing = graph.outgoing(u);
            if pos == outgoing.len() {
                state[u] = Visit::Done;
                stack.pop();
                continue;
            }
            frame.1 += 1;
            let e = outgoing[pos];
            if cut[e] {
                continue;
            }
            let v = graph.endpoints(e).1;
            match state[v] {
                Visit::OnStack => {
                    trace!(source = %graph.nodes()[u].id, target = %graph.nodes()[v].id, "Cutting back edge");
                    cut[e] = true;
                }
                Visit::New => {
                    state[v] = Visit::OnStack;
                    stack.push((v, 0));
                }
                Visit::Done => {}
            }
        }
    }
    cut
}

/// Layering as a pluggable layout stage
#[derive(Debug, Clone, Default)]
pub struct TopologicalLayerer {
    start: Option<String>,
}

impl TopologicalLayerer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Force `start` to level 0
    pub fn with_root(start: impl Into<String>) -> Self {
        Self {
            start: Some(start.into()),
        }
    }
}

impl LayoutAlgorithm for TopologicalLayerer {
    type Output = Layering;

    fn layout(&self, graph: &LayoutGraph) -> Result<Self::Output> {
        Ok(assign_levels(graph, self.start.as_deref()))
    }

    fn name(&self) -> &'static str {
        "topological"
    }
}
