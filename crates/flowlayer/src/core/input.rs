//! Plain-data input boundary
//!
//! `{ nodes: [{id, size?, parent?}], edges: [{id?, source, target, distance?, kind?}], labels? }`
//!
//! `labels` is the presentation side table. The engine only reads it to
//! size nodes that arrive without an explicit size.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::error::LayoutResult;
use super::types::{EdgeKind, NodeShape, NodeSize};

/// Node as supplied by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeInput {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<NodeSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Used only when `size` is absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<NodeShape>,
}

impl NodeInput {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            size: None,
            parent: None,
            shape: None,
        }
    }

    pub fn sized(mut self, size: NodeSize) -> Self {
        self.size = Some(size);
        self
    }

    pub fn shaped(mut self, shape: NodeShape) -> Self {
        self.shape = Some(shape);
        self
    }

    pub fn inside(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }
}

/// Edge as supplied by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub source: String,
    pub target: String,
    /// Preferred rest length; `weight` is accepted as an alias
    #[serde(default, alias = "weight", skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(default)]
    pub kind: EdgeKind,
}

impl EdgeInput {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: None,
            source: source.into(),
            target: target.into(),
            distance: None,
            kind: EdgeKind::default(),
        }
    }

    pub fn with_distance(mut self, distance: f64) -> Self {
        self.distance = Some(distance);
        self
    }
}

/// Caller-owned presentation metadata keyed by node id
pub type Labels = HashMap<String, String>;

/// A complete graph document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphInput {
    #[serde(default)]
    pub nodes: Vec<NodeInput>,
    #[serde(default)]
    pub edges: Vec<EdgeInput>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub labels: Labels,
}

impl GraphInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON graph document
    pub fn from_json(input: &str) -> LayoutResult<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Add a node with a default size
    pub fn node(mut self, id: impl Into<String>) -> Self {
        self.nodes.push(NodeInput::new(id));
        self
    }

    pub fn node_input(mut self, node: NodeInput) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn edge(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.edges.push(EdgeInput::new(source, target));
        self
    }

    pub fn edge_input(mut self, edge: EdgeInput) -> Self {
        self.edges.push(edge);
        self
    }

    pub fn label(mut self, id: impl Into<String>, label: impl Into<String>) -> Self {
        self.labels.insert(id.into(), label.into());
        self
    }

    /// Build a graph from `(source, target)` pairs, creating nodes in first-seen order
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut input = GraphInput::new();
        let mut seen = std::collections::HashSet::new();
        for (source, target) in pairs {
            for id in [source, target] {
                if seen.insert(id.to_string()) {
                    input.nodes.push(NodeInput::new(id));
                }
            }
            input.edges.push(EdgeInput::new(source, target));
        }
        input
    }
}
