//! Core type definitions for the layout engine
//!
//! Strict node and edge records holding only what the engine needs.
//! Presentation metadata (labels, colours) lives in a caller-owned side
//! table keyed by node id.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::geometry::{Point, Rect};

/// Character set for the ASCII preview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum CharacterSet {
    /// Pure ASCII characters only: + - | .
    Ascii,
    /// Unicode box-drawing characters: ┌ ┐ └ ┘ ─ │
    #[default]
    Unicode,
}

impl CharacterSet {
    /// Returns true if this character set uses only ASCII
    pub fn is_ascii(&self) -> bool {
        matches!(self, CharacterSet::Ascii)
    }
}

impl fmt::Display for CharacterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CharacterSet::Ascii => write!(f, "ascii"),
            CharacterSet::Unicode => write!(f, "unicode"),
        }
    }
}

/// Bounding shape of a node
///
/// Circles collide by radius, everything else collides as an
/// axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeSize {
    Rect { width: f64, height: f64 },
    Circle { radius: f64 },
}

impl NodeSize {
    pub fn rect(width: f64, height: f64) -> Self {
        NodeSize::Rect { width, height }
    }

    pub fn circle(radius: f64) -> Self {
        NodeSize::Circle { radius }
    }

    pub fn width(&self) -> f64 {
        match *self {
            NodeSize::Rect { width, .. } => width,
            NodeSize::Circle { radius } => radius * 2.0,
        }
    }

    pub fn height(&self) -> f64 {
        match *self {
            NodeSize::Rect { height, .. } => height,
            NodeSize::Circle { radius } => radius * 2.0,
        }
    }

    /// Radius of the circle enclosing the shape
    pub fn bounding_radius(&self) -> f64 {
        match *self {
            NodeSize::Rect { width, height } => (width * width + height * height).sqrt() / 2.0,
            NodeSize::Circle { radius } => radius,
        }
    }

    pub fn is_circle(&self) -> bool {
        matches!(self, NodeSize::Circle { .. })
    }

    /// Bounding box of this shape centred on `center`
    pub fn bounds_at(&self, center: Point) -> Rect {
        Rect::centered(center, self.width(), self.height())
    }
}

impl fmt::Display for NodeSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeSize::Rect { width, height } => write!(f, "{}x{}", width, height),
            NodeSize::Circle { radius } => write!(f, "r{}", radius),
        }
    }
}

/// Shape hint for nodes that arrive without an explicit size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeShape {
    #[default]
    Rect,
    Circle,
}

/// Edge tag. Only affects rendering, never layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// Parent/child style relationship
    #[default]
    Structural,
    /// Step-to-step flow
    Sequential,
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeKind::Structural => write!(f, "structural"),
            EdgeKind::Sequential => write!(f, "sequential"),
        }
    }
}

/// A positioned node in the working graph
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Unique identifier, stable across updates
    pub id: String,
    /// Centre of the node
    pub position: Point,
    /// Zero at rest
    pub velocity: Point,
    pub size: NodeSize,
    /// Topological layer, filled in by the layerer
    pub level: usize,
    /// Pinned position; the simulation never integrates a fixed node
    pub fixed: Option<Point>,
    /// Containing node, if any
    pub parent: Option<String>,
}

impl Node {
    /// Create a node at the origin
    pub fn new(id: impl Into<String>, size: NodeSize) -> Self {
        Self {
            id: id.into(),
            position: Point::ZERO,
            velocity: Point::ZERO,
            size,
            level: 0,
            fixed: None,
            parent: None,
        }
    }

    /// Create a node inside a parent container
    pub fn with_parent(id: impl Into<String>, size: NodeSize, parent: impl Into<String>) -> Self {
        Self {
            parent: Some(parent.into()),
            ..Self::new(id, size)
        }
    }

    /// Current bounding box
    pub fn bounds(&self) -> Rect {
        self.size.bounds_at(self.position)
    }
}

/// A directed edge between two nodes
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    /// Rest length override for the link force
    pub distance: Option<f64>,
    pub kind: EdgeKind,
}

impl Edge {
    /// Create an edge whose id is derived from its endpoints
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: format!("{}->{}", source, target),
            source,
            target,
            distance: None,
            kind: EdgeKind::default(),
        }
    }

    /// Create an edge with a preferred rest length
    pub fn with_distance(
        source: impl Into<String>,
        target: impl Into<String>,
        distance: f64,
    ) -> Self {
        Self {
            distance: Some(distance),
            ..Self::new(source, target)
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}
