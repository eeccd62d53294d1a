//! Flowlayer - layered force-directed layout for process-flow graphs
//!
//! Takes a plain node/edge graph and produces 2D positions. Nodes are first
//! assigned to levels by longest-path layering, then refined by a
//! d3-style force simulation that keeps each level in its own column.
//! While a node is dragged, a collision resolver keeps it clear of its
//! neighbours.
//!
//! # Quick Start
//!
//! ```rust
//! use flowlayer::{layout, GraphInput};
//!
//! let graph = GraphInput::from_pairs([("A", "B"), ("B", "C")]);
//! let snapshot = layout(graph).unwrap();
//! assert!(snapshot.positions["C"].x > snapshot.positions["A"].x);
//! ```
//!
//! # Driving the engine
//!
//! ```rust
//! use flowlayer::prelude::*;
//!
//! let mut engine = LayoutEngine::new(LayoutConfig::default());
//! engine.set_graph(GraphInput::from_pairs([("A", "B"), ("A", "C")]));
//!
//! // one snapshot per tick until the simulation cools down
//! for snapshot in engine.ticks(10) {
//!     assert_eq!(snapshot.positions.len(), 3);
//! }
//!
//! // direct manipulation
//! engine.begin_drag("B").unwrap();
//! let placed = engine.drag_to("B", Point::new(0.0, 0.0)).unwrap();
//! engine.end_drag("B").unwrap();
//! assert!(placed.is_finite());
//! ```

pub mod core;
pub mod layout;
pub mod render;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use crate::core::*;
pub use crate::layout::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        CharacterSet, DragMode, GraphInput, LayoutAlgorithm, LayoutConfig, LayoutError,
        LayoutGraph, NodeSize, Point, Rect, TopologySignature,
    };
    pub use crate::layout::{
        assign_levels, ForceDirectedLayout, Layering, LayoutEngine, PositionSnapshot, Relayout,
        TopologicalLayerer,
    };
    pub use crate::render::{LayoutView, PreviewRenderer, Renderer};
}

/// Lay out a graph with the default configuration and run it to convergence
///
/// # Example
/// ```rust
/// use flowlayer::{layout, GraphInput};
///
/// let snapshot = layout(GraphInput::new().node("only")).unwrap();
/// assert_eq!(snapshot.positions.len(), 1);
/// ```
pub fn layout(input: GraphInput) -> anyhow::Result<PositionSnapshot> {
    layout_with_config(input, LayoutConfig::default())
}

/// Lay out a graph with a specific configuration
pub fn layout_with_config(input: GraphInput, config: LayoutConfig) -> anyhow::Result<PositionSnapshot> {
    let max_ticks = config.expected_ticks() + 1;
    let mut engine = LayoutEngine::new(config);
    engine.set_graph(input);
    Ok(engine.run(max_ticks))
}

/// Parse a JSON graph document and lay it out
///
/// # Example
/// ```rust
/// let snapshot = flowlayer::layout_json(r#"{"nodes": [{"id": "A"}], "edges": []}"#).unwrap();
/// assert!(snapshot.positions.contains_key("A"));
/// ```
pub fn layout_json(input: &str) -> anyhow::Result<PositionSnapshot> {
    layout(GraphInput::from_json(input)?)
}

/// Lay out a graph and render a text preview of the result
///
/// # Example
/// ```rust
/// use flowlayer::{preview, CharacterSet, GraphInput};
///
/// let text = preview(GraphInput::from_pairs([("A", "B")]), CharacterSet::Ascii).unwrap();
/// assert!(text.contains('A'));
/// ```
pub fn preview(input: GraphInput, style: CharacterSet) -> anyhow::Result<String> {
    use crate::render::{LayoutView, PreviewRenderer, Renderer as _};

    let config = LayoutConfig::default();
    let max_ticks = config.expected_ticks() + 1;
    let mut engine = LayoutEngine::new(config);
    engine.set_graph(input);
    engine.run(max_ticks);
    PreviewRenderer::with_style(style).render(&LayoutView::of_engine(&engine))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_chain() {
        let snapshot = layout(GraphInput::from_pairs([("A", "B"), ("B", "C")])).unwrap();
        assert_eq!(snapshot.positions.len(), 3);
        assert!(snapshot.alpha < LayoutConfig::default().alpha_min);
    }

    #[test]
    fn test_layout_json_rejects_garbage() {
        assert!(layout_json("not json").is_err());
    }

    #[test]
    fn test_layout_empty_graph() {
        let snapshot = layout(GraphInput::new()).unwrap();
        assert!(snapshot.positions.is_empty());
    }

    #[test]
    fn test_preview_styles() {
        let graph = GraphInput::from_pairs([("A", "B")]);
        let ascii = preview(graph.clone(), CharacterSet::Ascii).unwrap();
        assert!(ascii.is_ascii());
        let unicode = preview(graph, CharacterSet::Unicode).unwrap();
        assert!(unicode.contains('┌'));
    }
}
