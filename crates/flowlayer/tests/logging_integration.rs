//! Integration tests for tracing spans and events
//!
//! Every stage runs under a TRACE subscriber so span and event fields
//! are formatted at least once.

use flowlayer::core::logging::init_logging;
use flowlayer::prelude::*;
use tracing_subscriber::util::SubscriberInitExt;

fn flow() -> GraphInput {
    GraphInput::from_pairs([("Start", "Check"), ("Check", "Retry"), ("Retry", "Check"), ("Check", "End")])
}

#[test]
fn test_spans_during_full_layout() {
    let _guard = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .set_default();

    let snapshot = flowlayer::layout(flow()).unwrap();
    assert_eq!(snapshot.positions.len(), 4);
}

#[test]
fn test_spans_during_drag() {
    let _guard = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .set_default();

    let mut engine = LayoutEngine::default();
    engine.set_graph(flow());
    engine.run(30);
    engine.begin_drag("Retry").unwrap();
    let start = engine.position("Start").unwrap();
    let placed = engine.drag_to("Retry", start).unwrap();
    engine.end_drag("Retry").unwrap();
    assert!(placed.is_finite());
}

#[test]
fn test_preview_with_logging() {
    let _ = init_logging(Some("debug"), Some("compact"));

    let text = flowlayer::preview(flow(), CharacterSet::Ascii).unwrap();
    assert!(text.contains("Check"));
}

#[test]
fn test_layering_with_logging() {
    let _ = init_logging(Some("debug"), Some("compact"));

    let config = LayoutConfig::default();
    let graph = LayoutGraph::from_input(&flow(), &config.sizing);
    let layering = TopologicalLayerer::new().layout(&graph).unwrap();
    assert_eq!(layering.cut_edge_pairs(&graph), vec![("Retry".to_string(), "Check".to_string())]);
}
