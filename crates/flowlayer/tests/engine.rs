//! Editing-session flows against the layout engine

use flowlayer::{
    DragMode, GraphInput, LayoutConfig, LayoutEngine, LayoutError, NodeInput, NodeSize, Point,
    Relayout,
};

fn review_loop() -> GraphInput {
    GraphInput::from_pairs([
        ("Submit", "Review"),
        ("Review", "Fix"),
        ("Fix", "Review"),
        ("Review", "Done"),
    ])
}

fn settled(input: GraphInput, config: LayoutConfig) -> LayoutEngine {
    let max_ticks = config.expected_ticks() + 1;
    let mut engine = LayoutEngine::new(config);
    engine.set_graph(input);
    engine.run(max_ticks);
    engine
}

#[test]
fn test_should_relayout_is_pure() {
    let mut engine = LayoutEngine::default();
    let input = review_loop();
    assert!(engine.should_relayout(&input));
    assert!(engine.should_relayout(&input));
    assert!(engine.signature().is_none());

    engine.set_graph(input.clone());
    let signature = engine.signature().cloned();
    assert!(!engine.should_relayout(&input));
    assert!(!engine.should_relayout(&input));
    assert_eq!(engine.signature().cloned(), signature);
}

#[test]
fn test_label_and_size_edits_are_warm() {
    let mut engine = settled(review_loop(), LayoutConfig::default());
    let before = engine.positions();

    let mut edited = review_loop().label("Fix", "Fix the findings");
    edited.nodes[0] = NodeInput::new("Submit").sized(NodeSize::circle(30.0));
    assert!(!engine.should_relayout(&edited));
    assert_eq!(engine.set_graph(edited), Relayout::Warm);

    assert_eq!(engine.positions().positions, before.positions);
    assert_eq!(engine.labels().get("Fix").map(String::as_str), Some("Fix the findings"));
    assert!(engine.graph().node("Submit").unwrap().size.is_circle());
}

#[test]
fn test_new_edge_is_cold() {
    let mut engine = settled(review_loop(), LayoutConfig::default());
    assert!(engine.is_settled());
    assert_eq!(engine.set_graph(review_loop().edge("Done", "Submit")), Relayout::Cold);
    assert!(!engine.is_settled());
}

#[test]
fn test_review_loop_levels_and_cut() {
    let engine = settled(review_loop(), LayoutConfig::default());
    let levels = engine.levels().by_id();
    assert_eq!(levels["Submit"], 0);
    assert_eq!(levels["Review"], 1);
    assert_eq!(levels["Fix"], 2);
    assert_eq!(levels["Done"], 2);
    assert_eq!(engine.cut_edges(), vec![("Fix".to_string(), "Review".to_string())]);
}

#[test]
fn test_drag_onto_neighbour_is_pushed_clear() {
    let mut engine = settled(review_loop(), LayoutConfig::default());
    let gap = engine.config().collision_gap;
    let target = engine.position("Submit").unwrap();

    engine.begin_drag("Review").unwrap();
    let placed = engine.drag_to("Review", target).unwrap();
    assert_ne!(placed, target);

    let graph = engine.graph();
    let dragged = graph.node("Review").unwrap().bounds();
    for node in graph.nodes().iter().filter(|n| n.id != "Review") {
        assert!(
            !dragged.intersects(&node.bounds().inflate(gap - 1e-6)),
            "Review overlaps {}",
            node.id
        );
    }

    let released = engine.end_drag("Review").unwrap();
    assert_eq!(released, placed);
    assert_eq!(engine.graph().node("Review").unwrap().fixed, None);
}

#[test]
fn test_one_drag_at_a_time() {
    let mut engine = settled(review_loop(), LayoutConfig::default());
    engine.begin_drag("Fix").unwrap();

    let err = engine.begin_drag("Done").unwrap_err();
    assert!(matches!(err, LayoutError::DragInProgress { .. }));
    assert!(matches!(
        engine.drag_to("Done", Point::ZERO),
        Err(LayoutError::NotDragging { .. })
    ));
    assert!(matches!(
        engine.end_drag("Done"),
        Err(LayoutError::NotDragging { .. })
    ));

    engine.end_drag("Fix").unwrap();
    engine.begin_drag("Done").unwrap();
    assert_eq!(engine.dragged_node(), Some("Done"));
}

#[test]
fn test_paused_drag_holds_every_other_node() {
    let config = LayoutConfig::default().with_drag_mode(DragMode::Paused);
    let mut engine = LayoutEngine::new(config);
    engine.set_graph(review_loop());
    engine.run(10);

    let before = engine.positions();
    engine.begin_drag("Done").unwrap();
    assert!(engine.step().is_none());
    engine.drag_to("Done", Point::new(2000.0, 2000.0)).unwrap();
    assert!(engine.step().is_none());

    let during = engine.positions();
    for id in ["Submit", "Review", "Fix"] {
        assert_eq!(during.get(id), before.get(id));
    }
    assert_eq!(during.get("Done"), Some(Point::new(2000.0, 2000.0)));

    engine.end_drag("Done").unwrap();
    assert!(engine.step().is_some());
}

#[test]
fn test_reheat_drag_wakes_settled_layout() {
    let mut engine = settled(review_loop(), LayoutConfig::default());
    assert!(engine.step().is_none());

    engine.begin_drag("Fix").unwrap();
    assert!(engine.alpha() >= engine.config().drag_alpha_target);
    let pin = engine.drag_to("Fix", Point::new(900.0, -400.0)).unwrap();
    for snapshot in engine.ticks(20) {
        assert_eq!(snapshot.get("Fix"), Some(pin));
    }
    engine.end_drag("Fix").unwrap();
    assert!(!engine.is_settled());
}

#[test]
fn test_topology_change_ends_drag() {
    let mut engine = settled(review_loop(), LayoutConfig::default());
    engine.begin_drag("Fix").unwrap();
    engine.set_graph(review_loop().node("Archive").edge("Done", "Archive"));
    assert_eq!(engine.dragged_node(), None);
    assert_eq!(engine.graph().node("Fix").unwrap().fixed, None);
    assert!(engine.begin_drag("Archive").is_ok());
}

#[test]
fn test_pin_survives_cold_update() {
    let mut engine = settled(review_loop(), LayoutConfig::default());
    let pin = Point::new(-50.0, 75.0);
    engine.set_fixed("Review", Some(pin)).unwrap();
    assert_eq!(engine.set_graph(review_loop().node("Archive")), Relayout::Cold);
    assert_eq!(engine.graph().node("Review").unwrap().fixed, Some(pin));

    engine.run(500);
    assert_eq!(engine.position("Review"), Some(pin));
    assert_eq!(engine.graph().node("Archive").unwrap().fixed, None);
}

#[test]
fn test_pin_survives_warm_update() {
    let mut engine = settled(review_loop(), LayoutConfig::default());
    let pin = Point::new(10.0, 20.0);
    engine.set_fixed("Done", Some(pin)).unwrap();
    assert_eq!(engine.set_graph(review_loop()), Relayout::Warm);
    assert_eq!(engine.graph().node("Done").unwrap().fixed, Some(pin));
    assert_eq!(engine.position("Done"), Some(pin));
}

#[test]
fn test_layout_root_moves_level_zero() {
    let mut engine = settled(review_loop(), LayoutConfig::default());
    engine.set_layout_root(Some("Review")).unwrap();
    assert_eq!(engine.layout_root(), Some("Review"));
    assert_eq!(engine.levels().level("Review"), Some(0));
    assert_eq!(engine.alpha(), 1.0);

    engine.set_layout_root(None).unwrap();
    assert_eq!(engine.levels().level("Submit"), Some(0));
}

#[test]
fn test_reconfigure_keeps_positions_and_reheats() {
    let mut engine = settled(review_loop(), LayoutConfig::default());
    let before = engine.positions();
    engine.reconfigure(LayoutConfig::default().with_link_distance(90.0));
    assert_eq!(engine.positions().positions, before.positions);
    assert_eq!(engine.config().link_distance, 90.0);
    assert!(!engine.is_settled());
}

#[test]
fn test_from_graph_starts_cold() {
    let input = review_loop();
    let config = LayoutConfig::default();
    let graph = flowlayer::LayoutGraph::from_input(&input, &config.sizing);
    let mut engine = LayoutEngine::from_graph(graph, config);
    assert!(!engine.should_relayout(&input));
    assert_eq!(engine.levels().level("Done"), Some(2));
    assert!(engine.step().is_some());
}
