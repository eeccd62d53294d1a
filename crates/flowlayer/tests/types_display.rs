//! Tests for Display implementations in core types

use flowlayer::core::{CharacterSet, DragMode, EdgeKind, GraphInput, TopologySignature};
use std::str::FromStr;

#[test]
fn test_character_set_display() {
    assert_eq!(CharacterSet::Ascii.to_string(), "ascii");
    assert_eq!(CharacterSet::Unicode.to_string(), "unicode");
}

#[test]
fn test_edge_kind_display() {
    assert_eq!(EdgeKind::Structural.to_string(), "structural");
    assert_eq!(EdgeKind::Sequential.to_string(), "sequential");
}

#[test]
fn test_drag_mode_display_round_trip() {
    for mode in [DragMode::Paused, DragMode::Reheat] {
        assert_eq!(DragMode::from_str(&mode.to_string()).unwrap(), mode);
    }
    assert!(DragMode::from_str("frozen").is_err());
}

#[test]
fn test_signature_display() {
    let input = GraphInput::from_pairs([("b", "a"), ("a", "c")]);
    assert_eq!(TopologySignature::of_input(&input).to_string(), "a,b,c|a>c,b>a");
    assert_eq!(TopologySignature::default().to_string(), "|");
}
