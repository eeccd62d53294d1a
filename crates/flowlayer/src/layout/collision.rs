//! Drag-time collision resolution
//!
//! Given a proposed position for a dragged node, push it out of every other
//! node's box (inflated by a gap) along the smallest of the four possible
//! push-outs. A push can create a new overlap with a box that was already
//! checked, so the sweep repeats until a pass finds nothing or the pass
//! budget runs out.
//!
//! Tie-breaks are fixed: horizontal before vertical, then away from the
//! obstacle's centre, then toward positive coordinates.

use serde::Serialize;
use tracing::{debug, span, trace, Level};

use crate::core::{LayoutError, LayoutGraph, LayoutResult, Point, Rect};

/// Outcome of resolving a rectangle against obstacles
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RectResolution {
    pub rect: Rect,
    /// Passes executed, including the final clean one
    pub passes: usize,
    /// False when the pass budget ran out with an overlap left
    pub resolved: bool,
}

/// Outcome of resolving a dragged node
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Resolution {
    /// Resolved centre of the node
    pub position: Point,
    pub passes: usize,
    pub resolved: bool,
}

/// Smallest translation that moves `rect` out of `obstacle`
pub fn minimal_push(rect: &Rect, obstacle: &Rect) -> Point {
    let toward_right = obstacle.right() - rect.left();
    let toward_left = rect.right() - obstacle.left();
    let toward_bottom = obstacle.bottom() - rect.top();
    let toward_top = rect.bottom() - obstacle.top();

    let center = rect.center();
    let other = obstacle.center();
    let dx = pick(toward_right, toward_left, center.x >= other.x);
    let dy = pick(toward_bottom, toward_top, center.y >= other.y);

    if dx.abs() <= dy.abs() {
        Point::new(dx, 0.0)
    } else {
        Point::new(0.0, dy)
    }
}

/// Shorter of a positive and a negative push; `prefer_positive` settles ties
fn pick(positive: f64, negative: f64, prefer_positive: bool) -> f64 {
    if positive < negative || (positive == negative && prefer_positive) {
        positive
    } else {
        -negative
    }
}

/// Push `moving` clear of every rectangle in `obstacles`
pub fn resolve_rect(moving: Rect, obstacles: &[Rect], gap: f64, max_passes: usize) -> RectResolution {
    let inflated: Vec<Rect> = obstacles.iter().map(|r| r.inflate(gap)).collect();
    let mut rect = moving;

    for pass in 1..=max_passes {
        let mut moved = false;
        for obstacle in &inflated {
            if rect.intersects(obstacle) {
                let push = minimal_push(&rect, obstacle);
                trace!(pass, dx = push.x, dy = push.y, "Pushing out of obstacle");
                rect = rect.translate(push);
                moved = true;
            }
        }
        if !moved {
            return RectResolution {
                rect,
                passes: pass,
                resolved: true,
            };
        }
    }

    let resolved = !inflated.iter().any(|o| rect.intersects(o));
    RectResolution {
        rect,
        passes: max_passes,
        resolved,
    }
}

/// Resolve a drag of node `id` to `proposed` (a centre point) against the rest of `graph`
///
/// The node's own ancestors and descendants are not obstacles: a child
/// always sits inside its container.
pub fn resolve(
    graph: &LayoutGraph,
    id: &str,
    proposed: Point,
    gap: f64,
    max_passes: usize,
) -> LayoutResult<Resolution> {
    let index = graph.index_of(id).ok_or_else(|| LayoutError::unknown_node(id))?;
    let resolve_span = span!(Level::DEBUG, "resolve_collision", node = id);
    let _enter = resolve_span.enter();

    let related = family(graph, index);
    let obstacles: Vec<Rect> = graph
        .nodes()
        .iter()
        .enumerate()
        .filter(|(i, _)| !related[*i])
        .map(|(_, node)| node.bounds())
        .collect();

    let size = graph.nodes()[index].size;
    let result = resolve_rect(size.bounds_at(proposed), &obstacles, gap, max_passes);
    if !result.resolved {
        debug!(passes = result.passes, "Overlap left after pass budget");
    }
    Ok(Resolution {
        position: result.rect.center(),
        passes: result.passes,
        resolved: result.resolved,
    })
}

/// Flags the node itself, its ancestors and its descendants
fn family(graph: &LayoutGraph, index: usize) -> Vec<bool> {
    let mut related = vec![false; graph.node_count()];
    related[index] = true;
    let mut current = index;
    while let Some(p) = graph.parent_of(current) {
        related[p] = true;
        current = p;
    }
    let mut stack = graph.children_of(index).to_vec();
    while let Some(child) = stack.pop() {
        related[child] = true;
        stack.extend_from_slice(graph.children_of(child));
    }
    related
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Node, NodeSize};

    #[test]
    fn test_overlap_pushed_right() {
        let result = resolve_rect(
            Rect::new(50.0, 0.0, 100.0, 50.0),
            &[Rect::new(0.0, 0.0, 100.0, 50.0)],
            10.0,
            8,
        );
        assert!(result.resolved);
        assert_eq!(result.rect.x, 110.0);
        assert_eq!(result.rect.y, 0.0);
        assert_eq!(result.passes, 2);
    }

    #[test]
    fn test_clear_position_untouched() {
        let moving = Rect::new(500.0, 0.0, 100.0, 50.0);
        let result = resolve_rect(moving, &[Rect::new(0.0, 0.0, 100.0, 50.0)], 10.0, 8);
        assert_eq!(result.rect, moving);
        assert_eq!(result.passes, 1);
    }

    #[test]
    fn test_vertical_push_when_shorter() {
        let push = minimal_push(&Rect::new(0.0, 40.0, 100.0, 50.0), &Rect::new(0.0, 0.0, 100.0, 50.0));
        assert_eq!(push, Point::new(0.0, 10.0));
    }

    #[test]
    fn test_push_left_when_on_left() {
        let push = minimal_push(&Rect::new(-60.0, 0.0, 100.0, 50.0), &Rect::new(0.0, 0.0, 100.0, 50.0));
        assert_eq!(push, Point::new(-40.0, 0.0));
    }

    #[test]
    fn test_push_into_checked_box_needs_another_pass() {
        // the tall post is checked first and only hit after the push out of the box
        let obstacles = [Rect::new(110.0, -100.0, 10.0, 250.0), Rect::new(0.0, 0.0, 100.0, 50.0)];
        let result = resolve_rect(Rect::new(60.0, 0.0, 40.0, 50.0), &obstacles, 10.0, 8);
        assert!(result.resolved);
        assert_eq!(result.passes, 3);
        assert_eq!(result.rect.x, 130.0);
        for obstacle in &obstacles {
            assert!(!result.rect.intersects(&obstacle.inflate(10.0)));
        }
    }

    #[test]
    fn test_zero_pass_budget_reports_unresolved() {
        let result = resolve_rect(
            Rect::new(50.0, 0.0, 100.0, 50.0),
            &[Rect::new(0.0, 0.0, 100.0, 50.0)],
            10.0,
            0,
        );
        assert!(!result.resolved);
        assert_eq!(result.passes, 0);
    }

    #[test]
    fn test_resolve_node_ignores_own_container() {
        let mut parent = Node::new("P", NodeSize::rect(300.0, 300.0));
        parent.position = Point::new(0.0, 0.0);
        let mut child = Node::with_parent("c", NodeSize::rect(20.0, 20.0), "P");
        child.position = Point::new(0.0, 0.0);
        let mut other = Node::new("X", NodeSize::rect(20.0, 20.0));
        other.position = Point::new(1000.0, 0.0);
        let graph = LayoutGraph::new(vec![parent, child, other], vec![]);

        let resolution = resolve(&graph, "c", Point::new(10.0, 10.0), 10.0, 8).unwrap();
        assert_eq!(resolution.position, Point::new(10.0, 10.0));
        assert!(resolution.resolved);
    }

    #[test]
    fn test_resolve_unknown_node() {
        let graph = LayoutGraph::default();
        let err = resolve(&graph, "ghost", Point::ZERO, 10.0, 8).unwrap_err();
        assert!(matches!(err, LayoutError::UnknownNode { .. }));
    }
}
