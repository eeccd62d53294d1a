//! Containment: children stay inside their parent's bounds

use crate::core::{LayoutGraph, Node, Point};

/// Node indices ordered so every container comes before its children
pub fn containment_order(graph: &LayoutGraph) -> Vec<usize> {
    let mut order: Vec<usize> = (0..graph.node_count())
        .filter(|&i| graph.parent_of(i).is_some())
        .collect();
    order.sort_by_key(|&i| graph.depth(i));
    order
}

/// Closest centre to `position` that keeps `child` inside `parent`.
///
/// A child larger than its parent on some axis is centred on that axis.
pub fn clamp_center(child: &Node, parent: &Node, position: Point) -> Point {
    let bounds = parent.bounds();
    let half_w = child.size.width() / 2.0;
    let half_h = child.size.height() / 2.0;
    Point::new(
        clamp_axis(position.x, bounds.left() + half_w, bounds.right() - half_w),
        clamp_axis(position.y, bounds.top() + half_h, bounds.bottom() - half_h),
    )
}

fn clamp_axis(value: f64, min: f64, max: f64) -> f64 {
    if min > max {
        (min + max) / 2.0
    } else {
        value.clamp(min, max)
    }
}

/// Pull every nested node back inside its container, outermost first.
///
/// Velocity along a clamped axis is dropped so the node does not keep
/// pushing against the wall.
pub fn clamp_children(graph: &mut LayoutGraph, order: &[usize]) {
    for &i in order {
        let Some(p) = graph.parent_of(i) else {
            continue;
        };
        let nodes = graph.nodes_mut();
        let clamped = clamp_center(&nodes[i], &nodes[p], nodes[i].position);
        let node = &mut nodes[i];
        if clamped.x != node.position.x {
            node.velocity.x = 0.0;
        }
        if clamped.y != node.position.y {
            node.velocity.y = 0.0;
        }
        node.position = clamped;
    }
}
