//! Anchor targets for the anchor force
//!
//! Top-level nodes are anchored on a grid: `x = level * level_spacing`,
//! and `y` is a band within the level column, centred on zero. Band order
//! inside a column follows the average band of the node's layered
//! predecessors, so chains stay roughly straight. Nested nodes are
//! anchored on a grid cell inside their container's anchor.

use tracing::trace;

use crate::core::{container_grid, LayoutConfig, LayoutGraph, Point};

use super::layering::Layering;

/// Band index of every node within its level column
pub fn band_order(graph: &LayoutGraph, layering: &Layering) -> Vec<usize> {
    let n = graph.node_count();
    let mut band = vec![0usize; n];

    for (level, column) in layering.columns().into_iter().enumerate() {
        let mut keyed: Vec<(Option<f64>, usize)> = column
            .into_iter()
            .filter(|&i| graph.parent_of(i).is_none())
            .map(|i| {
                let key = if level == 0 {
                    None
                } else {
                    barycenter(graph, layering, &band, i, level)
                };
                (key, i)
            })
            .collect();

        keyed.sort_by(|(ka, ia), (kb, ib)| match (ka, kb) {
            (Some(a), Some(b)) => a.total_cmp(b).then(ia.cmp(ib)),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => ia.cmp(ib),
        });

        for (k, (_, i)) in keyed.into_iter().enumerate() {
            band[i] = k;
        }
    }
    band
}

/// Mean band of the predecessors of `i` placed in earlier columns
fn barycenter(
    graph: &LayoutGraph,
    layering: &Layering,
    band: &[usize],
    i: usize,
    level: usize,
) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for &e in graph.incoming(i) {
        if layering.is_cut(e) {
            continue;
        }
        let p = graph.endpoints(e).0;
        if graph.parent_of(p).is_none() && layering.level_at(p) < level {
            sum += band[p] as f64;
            count += 1;
        }
    }
    (count > 0).then(|| sum / count as f64)
}

/// Anchor point of every node, by node index
pub fn compute_anchors(graph: &LayoutGraph, layering: &Layering, config: &LayoutConfig) -> Vec<Point> {
    let n = graph.node_count();
    let band = band_order(graph, layering);

    let mut band_sizes = vec![0usize; layering.level_count()];
    for i in 0..n {
        if graph.parent_of(i).is_none() {
            band_sizes[layering.level_at(i)] += 1;
        }
    }

    let mut anchors = vec![Point::ZERO; n];
    for i in 0..n {
        if graph.parent_of(i).is_some() {
            continue;
        }
        let level = layering.level_at(i);
        let offset = band[i] as f64 - (band_sizes[level] as f64 - 1.0) / 2.0;
        anchors[i] = Point::new(
            level as f64 * config.level_spacing,
            offset * config.band_spacing,
        );
    }

    // containers before their children
    let mut nested: Vec<usize> = (0..n).filter(|&i| graph.parent_of(i).is_some()).collect();
    nested.sort_by_key(|&i| graph.depth(i));
    let pad = config.sizing.container_padding;
    for i in nested {
        let Some(p) = graph.parent_of(i) else {
            continue;
        };
        let siblings = graph.children_of(p);
        let slot = siblings.iter().position(|&k| k == i).unwrap_or(0);
        anchors[i] = anchors[p] + grid_offset(graph, siblings, slot, pad);
        trace!(id = %graph.nodes()[i].id, x = anchors[i].x, y = anchors[i].y, "Nested anchor");
    }
    anchors
}

/// Offset of cell `slot` from the container centre
fn grid_offset(graph: &LayoutGraph, siblings: &[usize], slot: usize, pad: f64) -> Point {
    let (cols, rows) = container_grid(siblings.len());
    let cell_w = siblings
        .iter()
        .map(|&k| graph.nodes()[k].size.width())
        .fold(0.0, f64::max);
    let cell_h = siblings
        .iter()
        .map(|&k| graph.nodes()[k].size.height())
        .fold(0.0, f64::max);
    let (col, row) = (slot % cols, slot / cols);
    Point::new(
        (col as f64 - (cols as f64 - 1.0) / 2.0) * (cell_w + pad),
        (row as f64 - (rows as f64 - 1.0) / 2.0) * (cell_h + pad),
    )
}
