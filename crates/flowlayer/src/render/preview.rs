//! ASCII preview of a positioned graph
//!
//! Nodes become boxes at their scaled positions, edges become dotted
//! straight lines between node centres. Edges cut during layering use a
//! different glyph so cycles are easy to spot.

use anyhow::Result;
use tracing::{debug, span, Level};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::core::{display_labels, AsciiCanvas, BoxChars, CharacterSet, EdgeChars, Node};

use super::{LayoutView, Renderer};

/// Default horizontal cells per layout unit
pub const DEFAULT_SCALE: f64 = 0.125;

/// Largest drawing area, in cells, before the scale is shrunk to fit
pub const MAX_PREVIEW_COLUMNS: usize = 400;
pub const MAX_PREVIEW_ROWS: usize = 200;

/// Character-grid preview renderer
#[derive(Debug, Clone)]
pub struct PreviewRenderer {
    style: CharacterSet,
    /// Cells per layout unit along x; y uses half of it
    scale: f64,
}

impl Default for PreviewRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PreviewRenderer {
    pub fn new() -> Self {
        Self {
            style: CharacterSet::default(),
            scale: DEFAULT_SCALE,
        }
    }

    pub fn with_style(style: CharacterSet) -> Self {
        Self {
            style,
            ..Self::new()
        }
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        if scale.is_finite() && scale > 0.0 {
            self.scale = scale;
        }
        self
    }

    pub fn style(&self) -> CharacterSet {
        self.style
    }
}

/// Maps layout coordinates onto canvas cells
struct Grid {
    min_x: f64,
    min_y: f64,
    sx: f64,
    sy: f64,
    margin_x: usize,
    margin_y: usize,
}

impl Grid {
    fn cell(&self, x: f64, y: f64) -> (usize, usize) {
        let col = ((x - self.min_x) * self.sx).round().max(0.0) as usize;
        let row = ((y - self.min_y) * self.sy).round().max(0.0) as usize;
        (col + self.margin_x, row + self.margin_y)
    }
}

/// Cell rectangle `(x, y, width, height)` of a node
fn node_cells(grid: &Grid, node: &Node, label: &str) -> (usize, usize, usize, usize) {
    let label_cols = UnicodeWidthStr::width(label);
    let cols = ((node.size.width() * grid.sx).round() as usize).max(label_cols + 2).max(3);
    let rows = ((node.size.height() * grid.sy).round() as usize).max(3);
    let (cx, cy) = grid.cell(node.position.x, node.position.y);
    (cx.saturating_sub(cols / 2), cy.saturating_sub(rows / 2), cols, rows)
}

/// Factor in `(0, 1]` that keeps `span` layout units within `limit` cells
fn fit_factor(span: f64, scale: f64, limit: usize) -> f64 {
    let cells = span * scale;
    if cells.is_finite() && cells > limit as f64 {
        limit as f64 / cells
    } else {
        1.0
    }
}

/// Longest prefix of `label` that fits in `columns` cells
fn fit_label(label: &str, columns: usize) -> String {
    let mut used = 0;
    label
        .chars()
        .take_while(|c| {
            used += UnicodeWidthChar::width(*c).unwrap_or(0);
            used <= columns
        })
        .collect()
}

impl PreviewRenderer {
    fn draw_node(&self, canvas: &mut AsciiCanvas, cells: (usize, usize, usize, usize), node: &Node, label: &str, container: bool) {
        let (x, y, w, h) = cells;
        let chars = if container {
            BoxChars::double(self.style)
        } else if node.size.is_circle() {
            BoxChars::rounded(self.style)
        } else {
            BoxChars::rectangle(self.style)
        };
        canvas.clear_box(x, y, w, h);
        canvas.draw_box(x, y, w, h, &chars);
        let text = fit_label(label, w.saturating_sub(2));
        let row = if container { y + 1 } else { y + h / 2 };
        canvas.draw_text_centered(x + w / 2, row, &text);
    }
}

impl Renderer for PreviewRenderer {
    type Output = String;

    fn render(&self, view: &LayoutView<'_>) -> Result<Self::Output> {
        let graph = view.graph;
        let render_span = span!(Level::DEBUG, "render_preview", node_count = graph.node_count());
        let _enter = render_span.enter();

        if graph.is_empty() {
            return Ok(String::new());
        }

        let labels = display_labels(graph, view.labels);
        let min_x = graph.nodes().iter().map(|n| n.bounds().left()).fold(f64::INFINITY, f64::min);
        let min_y = graph.nodes().iter().map(|n| n.bounds().top()).fold(f64::INFINITY, f64::min);
        let max_x = graph.nodes().iter().map(|n| n.bounds().right()).fold(f64::NEG_INFINITY, f64::max);
        let max_y = graph.nodes().iter().map(|n| n.bounds().bottom()).fold(f64::NEG_INFINITY, f64::max);
        let widest = labels.iter().map(|l| UnicodeWidthStr::width(l.as_str())).max().unwrap_or(0);
        let fit = fit_factor(max_x - min_x, self.scale, MAX_PREVIEW_COLUMNS)
            .min(fit_factor(max_y - min_y, self.scale / 2.0, MAX_PREVIEW_ROWS));
        if fit < 1.0 {
            debug!(fit, "Shrinking preview to fit");
        }
        let grid = Grid {
            min_x,
            min_y,
            sx: self.scale * fit,
            sy: self.scale / 2.0 * fit,
            margin_x: widest / 2 + 2,
            margin_y: 2,
        };

        let cells: Vec<_> = graph
            .nodes()
            .iter()
            .zip(&labels)
            .map(|(node, label)| node_cells(&grid, node, label))
            .collect();

        let mut order: Vec<usize> = (0..graph.node_count()).collect();
        order.sort_by_key(|&i| graph.depth(i));
        let is_container = |i: usize| !graph.children_of(i).is_empty();

        let mut canvas = AsciiCanvas::new(1, 1);
        for &i in order.iter().filter(|&&i| is_container(i)) {
            self.draw_node(&mut canvas, cells[i], &graph.nodes()[i], &labels[i], true);
        }

        let glyphs = EdgeChars::for_style(self.style);
        for e in 0..graph.edge_count() {
            let (s, t) = graph.endpoints(e);
            let from = graph.nodes()[s].position;
            let to = graph.nodes()[t].position;
            let glyph = if view.layering.is_cut(e) {
                glyphs.cut_edge
            } else {
                glyphs.edge
            };
            canvas.draw_segment(grid.cell(from.x, from.y), grid.cell(to.x, to.y), glyph);
        }

        for &i in order.iter().filter(|&&i| !is_container(i)) {
            self.draw_node(&mut canvas, cells[i], &graph.nodes()[i], &labels[i], false);
        }

        debug!(width = canvas.width, height = canvas.height, "Rendered preview");
        Ok(canvas.to_string())
    }

    fn name(&self) -> &'static str {
        "preview"
    }

    fn format(&self) -> &'static str {
        match self.style {
            CharacterSet::Ascii => "ascii",
            CharacterSet::Unicode => "unicode",
        }
    }
}
