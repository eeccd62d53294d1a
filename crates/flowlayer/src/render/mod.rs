//! Text renderers for computed layouts
//!
//! Rendering is a debugging aid; the engine's real output is positions.

use anyhow::Result;

use crate::core::{Labels, LayoutGraph};
use crate::layout::{Layering, LayoutEngine};

mod preview;

pub use preview::{PreviewRenderer, DEFAULT_SCALE, MAX_PREVIEW_COLUMNS, MAX_PREVIEW_ROWS};

/// Everything a renderer may look at
#[derive(Debug, Clone, Copy)]
pub struct LayoutView<'a> {
    pub graph: &'a LayoutGraph,
    pub layering: &'a Layering,
    pub labels: &'a Labels,
}

impl<'a> LayoutView<'a> {
    pub fn new(graph: &'a LayoutGraph, layering: &'a Layering, labels: &'a Labels) -> Self {
        Self {
            graph,
            layering,
            labels,
        }
    }

    /// Current state of an engine
    pub fn of_engine(engine: &'a LayoutEngine) -> Self {
        Self::new(engine.graph(), engine.levels(), engine.labels())
    }
}

/// Turns a positioned graph into some output format
pub trait Renderer {
    type Output;

    fn render(&self, view: &LayoutView<'_>) -> Result<Self::Output>;

    fn name(&self) -> &'static str;

    fn format(&self) -> &'static str;
}
