//! Pluggable layout stages

use anyhow::Result;

use super::graph::LayoutGraph;

/// A stage that computes something positional from a working graph
///
/// Implementations never mutate the caller's graph. Stages that need to
/// move nodes work on their own copy and return the result.
pub trait LayoutAlgorithm: Send + Sync {
    type Output;

    /// Run the stage over `graph`
    fn layout(&self, graph: &LayoutGraph) -> Result<Self::Output>;

    /// Short identifier used in logs
    fn name(&self) -> &'static str;
}
