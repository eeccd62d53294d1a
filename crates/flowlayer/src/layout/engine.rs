//! Caller-owned layout engine
//!
//! Ties the stages together: working graph, layering, anchors, simulation
//! and the drag handler. There is no global state; every engine is an
//! independent value the caller drives tick by tick.
//!
//! A node has exactly one owner at a time. Idle nodes belong to the
//! simulation; a dragged node belongs to the drag handler until the drag
//! ends, and only one drag can be active.

use anyhow::Result;
use tracing::{debug, info, span, Level};

use crate::core::{
    should_relayout, DragMode, GraphInput, Labels, LayoutAlgorithm, LayoutConfig, LayoutError,
    LayoutGraph, LayoutResult, Point, TopologySignature,
};

use super::anchors::compute_anchors;
use super::collision::resolve;
use super::hierarchy::clamp_center;
use super::layering::{assign_levels, Layering};
use super::simulation::{seed_positions, PositionSnapshot, Simulation};

/// What `set_graph` did with a new graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relayout {
    /// Topology changed: relayered and reseeded from scratch
    Cold,
    /// Same topology: positions kept
    Warm,
}

#[derive(Debug, Clone)]
struct Drag {
    id: String,
    /// Pin restored when the drag ends
    pin_after: Option<Point>,
}

/// Layered force-directed layout of one graph
#[derive(Debug)]
pub struct LayoutEngine {
    config: LayoutConfig,
    graph: LayoutGraph,
    labels: Labels,
    signature: Option<TopologySignature>,
    layering: Layering,
    simulation: Simulation,
    layout_root: Option<String>,
    drag: Option<Drag>,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        let simulation = Simulation::empty(&config);
        Self {
            config,
            graph: LayoutGraph::default(),
            labels: Labels::new(),
            signature: None,
            layering: Layering::default(),
            simulation,
            layout_root: None,
            drag: None,
        }
    }

    /// Set the presentation side table used to size unsized nodes
    pub fn with_presentation(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    /// Engine over an already built working graph, cold-started
    pub fn from_graph(graph: LayoutGraph, config: LayoutConfig) -> Self {
        let mut engine = Self::new(config);
        engine.signature = Some(TopologySignature::of_graph(&graph));
        engine.graph = graph;
        engine.cold_start();
        engine
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn graph(&self) -> &LayoutGraph {
        &self.graph
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    pub fn signature(&self) -> Option<&TopologySignature> {
        self.signature.as_ref()
    }

    /// True when `input` would trigger a cold start. Touches nothing.
    pub fn should_relayout(&self, input: &GraphInput) -> bool {
        should_relayout(self.signature.as_ref(), input)
    }

    /// Hand the engine a new version of the graph
    pub fn set_graph(&mut self, input: GraphInput) -> Relayout {
        let cold = self.should_relayout(&input);
        if !input.labels.is_empty() {
            self.labels = input.labels.clone();
        }
        let mut sized = input;
        sized.labels = self.labels.clone();
        let mut graph = LayoutGraph::from_input(&sized, &self.config.sizing);

        if cold {
            // pins outlive topology changes
            for node in graph.nodes_mut() {
                if let Some(previous) = self.graph.node(&node.id) {
                    node.fixed = previous.fixed;
                }
            }
            self.signature = Some(TopologySignature::of_graph(&graph));
            self.graph = graph;
            self.cold_start();
            return Relayout::Cold;
        }

        for node in graph.nodes_mut() {
            if let Some(previous) = self.graph.node(&node.id) {
                node.position = previous.position;
                node.velocity = previous.velocity;
                node.fixed = previous.fixed;
            }
        }
        self.graph = graph;
        self.rebuild(false);
        debug!(node_count = self.graph.node_count(), "Warm update kept positions");
        Relayout::Warm
    }

    /// Force a cold layout of the current graph
    pub fn relayout(&mut self) {
        self.cold_start();
    }

    fn cold_start(&mut self) {
        let layout_span = span!(
            Level::INFO,
            "layout_graph",
            node_count = self.graph.node_count(),
            edge_count = self.graph.edge_count()
        );
        let _enter = layout_span.enter();

        if let Some(drag) = self.drag.take() {
            debug!(id = %drag.id, "Cold start ends active drag");
            if let Some(node) = self.graph.node_mut(&drag.id) {
                node.fixed = drag.pin_after;
            }
        }

        self.layering = assign_levels(&self.graph, self.layout_root.as_deref());
        self.store_levels();
        let anchors = compute_anchors(&self.graph, &self.layering, &self.config);
        seed_positions(&mut self.graph, &anchors, &self.config);
        self.simulation = Simulation::new(&self.graph, &self.layering, anchors, &self.config);

        info!(
            levels = self.layering.level_count(),
            cut_edges = self.layering.cut_edges().len(),
            "Cold start"
        );
    }

    /// Relayer and rebuild forces around the current positions
    fn rebuild(&mut self, reheat: bool) {
        let alpha = if reheat { 1.0 } else { self.simulation.alpha() };
        let alpha_target = self.simulation.alpha_target();

        self.layering = assign_levels(&self.graph, self.layout_root.as_deref());
        self.store_levels();
        let anchors = compute_anchors(&self.graph, &self.layering, &self.config);
        self.simulation = Simulation::new(&self.graph, &self.layering, anchors, &self.config);
        self.simulation.set_alpha(alpha);
        self.simulation.set_alpha_target(alpha_target);
    }

    fn store_levels(&mut self) {
        let levels = self.layering.levels().to_vec();
        for (node, level) in self.graph.nodes_mut().iter_mut().zip(levels) {
            node.level = level;
        }
    }

    fn drag_is_reheating(&self) -> bool {
        self.drag.is_some() && self.config.drag_mode == DragMode::Reheat
    }

    fn paused_for_drag(&self) -> bool {
        self.drag.is_some() && self.config.drag_mode == DragMode::Paused
    }

    /// Advance one tick; `None` once settled or while a paused drag is active
    pub fn step(&mut self) -> Option<PositionSnapshot> {
        if self.paused_for_drag() || !self.simulation.tick(&mut self.graph) {
            return None;
        }
        Some(self.positions())
    }

    /// Tick until settled or `max_ticks`, returning the last positions
    pub fn run(&mut self, max_ticks: usize) -> PositionSnapshot {
        let mut ticks = 0;
        while ticks < max_ticks && self.step().is_some() {
            ticks += 1;
        }
        debug!(ticks, alpha = self.simulation.alpha(), "Run finished");
        self.positions()
    }

    /// Stream of per-tick positions, at most `max_ticks` long
    pub fn ticks(&mut self, max_ticks: usize) -> impl Iterator<Item = PositionSnapshot> + '_ {
        std::iter::from_fn(move || self.step()).take(max_ticks)
    }

    pub fn positions(&self) -> PositionSnapshot {
        PositionSnapshot::capture(
            &self.graph,
            self.simulation.tick_count(),
            self.simulation.alpha(),
        )
    }

    pub fn position(&self, id: &str) -> Option<Point> {
        self.graph.node(id).map(|n| n.position)
    }

    pub fn levels(&self) -> &Layering {
        &self.layering
    }

    /// `(source, target)` ids of edges cut to break cycles
    pub fn cut_edges(&self) -> Vec<(String, String)> {
        self.layering.cut_edge_pairs(&self.graph)
    }

    pub fn alpha(&self) -> f64 {
        self.simulation.alpha()
    }

    pub fn is_settled(&self) -> bool {
        !self.simulation.is_running()
    }

    /// Halt the simulation
    pub fn stop(&mut self) {
        self.simulation.stop();
    }

    /// Pin a node at `pin`, or release it with `None`.
    ///
    /// While the node is being dragged the pin is stored and applied when
    /// the drag ends.
    pub fn set_fixed(&mut self, id: &str, pin: Option<Point>) -> LayoutResult<()> {
        if !self.graph.has_node(id) {
            return Err(LayoutError::unknown_node(id));
        }
        if pin.is_some_and(|p| !p.is_finite()) {
            return Err(LayoutError::invalid_input(format!("non-finite pin for {}", id)));
        }
        if let Some(drag) = self.drag.as_mut().filter(|d| d.id == id) {
            drag.pin_after = pin;
            return Ok(());
        }
        if let Some(node) = self.graph.node_mut(id) {
            node.fixed = pin;
            if let Some(p) = pin {
                node.position = p;
                node.velocity = Point::ZERO;
            }
        }
        Ok(())
    }

    /// Choose the level-0 node (`None` picks automatically).
    ///
    /// Changing the root relayers and reheats around the current positions.
    pub fn set_layout_root(&mut self, root: Option<&str>) -> LayoutResult<()> {
        if let Some(id) = root {
            if !self.graph.has_node(id) {
                return Err(LayoutError::unknown_node(id));
            }
        }
        if self.layout_root.as_deref() == root {
            return Ok(());
        }
        self.layout_root = root.map(str::to_string);
        self.rebuild(true);
        Ok(())
    }

    pub fn layout_root(&self) -> Option<&str> {
        self.layout_root.as_deref()
    }

    /// Swap the configuration and reheat, keeping positions
    pub fn reconfigure(&mut self, config: LayoutConfig) {
        self.config = config;
        self.rebuild(true);
        let target = if self.drag_is_reheating() {
            self.config.drag_alpha_target
        } else {
            self.config.alpha_target
        };
        self.simulation.set_alpha_target(target);
    }

    /// Hand `id` to the drag handler and pin it where it is
    pub fn begin_drag(&mut self, id: &str) -> LayoutResult<()> {
        if let Some(active) = &self.drag {
            if active.id == id {
                return Ok(());
            }
            return Err(LayoutError::drag_in_progress(&active.id, id));
        }
        let node = self
            .graph
            .node_mut(id)
            .ok_or_else(|| LayoutError::unknown_node(id))?;
        let pin_after = node.fixed;
        node.fixed = Some(node.position);
        node.velocity = Point::ZERO;
        self.drag = Some(Drag {
            id: id.to_string(),
            pin_after,
        });

        if self.config.drag_mode == DragMode::Reheat {
            self.simulation.set_alpha_target(self.config.drag_alpha_target);
            if self.simulation.alpha() < self.config.drag_alpha_target {
                self.simulation.set_alpha(self.config.drag_alpha_target);
            }
        }
        debug!(id, mode = %self.config.drag_mode, "Drag started");
        Ok(())
    }

    /// Move the dragged node toward `proposed`; returns where it ended up
    pub fn drag_to(&mut self, id: &str, proposed: Point) -> LayoutResult<Point> {
        self.ensure_dragging(id)?;
        if !proposed.is_finite() {
            return Err(LayoutError::invalid_input(format!("non-finite drag position for {}", id)));
        }
        let resolution = resolve(
            &self.graph,
            id,
            proposed,
            self.config.collision_gap,
            self.config.max_resolve_passes,
        )?;
        let mut position = resolution.position;

        let index = self
            .graph
            .index_of(id)
            .ok_or_else(|| LayoutError::unknown_node(id))?;
        if let Some(p) = self.graph.parent_of(index) {
            let nodes = self.graph.nodes();
            position = clamp_center(&nodes[index], &nodes[p], position);
        }

        let node = &mut self.graph.nodes_mut()[index];
        node.position = position;
        node.fixed = Some(position);
        node.velocity = Point::ZERO;
        Ok(position)
    }

    /// Return the node to the simulation; returns its final position
    pub fn end_drag(&mut self, id: &str) -> LayoutResult<Point> {
        self.ensure_dragging(id)?;
        let Some(drag) = self.drag.take() else {
            return Err(LayoutError::not_dragging(id));
        };
        let node = self
            .graph
            .node_mut(id)
            .ok_or_else(|| LayoutError::unknown_node(id))?;
        node.fixed = drag.pin_after;
        let position = node.position;

        self.simulation.set_alpha_target(self.config.alpha_target);
        debug!(id, x = position.x, y = position.y, "Drag ended");
        Ok(position)
    }

    pub fn dragged_node(&self) -> Option<&str> {
        self.drag.as_ref().map(|d| d.id.as_str())
    }

    fn ensure_dragging(&self, id: &str) -> LayoutResult<()> {
        match &self.drag {
            Some(drag) if drag.id == id => Ok(()),
            _ => Err(LayoutError::not_dragging(id)),
        }
    }
}

/// Full layout as a pluggable stage: layer, seed, refine to convergence
#[derive(Debug, Clone, Default)]
pub struct ForceDirectedLayout {
    config: LayoutConfig,
    root: Option<String>,
    max_ticks: Option<usize>,
}

impl ForceDirectedLayout {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            root: None,
            max_ticks: None,
        }
    }

    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn with_max_ticks(mut self, max_ticks: usize) -> Self {
        self.max_ticks = Some(max_ticks);
        self
    }
}

impl LayoutAlgorithm for ForceDirectedLayout {
    type Output = PositionSnapshot;

    fn layout(&self, graph: &LayoutGraph) -> Result<Self::Output> {
        let mut engine = LayoutEngine::from_graph(graph.clone(), self.config.clone());
        if let Some(root) = &self.root {
            engine.set_layout_root(Some(root))?;
            engine.relayout();
        }
        let max_ticks = self
            .max_ticks
            .unwrap_or_else(|| self.config.expected_ticks() + 1);
        Ok(engine.run(max_ticks))
    }

    fn name(&self) -> &'static str {
        "force-directed"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> GraphInput {
        GraphInput::from_pairs([("A", "B"), ("B", "C")])
    }

    #[test]
    fn test_first_graph_is_cold_then_warm() {
        let mut engine = LayoutEngine::default();
        assert_eq!(engine.set_graph(chain()), Relayout::Cold);
        engine.run(20);
        let before = engine.position("B").unwrap();
        assert_eq!(engine.set_graph(chain()), Relayout::Warm);
        assert_eq!(engine.position("B").unwrap(), before);
        assert_eq!(engine.set_graph(chain().edge("C", "A")), Relayout::Cold);
    }

    #[test]
    fn test_run_settles() {
        let mut engine = LayoutEngine::default();
        engine.set_graph(chain());
        let snapshot = engine.run(10_000);
        assert!(engine.is_settled());
        assert!(engine.step().is_none());
        assert_eq!(snapshot.positions.len(), 3);
        let a = snapshot.get("A").unwrap();
        let c = snapshot.get("C").unwrap();
        assert!(c.x > a.x, "levels run left to right");
    }

    #[test]
    fn test_ticks_stream_is_bounded() {
        let mut engine = LayoutEngine::default();
        engine.set_graph(chain());
        let snapshots: Vec<_> = engine.ticks(5).collect();
        assert_eq!(snapshots.len(), 5);
        assert_eq!(snapshots[4].tick, 5);
        assert!(snapshots[4].alpha < snapshots[0].alpha);
    }

    #[test]
    fn test_unknown_ids_are_errors() {
        let mut engine = LayoutEngine::default();
        engine.set_graph(chain());
        assert!(matches!(
            engine.set_fixed("nope", None),
            Err(LayoutError::UnknownNode { .. })
        ));
        assert!(matches!(
            engine.set_layout_root(Some("nope")),
            Err(LayoutError::UnknownNode { .. })
        ));
        assert!(matches!(
            engine.begin_drag("nope"),
            Err(LayoutError::UnknownNode { .. })
        ));
    }

    #[test]
    fn test_non_finite_positions_rejected() {
        let mut engine = LayoutEngine::default();
        engine.set_graph(chain());
        assert!(matches!(
            engine.set_fixed("A", Some(Point::new(f64::NAN, 0.0))),
            Err(LayoutError::InvalidInput { .. })
        ));
        engine.begin_drag("A").unwrap();
        assert!(matches!(
            engine.drag_to("A", Point::new(0.0, f64::INFINITY)),
            Err(LayoutError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_single_drag_owner() {
        let mut engine = LayoutEngine::default();
        engine.set_graph(chain());
        engine.begin_drag("A").unwrap();
        assert!(engine.begin_drag("A").is_ok());
        assert!(matches!(
            engine.begin_drag("B"),
            Err(LayoutError::DragInProgress { .. })
        ));
        assert!(matches!(
            engine.drag_to("B", Point::ZERO),
            Err(LayoutError::NotDragging { .. })
        ));
        engine.end_drag("A").unwrap();
        assert!(matches!(engine.end_drag("A"), Err(LayoutError::NotDragging { .. })));
        assert!(engine.begin_drag("B").is_ok());
    }

    #[test]
    fn test_paused_drag_freezes_simulation() {
        let mut engine = LayoutEngine::new(LayoutConfig::new().with_drag_mode(DragMode::Paused));
        engine.set_graph(chain());
        engine.begin_drag("A").unwrap();
        assert!(engine.step().is_none());
        engine.end_drag("A").unwrap();
        assert!(engine.step().is_some());
    }

    #[test]
    fn test_reheat_drag_keeps_pin_and_runs() {
        let mut engine = LayoutEngine::default();
        engine.set_graph(chain());
        engine.run(10_000);
        engine.begin_drag("B").unwrap();
        let target = engine.drag_to("B", Point::new(0.0, 5_000.0)).unwrap();
        for _ in 0..20 {
            assert!(engine.step().is_some());
            assert_eq!(engine.position("B").unwrap(), target);
        }
        engine.end_drag("B").unwrap();
        assert!(engine.graph().node("B").unwrap().fixed.is_none());
    }

    #[test]
    fn test_pin_set_during_drag_survives_drag() {
        let mut engine = LayoutEngine::default();
        engine.set_graph(chain());
        engine.begin_drag("C").unwrap();
        engine.set_fixed("C", Some(Point::new(1.0, 2.0))).unwrap();
        engine.drag_to("C", Point::new(900.0, 900.0)).unwrap();
        engine.end_drag("C").unwrap();
        assert_eq!(engine.graph().node("C").unwrap().fixed, Some(Point::new(1.0, 2.0)));
    }

    #[test]
    fn test_layout_root_relayers() {
        let mut engine = LayoutEngine::default();
        engine.set_graph(chain());
        engine.run(50);
        engine.set_layout_root(Some("B")).unwrap();
        assert_eq!(engine.levels().level("B"), Some(0));
        assert_eq!(engine.cut_edges(), vec![("A".to_string(), "B".to_string())]);
        assert!(!engine.is_settled());
    }

    #[test]
    fn test_reconfigure_is_warm() {
        let mut engine = LayoutEngine::default();
        engine.set_graph(chain());
        engine.run(10_000);
        let before = engine.positions();
        engine.reconfigure(LayoutConfig::new().with_link_distance(60.0));
        assert_eq!(engine.positions().positions, before.positions);
        assert!(!engine.is_settled());
    }

    #[test]
    fn test_stop_halts() {
        let mut engine = LayoutEngine::default();
        engine.set_graph(chain());
        engine.stop();
        assert!(engine.is_settled());
        assert!(engine.step().is_none());
    }

    #[test]
    fn test_force_directed_layout_trait() {
        let graph = LayoutGraph::from_input(&chain(), &LayoutConfig::default().sizing);
        let layout = ForceDirectedLayout::new(LayoutConfig::default()).with_max_ticks(30);
        assert_eq!(layout.name(), "force-directed");
        let snapshot = layout.layout(&graph).unwrap();
        assert_eq!(snapshot.tick, 30);
        assert_eq!(snapshot.positions.len(), 3);
    }
}
