//! Force-directed refinement
//!
//! A velocity-Verlet style simulation with an alpha "temperature" that
//! cools geometrically toward `alpha_target`. One tick applies every force
//! at the current alpha, integrates velocities, snaps fixed nodes to their
//! pins, clamps nested nodes into their containers and cools alpha. The
//! simulation halts once alpha drops below `alpha_min`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{span, trace, warn, Level};

use crate::core::{LayoutConfig, LayoutGraph, Point};

use super::forces::{AnchorForce, ChargeForce, CollisionForce, Force, LinkForce};
use super::hierarchy::{clamp_children, containment_order};
use super::layering::Layering;

/// Positions of every node after a tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionSnapshot {
    pub tick: usize,
    pub alpha: f64,
    pub positions: BTreeMap<String, Point>,
}

impl PositionSnapshot {
    pub fn capture(graph: &LayoutGraph, tick: usize, alpha: f64) -> Self {
        Self {
            tick,
            alpha,
            positions: graph
                .nodes()
                .iter()
                .map(|n| (n.id.clone(), n.position))
                .collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<Point> {
        self.positions.get(id).copied()
    }
}

/// Cold-start placement: every free node at its anchor plus seeded jitter
///
/// Fixed nodes start at their pin. The same seed always gives the same
/// placement.
pub fn seed_positions(graph: &mut LayoutGraph, anchors: &[Point], config: &LayoutConfig) {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let jitter = config.jitter.abs();
    for (node, anchor) in graph.nodes_mut().iter_mut().zip(anchors) {
        node.velocity = Point::ZERO;
        node.position = match node.fixed {
            Some(pin) => pin,
            None if jitter > 0.0 => {
                *anchor + Point::new(rng.gen_range(-jitter..=jitter), rng.gen_range(-jitter..=jitter))
            }
            None => *anchor,
        };
    }
}

/// Alpha-cooled force simulation over a [`LayoutGraph`]
///
/// The graph is passed to every tick rather than owned, so callers can
/// pin, drag and read nodes between ticks.
#[derive(Debug)]
pub struct Simulation {
    forces: Vec<Box<dyn Force>>,
    containment: Vec<usize>,
    alpha: f64,
    alpha_target: f64,
    alpha_min: f64,
    alpha_decay: f64,
    velocity_decay: f64,
    tick_count: usize,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::empty(&LayoutConfig::default())
    }
}

impl Simulation {
    /// A simulation with no forces, hot and ready to tick
    pub fn empty(config: &LayoutConfig) -> Self {
        Self {
            forces: Vec::new(),
            containment: Vec::new(),
            alpha: 1.0,
            alpha_target: config.alpha_target,
            alpha_min: config.alpha_min,
            alpha_decay: config.alpha_decay,
            velocity_decay: config.velocity_decay,
            tick_count: 0,
        }
    }

    /// The standard force set: link, charge, collision and anchor
    pub fn new(graph: &LayoutGraph, layering: &Layering, anchors: Vec<Point>, config: &LayoutConfig) -> Self {
        let mut simulation = Self::empty(config);
        simulation.containment = containment_order(graph);
        simulation.add_force(Box::new(LinkForce::new(graph, layering, config)));
        simulation.add_force(Box::new(ChargeForce::new(config)));
        simulation.add_force(Box::new(CollisionForce::new(config)));
        simulation.add_force(Box::new(AnchorForce::new(anchors, config)));
        simulation
    }

    pub fn add_force(&mut self, force: Box<dyn Force>) {
        self.forces.push(force);
    }

    pub fn force_names(&self) -> Vec<&'static str> {
        self.forces.iter().map(|f| f.name()).collect()
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn set_alpha(&mut self, alpha: f64) {
        self.alpha = alpha;
    }

    pub fn alpha_target(&self) -> f64 {
        self.alpha_target
    }

    pub fn set_alpha_target(&mut self, target: f64) {
        self.alpha_target = target;
    }

    pub fn tick_count(&self) -> usize {
        self.tick_count
    }

    /// True until alpha cools below `alpha_min`
    pub fn is_running(&self) -> bool {
        self.alpha >= self.alpha_min
    }

    /// Reheat to full temperature
    pub fn restart(&mut self) {
        self.alpha = 1.0;
    }

    /// Cool immediately; the next `is_running` is false
    pub fn stop(&mut self) {
        self.alpha = 0.0;
    }

    /// Advance one tick. Returns false without touching the graph when halted.
    pub fn tick(&mut self, graph: &mut LayoutGraph) -> bool {
        if !self.is_running() {
            return false;
        }
        let tick_span = span!(Level::TRACE, "simulation_tick", tick = self.tick_count, alpha = self.alpha);
        let _enter = tick_span.enter();

        let alpha = self.alpha;
        for force in &self.forces {
            force.apply(graph.nodes_mut(), alpha);
        }

        let keep = 1.0 - self.velocity_decay;
        for node in graph.nodes_mut() {
            if let Some(pin) = node.fixed {
                node.position = pin;
                node.velocity = Point::ZERO;
                continue;
            }
            node.velocity = node.velocity * keep;
            if !node.velocity.is_finite() {
                warn!(id = %node.id, "Discarding non-finite velocity");
                node.velocity = Point::ZERO;
            }
            node.position += node.velocity;
        }

        clamp_children(graph, &self.containment);

        self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;
        self.tick_count += 1;
        trace!(alpha = self.alpha, "Tick complete");
        true
    }

    /// Tick until halted or `max_ticks` ticks have run; returns the ticks run
    pub fn run(&mut self, graph: &mut LayoutGraph, max_ticks: usize) -> usize {
        let mut ticks = 0;
        while ticks < max_ticks && self.tick(graph) {
            ticks += 1;
        }
        ticks
    }
}
