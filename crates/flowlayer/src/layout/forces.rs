//! Forces of the refinement simulation
//!
//! Each force nudges node velocities and is scaled by the current alpha.
//! Forces never move positions directly; integration happens once per tick
//! in [`Simulation`](super::Simulation).

use std::collections::HashMap;
use std::fmt;

use crate::core::{fallback_axis, LayoutConfig, LayoutGraph, Node, Point, EPSILON};

use super::layering::Layering;

/// A velocity contribution applied once per tick
pub trait Force: Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;

    /// Add this force's contribution to the velocity of `nodes`
    fn apply(&self, nodes: &mut [Node], alpha: f64);
}

#[derive(Debug, Clone, PartialEq)]
struct Link {
    source: usize,
    target: usize,
    distance: f64,
    /// Share of the correction taken by the target
    bias: f64,
}

/// Spring along every non-cut edge
#[derive(Debug, Clone)]
pub struct LinkForce {
    links: Vec<Link>,
    strength: f64,
}

impl LinkForce {
    /// Springs for `graph`. Self-loops and edges cut during layering are skipped.
    pub fn new(graph: &LayoutGraph, layering: &Layering, config: &LayoutConfig) -> Self {
        let pairs: Vec<(usize, usize, Option<f64>)> = (0..graph.edge_count())
            .filter(|&e| !layering.is_cut(e))
            .map(|e| {
                let (s, t) = graph.endpoints(e);
                (s, t, graph.edges()[e].distance)
            })
            .filter(|(s, t, _)| s != t)
            .collect();

        let mut degree = vec![0usize; graph.node_count()];
        for &(s, t, _) in &pairs {
            degree[s] += 1;
            degree[t] += 1;
        }

        // the less connected endpoint moves more
        let links = pairs
            .into_iter()
            .map(|(source, target, distance)| Link {
                source,
                target,
                distance: distance.unwrap_or(config.link_distance),
                bias: degree[source] as f64 / (degree[source] + degree[target]) as f64,
            })
            .collect();

        Self {
            links,
            strength: config.link_strength,
        }
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

impl Force for LinkForce {
    fn name(&self) -> &'static str {
        "link"
    }

    fn apply(&self, nodes: &mut [Node], alpha: f64) {
        for link in &self.links {
            let source = &nodes[link.source];
            let target = &nodes[link.target];
            let mut delta = (target.position + target.velocity) - (source.position + source.velocity);
            let mut distance = delta.length();
            if distance < EPSILON {
                delta = fallback_axis(link.source, link.target) * EPSILON;
                distance = EPSILON;
            }
            let l = (distance - link.distance) / distance * alpha * self.strength;
            let shift = delta * l;
            nodes[link.target].velocity -= shift * link.bias;
            nodes[link.source].velocity += shift * (1.0 - link.bias);
        }
    }
}

/// Pairwise inverse-square repulsion (or attraction for positive strength)
#[derive(Debug, Clone)]
pub struct ChargeForce {
    strength: f64,
    distance_max: f64,
    distance_min: f64,
}

impl ChargeForce {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            strength: config.charge_strength,
            distance_max: config.charge_distance_max,
            distance_min: 1.0,
        }
    }
}

impl Force for ChargeForce {
    fn name(&self) -> &'static str {
        "charge"
    }

    fn apply(&self, nodes: &mut [Node], alpha: f64) {
        let max2 = self.distance_max * self.distance_max;
        let min2 = self.distance_min * self.distance_min;
        for i in 0..nodes.len() {
            for j in i + 1..nodes.len() {
                let mut delta = nodes[j].position - nodes[i].position;
                let mut d2 = delta.length_squared();
                if d2 >= max2 {
                    continue;
                }
                if d2 < EPSILON {
                    delta = fallback_axis(i, j);
                    d2 = 1.0;
                }
                let w = self.strength * alpha / d2.max(min2);
                let shift = delta * w;
                nodes[i].velocity += shift;
                nodes[j].velocity -= shift;
            }
        }
    }
}

/// Keeps node shapes apart
///
/// Circle pairs separate by radius. Every other pair is treated as
/// axis-aligned boxes and pushed apart along the axis of least overlap.
/// The push is split by size; a fixed node hands its whole share to the
/// other node.
#[derive(Debug, Clone)]
pub struct CollisionForce {
    padding: f64,
    strength: f64,
}

impl CollisionForce {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            padding: config.collision_radius_padding,
            strength: config.collision_strength,
        }
    }

    /// Shares of the push taken by `a` and `b`
    fn shares(a: &Node, b: &Node) -> Option<(f64, f64)> {
        match (a.fixed.is_some(), b.fixed.is_some()) {
            (true, true) => None,
            (true, false) => Some((0.0, 1.0)),
            (false, true) => Some((1.0, 0.0)),
            (false, false) => {
                let ma = a.size.bounding_radius().powi(2);
                let mb = b.size.bounding_radius().powi(2);
                if ma + mb < EPSILON {
                    Some((0.5, 0.5))
                } else {
                    Some((mb / (ma + mb), ma / (ma + mb)))
                }
            }
        }
    }

    /// Velocity change for `a` (and the negation for `b`) before shares apply
    fn push(&self, a: &Node, b: &Node, i: usize, j: usize, alpha: f64) -> Option<Point> {
        let pa = a.position + a.velocity;
        let pb = b.position + b.velocity;
        let delta = pa - pb;

        if a.size.is_circle() && b.size.is_circle() {
            let r = a.size.bounding_radius() + b.size.bounding_radius() + self.padding;
            let distance = delta.length();
            if distance >= r {
                return None;
            }
            let (direction, distance) = match delta.normalized() {
                Some(unit) => (unit, distance),
                None => (fallback_axis(i, j), 0.0),
            };
            return Some(direction * ((r - distance) * self.strength * alpha));
        }

        let overlap_x = (a.size.width() + b.size.width()) / 2.0 + self.padding - delta.x.abs();
        let overlap_y = (a.size.height() + b.size.height()) / 2.0 + self.padding - delta.y.abs();
        if overlap_x <= 0.0 || overlap_y <= 0.0 {
            return None;
        }
        let scale = self.strength * alpha;
        if overlap_x <= overlap_y {
            let sign = if delta.x.abs() < EPSILON {
                fallback_axis(i, j).x.signum()
            } else {
                delta.x.signum()
            };
            Some(Point::new(sign * overlap_x * scale, 0.0))
        } else {
            let sign = if delta.y.abs() < EPSILON {
                fallback_axis(i, j).y.signum()
            } else {
                delta.y.signum()
            };
            Some(Point::new(0.0, sign * overlap_y * scale))
        }
    }
}

impl Force for CollisionForce {
    fn name(&self) -> &'static str {
        "collision"
    }

    fn apply(&self, nodes: &mut [Node], alpha: f64) {
        let ancestors = ancestor_chains(nodes);
        for i in 0..nodes.len() {
            for j in i + 1..nodes.len() {
                // nested nodes are kept apart by containment, not collision
                if ancestors[i].contains(&j) || ancestors[j].contains(&i) {
                    continue;
                }
                let (a, b) = (&nodes[i], &nodes[j]);
                let Some((share_a, share_b)) = Self::shares(a, b) else {
                    continue;
                };
                if let Some(push) = self.push(a, b, i, j, alpha) {
                    nodes[i].velocity += push * share_a;
                    nodes[j].velocity -= push * share_b;
                }
            }
        }
    }
}

/// Indexes of every container enclosing each node, innermost first
fn ancestor_chains(nodes: &[Node]) -> Vec<Vec<usize>> {
    let index: HashMap<&str, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.as_str(), i))
        .collect();
    nodes
        .iter()
        .map(|node| {
            let mut chain = Vec::new();
            let mut parent = node.parent.as_deref();
            while let Some(p) = parent.and_then(|id| index.get(id).copied()) {
                if chain.len() >= nodes.len() || chain.contains(&p) {
                    break;
                }
                chain.push(p);
                parent = nodes[p].parent.as_deref();
            }
            chain
        })
        .collect()
}

/// Pull toward each node's layered anchor
///
/// `x` follows the level column with `level_strength`, `y` follows the
/// sibling band with `center_strength`.
#[derive(Debug, Clone)]
pub struct AnchorForce {
    targets: Vec<Point>,
    x_strength: f64,
    y_strength: f64,
}

impl AnchorForce {
    pub fn new(targets: Vec<Point>, config: &LayoutConfig) -> Self {
        Self {
            targets,
            x_strength: config.level_strength,
            y_strength: config.center_strength,
        }
    }

    pub fn targets(&self) -> &[Point] {
        &self.targets
    }
}

impl Force for AnchorForce {
    fn name(&self) -> &'static str {
        "anchor"
    }

    fn apply(&self, nodes: &mut [Node], alpha: f64) {
        for (node, target) in nodes.iter_mut().zip(&self.targets) {
            node.velocity.x += (target.x - node.position.x) * self.x_strength * alpha;
            node.velocity.y += (target.y - node.position.y) * self.y_strength * alpha;
        }
    }
}
