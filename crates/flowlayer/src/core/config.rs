//! Layout configuration
//!
//! One immutable set of knobs per layout pass. Every field has a default
//! and can be overridden on its own, either in code or through a JSON
//! document with camelCase keys. Ranges are not validated; out-of-range
//! values produce poor layouts, never panics.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What the simulation does while a node is being dragged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DragMode {
    /// Simulation is frozen; only the collision resolver moves the dragged node
    Paused,
    /// Simulation keeps running at `drag_alpha_target` around the pinned node
    #[default]
    Reheat,
}

impl FromStr for DragMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "paused" => Ok(DragMode::Paused),
            "reheat" => Ok(DragMode::Reheat),
            _ => Err(format!("Unknown drag mode: {}", s)),
        }
    }
}

impl fmt::Display for DragMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DragMode::Paused => write!(f, "paused"),
            DragMode::Reheat => write!(f, "reheat"),
        }
    }
}

/// Node sizing knobs used when the input gives no explicit size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SizingConfig {
    pub default_node_width: f64,
    pub default_node_height: f64,
    /// Width of one display column of label text
    pub char_width: f64,
    /// Horizontal padding added around a label
    pub label_padding: f64,
    pub min_node_width: f64,
    /// Padding inside a container around its children
    pub container_padding: f64,
}

impl Default for SizingConfig {
    fn default() -> Self {
        Self {
            default_node_width: 160.0,
            default_node_height: 60.0,
            char_width: 8.0,
            label_padding: 32.0,
            min_node_width: 80.0,
            container_padding: 24.0,
        }
    }
}

/// Layout configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Spring rest length
    pub link_distance: f64,
    /// Spring strength in [0, 1]
    pub link_strength: f64,
    /// Many-body strength, negative repels
    pub charge_strength: f64,
    /// Pairs further apart than this ignore each other
    pub charge_distance_max: f64,
    pub collision_radius_padding: f64,
    /// Collision strength in [0, 1]
    pub collision_strength: f64,
    /// Pull toward the sibling band on the y axis
    pub center_strength: f64,
    /// Pull toward the level column on the x axis
    pub level_strength: f64,
    /// Velocity is multiplied by `1 - velocity_decay` every tick
    pub velocity_decay: f64,
    pub alpha_decay: f64,
    pub alpha_min: f64,
    /// Value alpha relaxes toward; zero lets the simulation cool down
    pub alpha_target: f64,
    pub drag_alpha_target: f64,
    pub drag_mode: DragMode,
    /// Horizontal distance between level columns
    pub level_spacing: f64,
    /// Vertical distance between siblings in a level
    pub band_spacing: f64,
    /// Inflation gap used by the drag collision resolver
    pub collision_gap: f64,
    pub max_resolve_passes: usize,
    /// Seed for the cold-start jitter
    pub seed: u64,
    /// Maximum cold-start offset from the anchor, per axis
    pub jitter: f64,
    pub sizing: SizingConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            link_distance: 180.0,
            link_strength: 0.7,
            charge_strength: -400.0,
            charge_distance_max: 600.0,
            collision_radius_padding: 16.0,
            collision_strength: 0.8,
            center_strength: 0.1,
            level_strength: 0.6,
            velocity_decay: 0.4,
            // cools from 1 to alpha_min in ~300 ticks
            alpha_decay: 1.0 - 0.001_f64.powf(1.0 / 300.0),
            alpha_min: 0.001,
            alpha_target: 0.0,
            drag_alpha_target: 0.3,
            drag_mode: DragMode::Reheat,
            level_spacing: 240.0,
            band_spacing: 120.0,
            collision_gap: 10.0,
            max_resolve_passes: 8,
            seed: 42,
            jitter: 8.0,
            sizing: SizingConfig::default(),
        }
    }
}

impl LayoutConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON document; missing keys keep their defaults
    pub fn from_json(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }

    pub fn with_link_distance(mut self, distance: f64) -> Self {
        self.link_distance = distance;
        self
    }

    pub fn with_charge_strength(mut self, strength: f64) -> Self {
        self.charge_strength = strength;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_drag_mode(mut self, mode: DragMode) -> Self {
        self.drag_mode = mode;
        self
    }

    pub fn with_collision_gap(mut self, gap: f64) -> Self {
        self.collision_gap = gap;
        self
    }

    /// Number of ticks a cold simulation needs to cool below `alpha_min`
    pub fn expected_ticks(&self) -> usize {
        if self.alpha_decay <= 0.0 || self.alpha_decay >= 1.0 || self.alpha_min <= 0.0 {
            return 0;
        }
        (self.alpha_min.ln() / (1.0 - self.alpha_decay).ln()).ceil() as usize
    }
}
