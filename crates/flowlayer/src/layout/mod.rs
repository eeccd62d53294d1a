//! Layout stages
//!
//! `layering` assigns levels, `anchors` turns levels into target points,
//! `simulation` refines positions with the forces in `forces`, `hierarchy`
//! keeps nested nodes inside their containers and `collision` resolves
//! drags. `engine` drives all of them for one graph.

mod anchors;
mod collision;
mod engine;
mod forces;
mod hierarchy;
mod layering;
mod simulation;

pub use anchors::{band_order, compute_anchors};
pub use collision::{minimal_push, resolve, resolve_rect, RectResolution, Resolution};
pub use engine::{ForceDirectedLayout, LayoutEngine, Relayout};
pub use forces::{AnchorForce, ChargeForce, CollisionForce, Force, LinkForce};
pub use hierarchy::{clamp_center, clamp_children, containment_order};
pub use layering::{assign_levels, Layering, TopologicalLayerer};
pub use simulation::{seed_positions, PositionSnapshot, Simulation};
