//! Core data model for the layout engine
//!
//! Plain data in, positions out. Everything here is independent of the
//! simulation: geometry, the working graph, configuration, signatures,
//! errors and logging.

mod box_drawing;
mod canvas;
mod config;
mod error;
mod geometry;
mod graph;
mod input;
mod layout;
pub mod logging;
mod signature;
mod types;

pub use box_drawing::*;
pub use canvas::*;
pub use config::*;
pub use error::*;
pub use geometry::*;
pub use graph::*;
pub use input::*;
pub use layout::*;
pub use logging::*;
pub use signature::*;
pub use types::*;
