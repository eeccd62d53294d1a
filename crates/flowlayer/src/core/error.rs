//! Core error types for graph layout
//!
//! Structural problems in the input (dangling edges, unknown parents, cycles)
//! are tolerated and never show up here. These errors cover caller mistakes
//! against the engine hooks and malformed input documents.

use thiserror::Error;

/// Core error types for layout processing
#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("Unknown node: {id}")]
    UnknownNode { id: String },

    #[error("Drag in progress: node {active} is already being dragged (requested {requested})")]
    DragInProgress { active: String, requested: String },

    #[error("Node {id} is not being dragged")]
    NotDragging { id: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl LayoutError {
    /// Create a new unknown node error
    pub fn unknown_node(id: impl Into<String>) -> Self {
        Self::UnknownNode { id: id.into() }
    }

    /// Create a new drag ownership error
    pub fn drag_in_progress(active: impl Into<String>, requested: impl Into<String>) -> Self {
        Self::DragInProgress {
            active: active.into(),
            requested: requested.into(),
        }
    }

    /// Create a new not-dragging error
    pub fn not_dragging(id: impl Into<String>) -> Self {
        Self::NotDragging { id: id.into() }
    }

    /// Create a new invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

/// Result alias used by the engine hooks
pub type LayoutResult<T> = std::result::Result<T, LayoutError>;
