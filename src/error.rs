//! # Error Types
//!
//! This module defines error types used throughout the labelkit library.
//! Datastore failures have their own type in [`crate::store::StoreError`] and
//! preview rendering in [`crate::preview::PreviewError`].

use thiserror::Error;

/// Main error type for labelkit operations
#[derive(Debug, Error)]
pub enum LabelError {
    /// A widget id that is not on the canvas
    #[error("Unknown widget: {0}")]
    UnknownWidget(String),

    /// Component data that does not match its widget type
    #[error("Invalid data for {name} component: {reason}")]
    InvalidData { name: String, reason: String },

    /// Remote request returned a non-success status
    #[error("Request failed ({status}): {detail}")]
    Request { status: u16, detail: String },

    /// Transport-level errors (connection, bind, timeouts)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Preview rendering error
    #[error("Preview error: {0}")]
    Preview(#[from] crate::preview::PreviewError),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for LabelError {
    fn from(err: reqwest::Error) -> Self {
        LabelError::Transport(err.to_string())
    }
}
