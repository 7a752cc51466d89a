//! Error types for the patrol core library.

use thiserror::Error;

/// Top-level error type for all patrol operations.
#[derive(Error, Debug)]
pub enum PatrolError {
    /// The configuration document is structurally invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization or deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, PatrolError>;
