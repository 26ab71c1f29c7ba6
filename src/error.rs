//! Lumina error types

use thiserror::Error;

/// Lumina error type
#[derive(Error, Debug)]
pub enum Error {
    /// Input rejected before any side effect
    #[error("Validation error: {0}")]
    Validation(String),

    /// Insight provider call failed (network, malformed response, quota/auth)
    #[error("Insight error: {0}")]
    Insight(String),

    /// Entry store failure (unwritable medium, serialization failure)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Lumina operations
pub type Result<T> = std::result::Result<T, Error>;
