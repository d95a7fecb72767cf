//! Error types for legends.

use thiserror::Error;

/// Errors that can occur in legends operations.
#[derive(Error, Debug)]
pub enum LegendsError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Unknown user: {0}")]
    UnknownUser(String),

    #[error("{0}")]
    InvalidLegendName(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for legends operations.
pub type LegendsResult<T> = Result<T, LegendsError>;
