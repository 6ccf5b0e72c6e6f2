//! Domain error types

use thiserror::Error;

/// Errors that can occur while building or configuring the transmit blocks
#[derive(Error, Debug)]
pub enum OqpskError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Message error: {0}")]
    Message(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Result type alias for OQPSK operations
pub type OqpskResult<T> = Result<T, OqpskError>;
