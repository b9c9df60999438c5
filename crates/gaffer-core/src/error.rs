//! Error types for gaffer-core.

use thiserror::Error;

/// Core error types.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Unknown stat kind: {0}")]
    UnknownStatKind(String),

    #[error("Unknown card kind: {0}")]
    UnknownCardKind(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
