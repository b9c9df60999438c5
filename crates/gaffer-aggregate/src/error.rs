//! Error types for gaffer-aggregate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("Store error: {0}")]
    Store(#[from] gaffer_store::StoreError),
}

/// Result type alias for aggregation operations.
pub type AggregateResult<T> = std::result::Result<T, AggregateError>;
