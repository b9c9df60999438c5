//! Error types for gaffer-sync.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Provider error: {0}")]
    Provider(#[from] gaffer_provider::ProviderError),

    #[error("Store error: {0}")]
    Store(#[from] gaffer_store::StoreError),
}

/// Result type alias for sync operations.
pub type SyncResult<T> = std::result::Result<T, SyncError>;
