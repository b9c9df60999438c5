//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Provider error: {0}")]
    Provider(#[from] gaffer_provider::ProviderError),

    #[error("Store error: {0}")]
    Store(#[from] gaffer_store::StoreError),

    #[error("Sync error: {0}")]
    Sync(#[from] gaffer_sync::SyncError),

    #[error("Card error: {0}")]
    Card(#[from] gaffer_cards::CardError),

    #[error("Aggregation error: {0}")]
    Aggregate(#[from] gaffer_aggregate::AggregateError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] gaffer_telemetry::TelemetryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
