//! Error types for gaffer-store.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Core(#[from] gaffer_core::CoreError),

    #[error("Corrupt picks row for user {user_id} gameweek {gameweek}: {len} entries")]
    CorruptPicks {
        user_id: String,
        gameweek: i32,
        len: usize,
    },
}

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
