//! Error types for gaffer-cards.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CardError {
    #[error("Store error: {0}")]
    Store(#[from] gaffer_store::StoreError),

    #[error("{failed} of {total} card-generation jobs failed")]
    WorkerFailures { failed: usize, total: usize },

    #[error("Too many nominees in one submission: {got} (max {max})")]
    TooManyNominees { got: usize, max: usize },

    #[error("No aggregated gameweek to nominate against")]
    NothingAggregated,

    #[error("User {user_id} has no default league")]
    NoDefaultLeague { user_id: String },

    #[error("Unknown user: {user_id}")]
    UnknownUser { user_id: String },

    #[error("Card not found: {card_hash}")]
    CardNotFound { card_hash: String },

    #[error("Card {card_hash} is not a reversible nomination")]
    NotReversible { card_hash: String },

    #[error("User {user_id} has already used their reversal")]
    ReverseUnavailable { user_id: String },
}

/// Result type alias for card operations.
pub type CardResult<T> = std::result::Result<T, CardError>;
