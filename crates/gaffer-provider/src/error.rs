//! Error types for gaffer-provider.

use thiserror::Error;

/// Provider gateway errors. Transport failures and malformed payloads both
/// abort the calling pipeline stage; nothing is partially applied.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {endpoint}")]
    UnexpectedStatus { endpoint: String, status: u16 },

    #[error("No status entries in event-status response")]
    EmptyStatus,

    #[error("Malformed picks for team {team_id}: expected {expected}, got {got}")]
    MalformedPicks {
        team_id: i64,
        expected: usize,
        got: usize,
    },
}

/// Result type alias for provider operations.
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;
