//! Stat events: the bad in-game outcomes that earn penalty cards.
//!
//! Events are append-only. Identity is a content hash of
//! (fixture, gameweek, kind) so a re-poll of the provider's finalized
//! history never duplicates a row.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The stat identifiers that produce penalty cards.
///
/// Everything else the provider reports (goals, assists, bonus...) is
/// filtered out at the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    OwnGoals,
    PenaltiesMissed,
    RedCards,
}

impl StatKind {
    /// All card-producing stat identifiers, in provider order.
    pub const ALL: [StatKind; 3] = [
        StatKind::OwnGoals,
        StatKind::PenaltiesMissed,
        StatKind::RedCards,
    ];

    /// Provider wire identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            StatKind::OwnGoals => "own_goals",
            StatKind::PenaltiesMissed => "penalties_missed",
            StatKind::RedCards => "red_cards",
        }
    }
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "own_goals" => Ok(StatKind::OwnGoals),
            "penalties_missed" => Ok(StatKind::PenaltiesMissed),
            "red_cards" => Ok(StatKind::RedCards),
            other => Err(CoreError::UnknownStatKind(other.to_string())),
        }
    }
}

/// A bad statistical event extracted from a finished fixture.
///
/// `value` is an occurrence count: a player scoring two own goals in one
/// fixture arrives as a single event with `value = 2`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatEvent {
    /// Content-hash identity. Deliberately excludes the player: the first
    /// (fixture, gameweek, kind) row wins and later ones are skipped.
    pub event_hash: String,
    pub fixture_id: i64,
    pub gameweek: i32,
    pub player_id: i64,
    pub kind: StatKind,
    pub value: i32,
}

impl StatEvent {
    /// Build an event, deriving its hash.
    pub fn new(fixture_id: i64, gameweek: i32, player_id: i64, kind: StatKind, value: i32) -> Self {
        Self {
            event_hash: Self::content_hash(fixture_id, gameweek, kind),
            fixture_id,
            gameweek,
            player_id,
            kind,
            value,
        }
    }

    /// Deduplication fingerprint for an event. Pure and stable: the same
    /// inputs always produce the same hash.
    pub fn content_hash(fixture_id: i64, gameweek: i32, kind: StatKind) -> String {
        format!("{fixture_id}_{gameweek}_{kind}")
    }
}
