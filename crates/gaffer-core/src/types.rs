//! Remaining pipeline entities: fixtures, players, memberships, users and
//! the aggregated leaderboard row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A scheduled match. Identity is the provider's fixture id; fixtures are
/// upserted on change and never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    pub fixture_id: i64,
    pub gameweek: i32,
    pub kickoff: DateTime<Utc>,
    pub home_team_id: i64,
    pub away_team_id: i64,
}

/// A real-world player. Identity is the provider's player id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub player_id: i64,
    pub team_id: i64,
    pub name: String,
}

/// A user's membership of a league. Only linked memberships receive
/// system-generated cards; the default league is where nominations land.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueMembership {
    pub league_id: i64,
    pub user_id: String,
    pub team_id: i64,
    pub is_linked: bool,
    pub is_default: bool,
}

/// A registered member whose picks the pipeline fetches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub user_id: String,
    pub team_id: i64,
    /// One-shot nomination reversal, consumed when used.
    pub has_reverse: bool,
}

/// One leaderboard row: post-penalty points for a gameweek plus the running
/// total. Append-only; a row is computed once and never rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedResult {
    pub gameweek: i32,
    pub team_id: i64,
    pub user_id: String,
    pub points: i32,
    pub total_points: i32,
}
