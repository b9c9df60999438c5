//! Penalty cards.
//!
//! A card marks a user for a bad outcome in a gameweek, scoped to one
//! league. Identity is a content hash; duplicate generation attempts are
//! no-ops, which is the whole correctness mechanism for at-least-once
//! pipeline runs.

use crate::error::CoreError;
use crate::stat::StatKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Why a card exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    OwnGoals,
    PenaltiesMissed,
    RedCards,
    /// Discretionary card submitted by a league peer.
    Nomination,
    /// A nomination whose ownership was swapped back onto the nominator.
    Reverse,
}

impl CardKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardKind::OwnGoals => "own_goals",
            CardKind::PenaltiesMissed => "penalties_missed",
            CardKind::RedCards => "red_cards",
            CardKind::Nomination => "nomination",
            CardKind::Reverse => "reverse",
        }
    }
}

impl From<StatKind> for CardKind {
    fn from(kind: StatKind) -> Self {
        match kind {
            StatKind::OwnGoals => CardKind::OwnGoals,
            StatKind::PenaltiesMissed => CardKind::PenaltiesMissed,
            StatKind::RedCards => CardKind::RedCards,
        }
    }
}

impl fmt::Display for CardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CardKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "own_goals" => Ok(CardKind::OwnGoals),
            "penalties_missed" => Ok(CardKind::PenaltiesMissed),
            "red_cards" => Ok(CardKind::RedCards),
            "nomination" => Ok(CardKind::Nomination),
            "reverse" => Ok(CardKind::Reverse),
            other => Err(CoreError::UnknownCardKind(other.to_string())),
        }
    }
}

/// A penalty card.
///
/// Immutable once created except for the status flags and the one-time
/// ownership swap of a reversed nomination. `admin_verified` only ever
/// moves false → true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub card_hash: String,
    pub team_id: i64,
    pub user_id: String,
    /// Set only on nomination/reverse cards.
    pub nominator_team_id: Option<i64>,
    /// Empty string on system-generated cards.
    pub nominator_user_id: String,
    pub gameweek: i32,
    pub kind: CardKind,
    pub league_id: i64,
    pub is_completed: bool,
    pub admin_verified: bool,
}

impl Card {
    /// Deduplication fingerprint for a card. `index` disambiguates multiple
    /// occurrences of the same kind in one gameweek (two own goals, or the
    /// slot of a batch nomination).
    pub fn content_hash(
        user_id: &str,
        league_id: i64,
        gameweek: i32,
        kind: CardKind,
        index: i32,
    ) -> String {
        format!("{user_id}_{league_id}_{gameweek}_{kind}_{index}")
    }

    /// A system-generated card for a bad stat event.
    pub fn generated(
        user_id: &str,
        team_id: i64,
        league_id: i64,
        gameweek: i32,
        kind: StatKind,
        index: i32,
    ) -> Self {
        let kind = CardKind::from(kind);
        Self {
            card_hash: Self::content_hash(user_id, league_id, gameweek, kind, index),
            team_id,
            user_id: user_id.to_string(),
            nominator_team_id: None,
            nominator_user_id: String::new(),
            gameweek,
            kind,
            league_id,
            is_completed: false,
            admin_verified: false,
        }
    }

    /// A discretionary card nominated by a league peer.
    #[allow(clippy::too_many_arguments)]
    pub fn nomination(
        nominee_id: &str,
        nominee_team_id: i64,
        nominator_id: &str,
        nominator_team_id: i64,
        league_id: i64,
        gameweek: i32,
        index: i32,
    ) -> Self {
        Self {
            card_hash: Self::content_hash(
                nominee_id,
                league_id,
                gameweek,
                CardKind::Nomination,
                index,
            ),
            team_id: nominee_team_id,
            user_id: nominee_id.to_string(),
            nominator_team_id: Some(nominator_team_id),
            nominator_user_id: nominator_id.to_string(),
            gameweek,
            kind: CardKind::Nomination,
            league_id,
            is_completed: false,
            admin_verified: false,
        }
    }

    /// Swap ownership back onto the nominator. The hash is kept: a card is
    /// reversible exactly once and the swap is not a new card.
    pub fn reversed(mut self) -> Self {
        std::mem::swap(&mut self.user_id, &mut self.nominator_user_id);
        let team = self.team_id;
        self.team_id = self.nominator_team_id.unwrap_or(team);
        self.nominator_team_id = Some(team);
        self.kind = CardKind::Reverse;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_hash_is_pure() {
        let a = Card::content_hash("alice", 7, 5, CardKind::RedCards, 0);
        let b = Card::content_hash("alice", 7, 5, CardKind::RedCards, 0);
        assert_eq!(a, b);
        assert_eq!(a, "alice_7_5_red_cards_0");
    }

    #[test]
    fn test_generated_card_defaults() {
        let card = Card::generated("alice", 42, 7, 5, StatKind::OwnGoals, 1);
        assert_eq!(card.kind, CardKind::OwnGoals);
        assert!(!card.is_completed);
        assert!(!card.admin_verified);
        assert!(card.nominator_team_id.is_none());
        assert!(card.nominator_user_id.is_empty());
        assert_eq!(card.card_hash, "alice_7_5_own_goals_1");
    }

    #[test]
    fn test_reverse_swaps_ownership_once() {
        let card = Card::nomination("bob", 10, "alice", 42, 7, 5, 0);
        let hash = card.card_hash.clone();

        let reversed = card.reversed();
        assert_eq!(reversed.user_id, "alice");
        assert_eq!(reversed.team_id, 42);
        assert_eq!(reversed.nominator_user_id, "bob");
        assert_eq!(reversed.nominator_team_id, Some(10));
        assert_eq!(reversed.kind, CardKind::Reverse);
        // The hash never changes: still the same card.
        assert_eq!(reversed.card_hash, hash);
    }

    #[test]
    fn test_card_kind_round_trip() {
        for kind in [
            CardKind::OwnGoals,
            CardKind::PenaltiesMissed,
            CardKind::RedCards,
            CardKind::Nomination,
            CardKind::Reverse,
        ] {
            assert_eq!(kind.as_str().parse::<CardKind>().unwrap(), kind);
        }
    }
}
