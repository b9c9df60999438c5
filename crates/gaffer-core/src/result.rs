//! Per-user gameweek results: points and the 15 ordered squad picks.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Total picks per gameweek squad.
pub const SQUAD_SIZE: usize = 15;

/// Slots 1..=11 are the starting eleven; 12..=15 are the bench.
pub const STARTING_XI: usize = 11;

/// One user's result for one gameweek, as reported by the provider's picks
/// endpoint. One row per (user, gameweek); upserted by full equality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameweekResult {
    pub gameweek: i32,
    pub user_id: String,
    pub team_id: i64,
    pub points: i32,
    pub transfers: i32,
    /// Transfer hits, stored as (transfer cost / 4). The leaderboard
    /// subtracts hits*4 from each gameweek's points.
    pub hits: i32,
    pub bench_points: i32,
    pub active_chip: String,
    /// Ordered player ids, slot 1 first.
    pub picks: [i64; SQUAD_SIZE],
}

impl GameweekResult {
    /// The starting eleven player ids (slots 1..=11).
    pub fn starting_xi(&self) -> &[i64] {
        &self.picks[..STARTING_XI]
    }

    /// Player id → 1-based slot position.
    pub fn slot_positions(&self) -> HashMap<i64, usize> {
        self.picks
            .iter()
            .enumerate()
            .map(|(idx, &player_id)| (player_id, idx + 1))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_with_picks() -> GameweekResult {
        GameweekResult {
            gameweek: 5,
            user_id: "alice".to_string(),
            team_id: 42,
            points: 60,
            transfers: 1,
            hits: 0,
            bench_points: 8,
            active_chip: String::new(),
            picks: [
                101, 102, 103, 104, 105, 106, 107, 108, 109, 110, 111, 112, 113, 114, 115,
            ],
        }
    }

    #[test]
    fn test_starting_xi_excludes_bench() {
        let result = result_with_picks();
        let xi = result.starting_xi();
        assert_eq!(xi.len(), STARTING_XI);
        assert!(xi.contains(&111));
        assert!(!xi.contains(&112));
    }

    #[test]
    fn test_slot_positions_are_one_based() {
        let result = result_with_picks();
        let slots = result.slot_positions();
        assert_eq!(slots[&101], 1);
        assert_eq!(slots[&111], 11);
        assert_eq!(slots[&115], 15);
    }
}
