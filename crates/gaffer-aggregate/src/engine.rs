//! Pure aggregation: the unresolved-card penalty rule and the incremental
//! running-total computation. All store access stays in the service layer.

use std::collections::{HashMap, HashSet};

use gaffer_core::{AggregatedResult, Card, GameweekResult};

/// Unresolved cards needed before the penalty applies.
pub const PENALTY_THRESHOLD: usize = 2;

/// Users penalized for this pass: anyone holding [`PENALTY_THRESHOLD`] or
/// more unverified cards, mapped to the gameweek whose points are forced
/// to zero — the maximum gameweek among their unresolved cards.
pub fn penalized_users(outstanding: &[Card]) -> HashMap<String, i32> {
    let mut by_user: HashMap<&str, Vec<i32>> = HashMap::new();
    for card in outstanding {
        by_user.entry(&card.user_id).or_default().push(card.gameweek);
    }

    by_user
        .into_iter()
        .filter(|(_, gameweeks)| gameweeks.len() >= PENALTY_THRESHOLD)
        .filter_map(|(user_id, gameweeks)| {
            gameweeks
                .into_iter()
                .max()
                .map(|gw| (user_id.to_string(), gw))
        })
        .collect()
}

/// Compute the leaderboard rows missing from `existing_keys`.
///
/// Per user, ordered by gameweek: effective points are the stored points,
/// except the penalized gameweek which is forced to 0; the running total
/// accumulates (effective − hits×4). Every gameweek feeds the total, but
/// only absent (gameweek, user) keys are emitted — prior rows are never
/// recomputed, so a penalty zero already written stays written.
pub fn compute_rows(
    results: &[GameweekResult],
    penalized: &HashMap<String, i32>,
    existing_keys: &HashSet<(i32, String)>,
) -> Vec<AggregatedResult> {
    let mut by_user: HashMap<&str, Vec<&GameweekResult>> = HashMap::new();
    for result in results {
        by_user.entry(&result.user_id).or_default().push(result);
    }

    let mut rows = Vec::new();
    let mut users: Vec<&str> = by_user.keys().copied().collect();
    users.sort_unstable();

    for user_id in users {
        let mut user_results = by_user.remove(user_id).unwrap_or_default();
        user_results.sort_by_key(|r| r.gameweek);

        let forced_zero = penalized.get(user_id).copied();
        let mut running_total = 0;

        for result in user_results {
            let effective = if forced_zero == Some(result.gameweek) {
                0
            } else {
                result.points
            };
            running_total += effective - result.hits * 4;

            let key = (result.gameweek, result.user_id.clone());
            if existing_keys.contains(&key) {
                continue;
            }
            rows.push(AggregatedResult {
                gameweek: result.gameweek,
                team_id: result.team_id,
                user_id: result.user_id.clone(),
                points: effective,
                total_points: running_total,
            });
        }
    }

    rows
}

/// Users whose outstanding cards are considered served: anyone holding at
/// least one settled zero-point gameweek. Deliberately coarse — one zero
/// clears everything the user has outstanding.
pub fn zero_point_users(rows: &[AggregatedResult]) -> Vec<String> {
    let mut users: Vec<String> = rows
        .iter()
        .filter(|row| row.points == 0)
        .map(|row| row.user_id.clone())
        .collect();
    users.sort_unstable();
    users.dedup();
    users
}

#[cfg(test)]
mod tests {
    use super::*;
    use gaffer_core::{CardKind, SQUAD_SIZE};

    fn unresolved_card(user_id: &str, gameweek: i32, index: i32) -> Card {
        Card {
            card_hash: Card::content_hash(user_id, 7, gameweek, CardKind::RedCards, index),
            team_id: 42,
            user_id: user_id.to_string(),
            nominator_team_id: None,
            nominator_user_id: String::new(),
            gameweek,
            kind: CardKind::RedCards,
            league_id: 7,
            is_completed: false,
            admin_verified: false,
        }
    }

    fn result(user_id: &str, gameweek: i32, points: i32, hits: i32) -> GameweekResult {
        GameweekResult {
            gameweek,
            user_id: user_id.to_string(),
            team_id: 42,
            points,
            transfers: hits,
            hits,
            bench_points: 0,
            active_chip: String::new(),
            picks: [0; SQUAD_SIZE],
        }
    }

    #[test]
    fn test_penalty_targets_max_unresolved_gameweek() {
        let cards = [
            unresolved_card("alice", 4, 0),
            unresolved_card("alice", 4, 1),
            unresolved_card("alice", 6, 0),
        ];

        let penalized = penalized_users(&cards);
        assert_eq!(penalized.get("alice"), Some(&6));
    }

    #[test]
    fn test_single_card_is_not_penalized() {
        let cards = [unresolved_card("alice", 4, 0)];
        assert!(penalized_users(&cards).is_empty());
    }

    #[test]
    fn test_forced_zero_applies_only_to_target_gameweek() {
        let results = [
            result("alice", 4, 50, 0),
            result("alice", 5, 60, 0),
            result("alice", 6, 70, 0),
        ];
        let penalized = HashMap::from([("alice".to_string(), 6)]);

        let rows = compute_rows(&results, &penalized, &HashSet::new());
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].points, 50);
        assert_eq!(rows[1].points, 60);
        assert_eq!(rows[2].points, 0);
        assert_eq!(rows[2].total_points, 110);
    }

    #[test]
    fn test_running_total_subtracts_hits() {
        let results = [result("bob", 1, 40, 1), result("bob", 2, 50, 2)];

        let rows = compute_rows(&results, &HashMap::new(), &HashSet::new());
        assert_eq!(rows[0].total_points, 36);
        assert_eq!(rows[1].total_points, 78);
    }

    #[test]
    fn test_existing_keys_feed_totals_but_are_not_emitted() {
        let results = [
            result("alice", 4, 50, 0),
            result("alice", 5, 60, 0),
        ];
        let existing = HashSet::from([(4, "alice".to_string())]);

        let rows = compute_rows(&results, &HashMap::new(), &existing);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].gameweek, 5);
        // Gameweek 4 still contributes to the running sum.
        assert_eq!(rows[0].total_points, 110);
    }

    fn aggregate_row(user_id: &str, gameweek: i32, points: i32) -> AggregatedResult {
        AggregatedResult {
            gameweek,
            team_id: 42,
            user_id: user_id.to_string(),
            points,
            total_points: points,
        }
    }

    #[test]
    fn test_no_zero_point_rows_expires_nobody() {
        let rows = [
            aggregate_row("alice", 4, 50),
            aggregate_row("bob", 4, 61),
        ];
        assert!(zero_point_users(&rows).is_empty());
    }

    #[test]
    fn test_repeated_zeros_select_the_user_once() {
        let rows = [
            aggregate_row("alice", 4, 0),
            aggregate_row("alice", 6, 0),
            aggregate_row("bob", 4, 61),
        ];
        assert_eq!(zero_point_users(&rows), vec!["alice".to_string()]);
    }

    #[test]
    fn test_totals_monotonic_except_forced_zero() {
        let results = [
            result("alice", 1, 30, 0),
            result("alice", 2, 40, 0),
            result("alice", 3, 50, 0),
        ];
        let penalized = HashMap::from([("alice".to_string(), 2)]);

        let rows = compute_rows(&results, &penalized, &HashSet::new());
        let totals: Vec<i32> = rows.iter().map(|r| r.total_points).collect();
        assert_eq!(totals, vec![30, 30, 80]);
        assert!(totals.windows(2).all(|w| w[1] >= w[0]));
    }
}
