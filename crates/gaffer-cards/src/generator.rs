//! Pure per-user card generation.
//!
//! Works over immutable snapshots built before fan-out; the only state it
//! consults is what it is handed. Re-running over the same inputs emits
//! nothing new: the card hash is the sole correctness mechanism.

use std::collections::{HashMap, HashSet};

use gaffer_core::{Card, GameweekResult, LeagueMembership, StatEvent};

/// Generate the missing cards for one user.
///
/// `results` are the user's stored gameweek results, `events_by_player`
/// the full stat-event snapshot keyed by player, `leagues` the user's
/// linked memberships, `existing_hashes` every card hash already stored.
/// Hashes emitted earlier in the same pass also count as seen.
pub fn generate_for_user(
    results: &[GameweekResult],
    events_by_player: &HashMap<i64, Vec<StatEvent>>,
    leagues: &[LeagueMembership],
    existing_hashes: &HashSet<String>,
) -> Vec<Card> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut cards = Vec::new();

    for result in results {
        for &player_id in result.starting_xi() {
            let Some(events) = events_by_player.get(&player_id) else {
                continue;
            };
            for event in events {
                if event.gameweek != result.gameweek {
                    continue;
                }
                // One event value may represent multiple occurrences,
                // e.g. two own goals in one fixture.
                for card_index in 0..event.value {
                    for league in leagues {
                        let card = Card::generated(
                            &result.user_id,
                            league.team_id,
                            league.league_id,
                            result.gameweek,
                            event.kind,
                            card_index,
                        );
                        if existing_hashes.contains(&card.card_hash) {
                            continue;
                        }
                        if seen.insert(card.card_hash.clone()) {
                            cards.push(card);
                        }
                    }
                }
            }
        }
    }

    cards
}

#[cfg(test)]
mod tests {
    use super::*;
    use gaffer_core::{StatKind, SQUAD_SIZE};

    fn membership(league_id: i64) -> LeagueMembership {
        LeagueMembership {
            league_id,
            user_id: "alice".to_string(),
            team_id: 42,
            is_linked: true,
            is_default: league_id == 7,
        }
    }

    fn result_with_player(player_id: i64, slot: usize, gameweek: i32) -> GameweekResult {
        let mut picks = [0i64; SQUAD_SIZE];
        for (idx, pick) in picks.iter_mut().enumerate() {
            *pick = 1000 + idx as i64;
        }
        picks[slot - 1] = player_id;
        GameweekResult {
            gameweek,
            user_id: "alice".to_string(),
            team_id: 42,
            points: 55,
            transfers: 0,
            hits: 0,
            bench_points: 4,
            active_chip: String::new(),
            picks,
        }
    }

    fn events_for(player_id: i64, event: StatEvent) -> HashMap<i64, Vec<StatEvent>> {
        HashMap::from([(player_id, vec![event])])
    }

    #[test]
    fn test_slot_eleven_red_card_in_two_leagues() {
        let results = [result_with_player(99, 11, 5)];
        let events = events_for(99, StatEvent::new(10, 5, 99, StatKind::RedCards, 1));
        let leagues = [membership(7), membership(8)];

        let cards = generate_for_user(&results, &events, &leagues, &HashSet::new());
        assert_eq!(cards.len(), 2);
        let league_ids: HashSet<i64> = cards.iter().map(|c| c.league_id).collect();
        assert_eq!(league_ids, HashSet::from([7, 8]));
        for card in &cards {
            assert!(card.card_hash.ends_with("_red_cards_0"));
            assert!(!card.admin_verified);
            assert!(!card.is_completed);
        }
    }

    #[test]
    fn test_bench_player_earns_nothing() {
        let results = [result_with_player(99, 12, 5)];
        let events = events_for(99, StatEvent::new(10, 5, 99, StatKind::RedCards, 1));
        let leagues = [membership(7)];

        let cards = generate_for_user(&results, &events, &leagues, &HashSet::new());
        assert!(cards.is_empty());
    }

    #[test]
    fn test_event_value_fans_out_by_index() {
        let results = [result_with_player(99, 3, 5)];
        let events = events_for(99, StatEvent::new(10, 5, 99, StatKind::OwnGoals, 2));
        let leagues = [membership(7)];

        let cards = generate_for_user(&results, &events, &leagues, &HashSet::new());
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].card_hash, "alice_7_5_own_goals_0");
        assert_eq!(cards[1].card_hash, "alice_7_5_own_goals_1");
    }

    #[test]
    fn test_second_run_is_idempotent() {
        let results = [result_with_player(99, 11, 5)];
        let events = events_for(99, StatEvent::new(10, 5, 99, StatKind::RedCards, 1));
        let leagues = [membership(7), membership(8)];

        let first = generate_for_user(&results, &events, &leagues, &HashSet::new());
        assert_eq!(first.len(), 2);

        let stored: HashSet<String> = first.iter().map(|c| c.card_hash.clone()).collect();
        let second = generate_for_user(&results, &events, &leagues, &stored);
        assert!(second.is_empty());
    }

    #[test]
    fn test_wrong_gameweek_event_is_skipped() {
        let results = [result_with_player(99, 11, 5)];
        let events = events_for(99, StatEvent::new(10, 6, 99, StatKind::RedCards, 1));
        let leagues = [membership(7)];

        let cards = generate_for_user(&results, &events, &leagues, &HashSet::new());
        assert!(cards.is_empty());
    }
}
