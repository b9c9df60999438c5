//! Wire-format payloads from the fantasy provider, plus conversions into
//! the domain types the rest of the pipeline works with.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use gaffer_core::{Fixture, GameweekResult, Player, StatEvent, StatKind, SQUAD_SIZE};

use crate::error::{ProviderError, ProviderResult};

/// Top-level bootstrap payload: gameweek deadlines plus the player roster.
#[derive(Debug, Clone, Deserialize)]
pub struct BootstrapResponse {
    pub events: Vec<DeadlineEvent>,
    pub elements: Vec<ElementDto>,
}

/// A gameweek as listed in the bootstrap payload.
#[derive(Debug, Clone, Deserialize)]
pub struct DeadlineEvent {
    pub id: i32,
    pub name: String,
    pub deadline_time: DateTime<Utc>,
}

/// A player as listed in the bootstrap payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ElementDto {
    pub id: i64,
    pub team: i64,
    pub web_name: String,
}

impl ElementDto {
    pub fn into_player(self) -> Player {
        Player {
            player_id: self.id,
            team_id: self.team,
            name: self.web_name,
        }
    }
}

/// One side of a per-fixture stat entry: a value attributed to a player.
#[derive(Debug, Clone, Deserialize)]
pub struct StatValueDto {
    pub value: i32,
    pub element: i64,
}

/// A per-fixture stat bucket keyed by the provider's identifier string.
/// Identifiers outside the penalizable set are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct FixtureStatDto {
    pub identifier: String,
    pub h: Vec<StatValueDto>,
    pub a: Vec<StatValueDto>,
}

/// A fixture as reported by the provider. Unscheduled fixtures carry null
/// `event` and `kickoff_time` and are skipped during conversion.
#[derive(Debug, Clone, Deserialize)]
pub struct FixtureDto {
    pub id: i64,
    pub event: Option<i32>,
    pub kickoff_time: Option<DateTime<Utc>>,
    pub team_h: i64,
    pub team_a: i64,
    pub finished: bool,
    #[serde(default)]
    pub stats: Vec<FixtureStatDto>,
}

impl FixtureDto {
    /// Convert into a domain fixture. Returns `None` for fixtures the
    /// provider has not yet scheduled into a gameweek.
    pub fn into_fixture(&self) -> Option<Fixture> {
        let gameweek = self.event?;
        let kickoff = self.kickoff_time?;
        Some(Fixture {
            fixture_id: self.id,
            gameweek,
            kickoff,
            home_team_id: self.team_h,
            away_team_id: self.team_a,
        })
    }

    /// Extract penalizable stat events from a finished fixture. Unfinished
    /// fixtures and unknown stat identifiers yield nothing.
    pub fn stat_events(&self) -> Vec<StatEvent> {
        if !self.finished {
            return Vec::new();
        }
        let Some(gameweek) = self.event else {
            return Vec::new();
        };
        let mut events = Vec::new();
        for stat in &self.stats {
            let Ok(kind) = stat.identifier.parse::<StatKind>() else {
                continue;
            };
            for side in [&stat.h, &stat.a] {
                for entry in side {
                    events.push(StatEvent::new(
                        self.id,
                        gameweek,
                        entry.element,
                        kind,
                        entry.value,
                    ));
                }
            }
        }
        events
    }
}

/// One entry in the provider's event-status list.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusEntry {
    pub bonus_added: bool,
    pub date: String,
    pub event: i32,
    pub points: String,
}

/// The provider's settlement signal for the current gameweek.
#[derive(Debug, Clone, Deserialize)]
pub struct EventStatusResponse {
    pub status: Vec<StatusEntry>,
    pub leagues: String,
}

impl EventStatusResponse {
    /// True once league standings have settled for the gameweek.
    pub fn is_updated(&self) -> bool {
        self.leagues == "Updated"
    }

    /// The gameweek the status entries report on. Callers must have
    /// rejected empty status lists before this point.
    pub fn reported_gameweek(&self) -> ProviderResult<i32> {
        self.status
            .first()
            .map(|entry| entry.event)
            .ok_or(ProviderError::EmptyStatus)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EntryHistoryDto {
    pub event: i32,
    pub points: i32,
    pub event_transfers: i32,
    pub event_transfers_cost: i32,
    pub points_on_bench: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PickDto {
    pub element: i64,
    pub position: i32,
}

/// A user's picks payload for one gameweek.
#[derive(Debug, Clone, Deserialize)]
pub struct PicksResponse {
    pub entry_history: EntryHistoryDto,
    #[serde(default)]
    pub active_chip: Option<String>,
    pub picks: Vec<PickDto>,
}

impl PicksResponse {
    /// Convert into a domain result, validating the squad is exactly 15
    /// picks. Transfer cost comes in as raw points and is stored as hits.
    pub fn into_result(self, team_id: i64, user_id: &str) -> ProviderResult<GameweekResult> {
        if self.picks.len() != SQUAD_SIZE {
            return Err(ProviderError::MalformedPicks {
                team_id,
                expected: SQUAD_SIZE,
                got: self.picks.len(),
            });
        }
        let mut sorted = self.picks;
        sorted.sort_by_key(|pick| pick.position);
        let mut picks = [0i64; SQUAD_SIZE];
        for (slot, pick) in picks.iter_mut().zip(&sorted) {
            *slot = pick.element;
        }
        Ok(GameweekResult {
            gameweek: self.entry_history.event,
            user_id: user_id.to_string(),
            team_id,
            points: self.entry_history.points,
            transfers: self.entry_history.event_transfers,
            hits: self.entry_history.event_transfers_cost / 4,
            bench_points: self.entry_history.points_on_bench,
            active_chip: self.active_chip.unwrap_or_default(),
            picks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn picks_json(count: usize) -> PicksResponse {
        PicksResponse {
            entry_history: EntryHistoryDto {
                event: 5,
                points: 61,
                event_transfers: 2,
                event_transfers_cost: 8,
                points_on_bench: 6,
            },
            active_chip: None,
            picks: (0..count)
                .map(|i| PickDto {
                    element: 200 + i as i64,
                    // reversed positions exercise the sort
                    position: (count - i) as i32,
                })
                .collect(),
        }
    }

    #[test]
    fn test_picks_convert_and_sort_by_position() {
        let result = picks_json(15).into_result(42, "alice").unwrap();
        assert_eq!(result.gameweek, 5);
        assert_eq!(result.hits, 2);
        assert_eq!(result.picks[0], 214); // position 1 had the highest offset
        assert_eq!(result.picks[14], 200);
    }

    #[test]
    fn test_picks_reject_short_squad() {
        let err = picks_json(11).into_result(42, "alice").unwrap_err();
        assert!(matches!(
            err,
            ProviderError::MalformedPicks { got: 11, .. }
        ));
    }

    #[test]
    fn test_fixture_skips_unscheduled() {
        let dto = FixtureDto {
            id: 9,
            event: None,
            kickoff_time: None,
            team_h: 1,
            team_a: 2,
            finished: false,
            stats: Vec::new(),
        };
        assert!(dto.into_fixture().is_none());
    }

    #[test]
    fn test_stat_events_only_from_finished_fixtures() {
        let stats = vec![
            FixtureStatDto {
                identifier: "red_cards".to_string(),
                h: vec![StatValueDto {
                    value: 1,
                    element: 301,
                }],
                a: Vec::new(),
            },
            FixtureStatDto {
                identifier: "goals_scored".to_string(),
                h: vec![StatValueDto {
                    value: 2,
                    element: 302,
                }],
                a: Vec::new(),
            },
        ];
        let mut dto = FixtureDto {
            id: 9,
            event: Some(5),
            kickoff_time: None,
            team_h: 1,
            team_a: 2,
            finished: false,
            stats,
        };
        assert!(dto.stat_events().is_empty());

        dto.finished = true;
        let events = dto.stat_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, StatKind::RedCards);
        assert_eq!(events[0].player_id, 301);
    }

    #[test]
    fn test_fixture_payload_parses_from_wire_json() {
        let payload = r#"
        [
            {
                "id": 9, "event": 5, "kickoff_time": "2024-03-02T15:00:00Z",
                "team_h": 1, "team_a": 2, "finished": true,
                "stats": [
                    {"identifier": "own_goals",
                     "h": [], "a": [{"value": 1, "element": 301}]}
                ]
            },
            {
                "id": 10, "event": null, "kickoff_time": null,
                "team_h": 3, "team_a": 4, "finished": false
            }
        ]
        "#;
        let fixtures: Vec<FixtureDto> = serde_json::from_str(payload).unwrap();

        let scheduled = fixtures[0].into_fixture().unwrap();
        assert_eq!(scheduled.fixture_id, 9);
        assert_eq!(scheduled.gameweek, 5);

        let events = fixtures[0].stat_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, StatKind::OwnGoals);
        assert_eq!(events[0].player_id, 301);

        // Missing stats falls back to the default empty list.
        assert!(fixtures[1].stats.is_empty());
        assert!(fixtures[1].into_fixture().is_none());
    }

    #[test]
    fn test_picks_payload_parses_with_null_chip() {
        let picks: String = (1..=15)
            .map(|i| format!(r#"{{"element": {}, "position": {i}}}"#, 200 + i))
            .collect::<Vec<_>>()
            .join(",");
        let payload = format!(
            r#"
            {{
                "entry_history": {{
                    "event": 5, "points": 61, "event_transfers": 2,
                    "event_transfers_cost": 8, "points_on_bench": 6
                }},
                "active_chip": null,
                "picks": [{picks}]
            }}
            "#
        );
        let response: PicksResponse = serde_json::from_str(&payload).unwrap();

        let result = response.into_result(42, "alice").unwrap();
        assert_eq!(result.gameweek, 5);
        assert_eq!(result.hits, 2);
        assert!(result.active_chip.is_empty());
        assert_eq!(result.picks[0], 201);
    }

    #[test]
    fn test_event_status_updated_flag() {
        let status = EventStatusResponse {
            status: vec![StatusEntry {
                bonus_added: true,
                date: "2024-03-02".to_string(),
                event: 27,
                points: "r".to_string(),
            }],
            leagues: "Updated".to_string(),
        };
        assert!(status.is_updated());
        assert_eq!(status.reported_gameweek().unwrap(), 27);

        let pending = EventStatusResponse {
            status: Vec::new(),
            leagues: "Updating".to_string(),
        };
        assert!(!pending.is_updated());
        assert!(pending.reported_gameweek().is_err());
    }
}
