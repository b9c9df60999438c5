//! Stat-event repository. Append-only: existing rows are never rewritten,
//! so the first event to claim a hash wins.

use std::collections::HashSet;

use sqlx::Row;
use tracing::debug;

use gaffer_core::{StatEvent, StatKind};

use crate::error::StoreResult;
use crate::store::Store;

impl Store {
    /// All stored event hashes, for pre-filtering inserts.
    pub async fn list_event_hashes(&self) -> StoreResult<HashSet<String>> {
        let rows = sqlx::query("SELECT event_hash FROM stat_events")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(|r| r.get("event_hash")).collect())
    }

    /// All stored stat events.
    pub async fn list_events(&self) -> StoreResult<Vec<StatEvent>> {
        let rows = sqlx::query(
            r#"
            SELECT event_hash, fixture_id, gameweek, player_id, kind, value
            FROM stat_events
            ORDER BY gameweek ASC, event_hash ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|r| {
                let kind: StatKind = r.get::<String, _>("kind").parse()?;
                Ok(StatEvent {
                    event_hash: r.get("event_hash"),
                    fixture_id: r.get("fixture_id"),
                    gameweek: r.get("gameweek"),
                    player_id: r.get("player_id"),
                    kind,
                    value: r.get("value"),
                })
            })
            .collect()
    }

    /// Insert new stat events in one transaction. The hash constraint is
    /// the backstop: a duplicate hash is silently skipped, never updated.
    pub async fn insert_events(&self, events: &[StatEvent]) -> StoreResult<()> {
        if events.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;

        for event in events {
            sqlx::query(
                r#"
                INSERT INTO stat_events (event_hash, fixture_id, gameweek, player_id, kind, value)
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (event_hash) DO NOTHING
                "#,
            )
            .bind(&event.event_hash)
            .bind(event.fixture_id)
            .bind(event.gameweek)
            .bind(event.player_id)
            .bind(event.kind.as_str())
            .bind(event.value)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        debug!(events = events.len(), "Inserted stat events");
        Ok(())
    }
}
