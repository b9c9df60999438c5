//! Fixture repository.

use chrono::{DateTime, Utc};
use sqlx::Row;
use tracing::debug;

use gaffer_core::Fixture;

use crate::error::StoreResult;
use crate::store::Store;

impl Store {
    /// All known fixtures.
    pub async fn list_fixtures(&self) -> StoreResult<Vec<Fixture>> {
        let rows = sqlx::query(
            r#"
            SELECT fixture_id, gameweek, kickoff, home_team_id, away_team_id
            FROM fixtures
            ORDER BY fixture_id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|r| Fixture {
                fixture_id: r.get("fixture_id"),
                gameweek: r.get("gameweek"),
                kickoff: r.get("kickoff"),
                home_team_id: r.get("home_team_id"),
                away_team_id: r.get("away_team_id"),
            })
            .collect())
    }

    /// Apply a reconciliation plan for fixtures in one transaction.
    pub async fn apply_fixture_plan(
        &self,
        inserts: &[Fixture],
        updates: &[Fixture],
    ) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        for fixture in inserts.iter().chain(updates) {
            sqlx::query(
                r#"
                INSERT INTO fixtures (fixture_id, gameweek, kickoff, home_team_id, away_team_id)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (fixture_id) DO UPDATE SET
                    gameweek = EXCLUDED.gameweek,
                    kickoff = EXCLUDED.kickoff,
                    home_team_id = EXCLUDED.home_team_id,
                    away_team_id = EXCLUDED.away_team_id,
                    updated_at = NOW()
                "#,
            )
            .bind(fixture.fixture_id)
            .bind(fixture.gameweek)
            .bind(fixture.kickoff)
            .bind(fixture.home_team_id)
            .bind(fixture.away_team_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        debug!(
            inserts = inserts.len(),
            updates = updates.len(),
            "Applied fixture plan"
        );
        Ok(())
    }

    /// Latest kickoff per gameweek, for readiness scheduling.
    pub async fn latest_kickoffs(&self) -> StoreResult<Vec<(i32, DateTime<Utc>)>> {
        let rows = sqlx::query(
            r#"
            SELECT gameweek, MAX(kickoff) AS last_kickoff
            FROM fixtures
            GROUP BY gameweek
            ORDER BY gameweek ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|r| (r.get("gameweek"), r.get("last_kickoff")))
            .collect())
    }
}
