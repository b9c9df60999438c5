//! Aggregated-leaderboard repository. Rows are append-only: once a
//! (gameweek, user) key exists it is never recomputed.

use std::collections::HashSet;

use sqlx::Row;
use tracing::info;

use gaffer_core::AggregatedResult;

use crate::error::StoreResult;
use crate::store::Store;

impl Store {
    /// Keys already aggregated, so the engine only emits missing rows.
    pub async fn aggregated_keys(&self) -> StoreResult<HashSet<(i32, String)>> {
        let rows = sqlx::query("SELECT gameweek, user_id FROM aggregated_results")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .iter()
            .map(|r| (r.get("gameweek"), r.get("user_id")))
            .collect())
    }

    /// Highest gameweek with any aggregated row.
    pub async fn max_aggregated_gameweek(&self) -> StoreResult<Option<i32>> {
        let row = sqlx::query("SELECT MAX(gameweek) AS max_gw FROM aggregated_results")
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get("max_gw"))
    }

    /// Insert newly computed leaderboard rows in one transaction.
    pub async fn insert_aggregates(&self, rows: &[AggregatedResult]) -> StoreResult<()> {
        if rows.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;

        for row in rows {
            sqlx::query(
                r#"
                INSERT INTO aggregated_results (gameweek, user_id, team_id, points, total_points)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (gameweek, user_id) DO NOTHING
                "#,
            )
            .bind(row.gameweek)
            .bind(&row.user_id)
            .bind(row.team_id)
            .bind(row.points)
            .bind(row.total_points)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        info!(rows = rows.len(), "Inserted aggregated results");
        Ok(())
    }

    /// All aggregated rows, ordered by gameweek then user.
    pub async fn list_aggregates(&self) -> StoreResult<Vec<AggregatedResult>> {
        let rows = sqlx::query(
            r#"
            SELECT gameweek, user_id, team_id, points, total_points
            FROM aggregated_results
            ORDER BY gameweek ASC, user_id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|r| AggregatedResult {
                gameweek: r.get("gameweek"),
                user_id: r.get("user_id"),
                team_id: r.get("team_id"),
                points: r.get("points"),
                total_points: r.get("total_points"),
            })
            .collect())
    }

    /// Current leaderboard: each user's latest aggregated row, best total
    /// first.
    pub async fn current_standings(&self) -> StoreResult<Vec<AggregatedResult>> {
        let rows = sqlx::query(
            r#"
            SELECT gameweek, user_id, team_id, points, total_points
            FROM (
                SELECT *,
                       ROW_NUMBER() OVER (PARTITION BY user_id ORDER BY gameweek DESC) AS rn
                FROM aggregated_results
            ) ranked
            WHERE rn = 1
            ORDER BY total_points DESC, user_id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|r| AggregatedResult {
                gameweek: r.get("gameweek"),
                user_id: r.get("user_id"),
                team_id: r.get("team_id"),
                points: r.get("points"),
                total_points: r.get("total_points"),
            })
            .collect())
    }
}
