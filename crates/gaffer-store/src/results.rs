//! Gameweek-result repository.

use sqlx::postgres::PgRow;
use sqlx::Row;

use gaffer_core::{GameweekResult, SQUAD_SIZE};

use crate::error::{StoreError, StoreResult};
use crate::store::Store;

fn result_from_row(row: &PgRow) -> StoreResult<GameweekResult> {
    let user_id: String = row.get("user_id");
    let gameweek: i32 = row.get("gameweek");
    let raw_picks: Vec<i64> = row.get("picks");
    let len = raw_picks.len();
    let picks: [i64; SQUAD_SIZE] = raw_picks.try_into().map_err(|_| StoreError::CorruptPicks {
        user_id: user_id.clone(),
        gameweek,
        len,
    })?;

    Ok(GameweekResult {
        gameweek,
        user_id,
        team_id: row.get("team_id"),
        points: row.get("points"),
        transfers: row.get("transfers"),
        hits: row.get("hits"),
        bench_points: row.get("bench_points"),
        active_chip: row.get("active_chip"),
        picks,
    })
}

impl Store {
    /// All results, ordered by gameweek then user.
    pub async fn list_results(&self) -> StoreResult<Vec<GameweekResult>> {
        let rows = sqlx::query(
            r#"
            SELECT gameweek, user_id, team_id, points, transfers, hits,
                   bench_points, active_chip, picks
            FROM gameweek_results
            ORDER BY gameweek ASC, user_id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(result_from_row).collect()
    }

    /// Results for one gameweek.
    pub async fn results_for_gameweek(&self, gameweek: i32) -> StoreResult<Vec<GameweekResult>> {
        let rows = sqlx::query(
            r#"
            SELECT gameweek, user_id, team_id, points, transfers, hits,
                   bench_points, active_chip, picks
            FROM gameweek_results
            WHERE gameweek = $1
            ORDER BY user_id ASC
            "#,
        )
        .bind(gameweek)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(result_from_row).collect()
    }

}

impl Store {
    /// Apply a reconciliation plan for gameweek results in one transaction.
    pub async fn apply_result_plan(
        &self,
        inserts: &[GameweekResult],
        updates: &[GameweekResult],
    ) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        for result in inserts.iter().chain(updates) {
            upsert_result_tx(&mut tx, result).await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

async fn upsert_result_tx(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    result: &GameweekResult,
) -> StoreResult<()> {
    sqlx::query(
        r#"
        INSERT INTO gameweek_results (
            gameweek, user_id, team_id, points, transfers, hits,
            bench_points, active_chip, picks
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        ON CONFLICT (gameweek, user_id) DO UPDATE SET
            team_id = EXCLUDED.team_id,
            points = EXCLUDED.points,
            transfers = EXCLUDED.transfers,
            hits = EXCLUDED.hits,
            bench_points = EXCLUDED.bench_points,
            active_chip = EXCLUDED.active_chip,
            picks = EXCLUDED.picks,
            updated_at = NOW()
        "#,
    )
    .bind(result.gameweek)
    .bind(&result.user_id)
    .bind(result.team_id)
    .bind(result.points)
    .bind(result.transfers)
    .bind(result.hits)
    .bind(result.bench_points)
    .bind(&result.active_chip)
    .bind(result.picks.to_vec())
    .execute(&mut **tx)
    .await?;

    Ok(())
}
