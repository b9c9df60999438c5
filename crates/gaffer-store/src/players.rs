//! Player repository.

use sqlx::Row;
use tracing::debug;

use gaffer_core::Player;

use crate::error::StoreResult;
use crate::store::Store;

impl Store {
    /// All known players.
    pub async fn list_players(&self) -> StoreResult<Vec<Player>> {
        let rows = sqlx::query(
            r#"
            SELECT player_id, team_id, name
            FROM players
            ORDER BY player_id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|r| Player {
                player_id: r.get("player_id"),
                team_id: r.get("team_id"),
                name: r.get("name"),
            })
            .collect())
    }

    /// Apply a reconciliation plan for players in one transaction.
    pub async fn apply_player_plan(
        &self,
        inserts: &[Player],
        updates: &[Player],
    ) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        for player in inserts.iter().chain(updates) {
            sqlx::query(
                r#"
                INSERT INTO players (player_id, team_id, name)
                VALUES ($1, $2, $3)
                ON CONFLICT (player_id) DO UPDATE SET
                    team_id = EXCLUDED.team_id,
                    name = EXCLUDED.name,
                    updated_at = NOW()
                "#,
            )
            .bind(player.player_id)
            .bind(player.team_id)
            .bind(&player.name)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        debug!(
            inserts = inserts.len(),
            updates = updates.len(),
            "Applied player plan"
        );
        Ok(())
    }
}
