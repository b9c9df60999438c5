//! League-membership and user repositories.

use sqlx::Row;

use gaffer_core::{LeagueMembership, UserRef};

use crate::error::StoreResult;
use crate::store::Store;

impl Store {
    /// All registered users.
    pub async fn list_users(&self) -> StoreResult<Vec<UserRef>> {
        let rows = sqlx::query(
            r#"
            SELECT user_id, team_id, has_reverse
            FROM users
            ORDER BY user_id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|r| UserRef {
                user_id: r.get("user_id"),
                team_id: r.get("team_id"),
                has_reverse: r.get("has_reverse"),
            })
            .collect())
    }

    /// One user by id.
    pub async fn fetch_user(&self, user_id: &str) -> StoreResult<Option<UserRef>> {
        let row = sqlx::query("SELECT user_id, team_id, has_reverse FROM users WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| UserRef {
            user_id: r.get("user_id"),
            team_id: r.get("team_id"),
            has_reverse: r.get("has_reverse"),
        }))
    }

    /// Consume a user's one-shot reversal. Returns false when the user has
    /// none left, without touching the row.
    pub async fn consume_reverse(&self, user_id: &str) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE users SET has_reverse = FALSE WHERE user_id = $1 AND has_reverse = TRUE",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// All memberships, linked or not.
    pub async fn list_memberships(&self) -> StoreResult<Vec<LeagueMembership>> {
        let rows = sqlx::query(
            r#"
            SELECT league_id, user_id, team_id, is_linked, is_default
            FROM league_memberships
            ORDER BY league_id ASC, user_id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(membership_from_row).collect())
    }

    /// The user's default league, where nominations land.
    pub async fn default_membership(
        &self,
        user_id: &str,
    ) -> StoreResult<Option<LeagueMembership>> {
        let row = sqlx::query(
            r#"
            SELECT league_id, user_id, team_id, is_linked, is_default
            FROM league_memberships
            WHERE user_id = $1 AND is_default = TRUE
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(membership_from_row))
    }
}

fn membership_from_row(row: &sqlx::postgres::PgRow) -> LeagueMembership {
    LeagueMembership {
        league_id: row.get("league_id"),
        user_id: row.get("user_id"),
        team_id: row.get("team_id"),
        is_linked: row.get("is_linked"),
        is_default: row.get("is_default"),
    }
}
