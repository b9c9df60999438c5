//! Card repository. A batch insert is one transaction, which is what gives
//! each worker's per-user pass its atomicity.

use std::collections::HashSet;

use sqlx::postgres::PgRow;
use sqlx::Row;
use tracing::debug;

use gaffer_core::{Card, CardKind};

use crate::error::StoreResult;
use crate::store::Store;

fn card_from_row(row: &PgRow) -> StoreResult<Card> {
    let kind: CardKind = row.get::<String, _>("kind").parse()?;
    Ok(Card {
        card_hash: row.get("card_hash"),
        team_id: row.get("team_id"),
        user_id: row.get("user_id"),
        nominator_team_id: row.get("nominator_team_id"),
        nominator_user_id: row.get("nominator_user_id"),
        gameweek: row.get("gameweek"),
        kind,
        league_id: row.get("league_id"),
        is_completed: row.get("is_completed"),
        admin_verified: row.get("admin_verified"),
    })
}

const CARD_COLUMNS: &str = "card_hash, team_id, user_id, nominator_team_id, nominator_user_id, \
     gameweek, kind, league_id, is_completed, admin_verified";

async fn insert_card_tx(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    card: &Card,
) -> StoreResult<u64> {
    let result = sqlx::query(
        r#"
        INSERT INTO cards (
            card_hash, team_id, user_id, nominator_team_id, nominator_user_id,
            gameweek, kind, league_id, is_completed, admin_verified
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        ON CONFLICT (card_hash) DO NOTHING
        "#,
    )
    .bind(&card.card_hash)
    .bind(card.team_id)
    .bind(&card.user_id)
    .bind(card.nominator_team_id)
    .bind(&card.nominator_user_id)
    .bind(card.gameweek)
    .bind(card.kind.as_str())
    .bind(card.league_id)
    .bind(card.is_completed)
    .bind(card.admin_verified)
    .execute(&mut **tx)
    .await?;

    Ok(result.rows_affected())
}

impl Store {
    /// All stored card hashes, for pre-filtering generation.
    pub async fn list_card_hashes(&self) -> StoreResult<HashSet<String>> {
        let rows = sqlx::query("SELECT card_hash FROM cards")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(|r| r.get("card_hash")).collect())
    }

    /// One card by hash.
    pub async fn fetch_card(&self, card_hash: &str) -> StoreResult<Option<Card>> {
        let row = sqlx::query(&format!(
            "SELECT {CARD_COLUMNS} FROM cards WHERE card_hash = $1"
        ))
        .bind(card_hash)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(card_from_row).transpose()
    }

    /// All cards still awaiting admin verification.
    pub async fn outstanding_cards(&self) -> StoreResult<Vec<Card>> {
        let rows = sqlx::query(&format!(
            "SELECT {CARD_COLUMNS} FROM cards WHERE admin_verified = FALSE \
             ORDER BY gameweek ASC, card_hash ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(card_from_row).collect()
    }

    /// Insert cards in one transaction. Returns how many rows actually
    /// landed; duplicates by hash are skipped.
    pub async fn insert_cards(&self, cards: &[Card]) -> StoreResult<u64> {
        if cards.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;
        for card in cards {
            inserted += insert_card_tx(&mut tx, card).await?;
        }
        tx.commit().await?;

        debug!(requested = cards.len(), inserted, "Inserted cards");
        Ok(inserted)
    }

    /// Replace a card in place, keyed by its hash.
    pub async fn update_card(&self, card: &Card) -> StoreResult<()> {
        sqlx::query(
            r#"
            UPDATE cards SET
                team_id = $1,
                user_id = $2,
                nominator_team_id = $3,
                nominator_user_id = $4,
                gameweek = $5,
                kind = $6,
                league_id = $7,
                is_completed = $8,
                admin_verified = $9
            WHERE card_hash = $10
            "#,
        )
        .bind(card.team_id)
        .bind(&card.user_id)
        .bind(card.nominator_team_id)
        .bind(&card.nominator_user_id)
        .bind(card.gameweek)
        .bind(card.kind.as_str())
        .bind(card.league_id)
        .bind(card.is_completed)
        .bind(card.admin_verified)
        .bind(&card.card_hash)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Close out every unverified card held by the given users. Coarse on
    /// purpose: a settled zero clears the user's whole outstanding slate.
    pub async fn expire_cards_for_users(&self, user_ids: &[String]) -> StoreResult<u64> {
        if user_ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query(
            r#"
            UPDATE cards SET
                admin_verified = TRUE,
                is_completed = TRUE
            WHERE user_id = ANY($1) AND admin_verified = FALSE
            "#,
        )
        .bind(user_ids)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
