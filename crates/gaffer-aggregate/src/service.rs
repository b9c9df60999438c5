//! Aggregation passes against the store: compute missing leaderboard rows
//! in one transaction, then close out cards served by a settled zero.

use tracing::{debug, info};

use gaffer_store::Store;

use crate::engine::{compute_rows, penalized_users, zero_point_users};
use crate::error::AggregateResult;

pub struct AggregateService {
    store: Store,
}

impl AggregateService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Compute and insert every missing (gameweek, user) leaderboard row.
    /// Returns how many rows were emitted.
    pub async fn aggregate(&self) -> AggregateResult<usize> {
        let outstanding = self.store.outstanding_cards().await?;
        let penalized = penalized_users(&outstanding);
        let results = self.store.list_results().await?;
        let existing = self.store.aggregated_keys().await?;

        let rows = compute_rows(&results, &penalized, &existing);
        if rows.is_empty() {
            debug!("No new leaderboard rows");
            return Ok(0);
        }

        info!(
            rows = rows.len(),
            penalized = penalized.len(),
            "Aggregating leaderboard rows"
        );
        self.store.insert_aggregates(&rows).await?;
        Ok(rows.len())
    }

    /// Expire the outstanding cards of every user holding a settled
    /// zero-point gameweek. Returns how many cards were closed out.
    pub async fn expire_cards(&self) -> AggregateResult<u64> {
        let aggregates = self.store.list_aggregates().await?;
        let user_ids = zero_point_users(&aggregates);
        if user_ids.is_empty() {
            debug!("No zero-point gameweeks; nothing to expire");
            return Ok(0);
        }

        let updated = self.store.expire_cards_for_users(&user_ids).await?;
        info!(users = user_ids.len(), cards = updated, "Expired cards");
        Ok(updated)
    }
}
