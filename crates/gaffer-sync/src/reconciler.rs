//! Reconciliation passes: fetch an entity kind from the provider, diff it
//! against the store, and apply the plan in one transaction per kind.

use std::sync::Arc;

use tracing::{debug, info};

use gaffer_core::GameweekResult;
use gaffer_provider::ProviderClient;
use gaffer_store::Store;

use crate::diff::{plan, SyncMode};
use crate::error::SyncResult;

pub struct Reconciler {
    provider: Arc<dyn ProviderClient>,
    store: Store,
}

impl Reconciler {
    pub fn new(provider: Arc<dyn ProviderClient>, store: Store) -> Self {
        Self { provider, store }
    }

    /// Bring stored fixtures to parity with the provider's schedule.
    pub async fn sync_fixtures(&self) -> SyncResult<()> {
        let incoming: Vec<_> = self
            .provider
            .fetch_fixtures()
            .await?
            .iter()
            .filter_map(|dto| dto.into_fixture())
            .collect();
        let existing = self.store.list_fixtures().await?;

        let plan = plan(incoming, &existing, |f| f.fixture_id, SyncMode::Upsert);
        if plan.is_noop() {
            debug!("Fixtures already in sync");
            return Ok(());
        }

        info!(
            inserts = plan.inserts.len(),
            updates = plan.updates.len(),
            "Syncing fixtures"
        );
        self.store
            .apply_fixture_plan(&plan.inserts, &plan.updates)
            .await?;
        Ok(())
    }

    /// Bring the stored player roster to parity with the bootstrap payload.
    pub async fn sync_players(&self) -> SyncResult<()> {
        let bootstrap = self.provider.fetch_bootstrap().await?;
        let incoming: Vec<_> = bootstrap
            .elements
            .into_iter()
            .map(|e| e.into_player())
            .collect();
        let existing = self.store.list_players().await?;

        let plan = plan(incoming, &existing, |p| p.player_id, SyncMode::Upsert);
        if plan.is_noop() {
            debug!("Players already in sync");
            return Ok(());
        }

        info!(
            inserts = plan.inserts.len(),
            updates = plan.updates.len(),
            "Syncing players"
        );
        self.store
            .apply_player_plan(&plan.inserts, &plan.updates)
            .await?;
        Ok(())
    }

    /// Ingest stat events from finished fixtures. Append-only: an existing
    /// hash is never rewritten, and duplicate hashes within one poll
    /// collapse to the first row.
    pub async fn sync_events(&self) -> SyncResult<usize> {
        let fixtures = self.provider.fetch_fixtures().await?;
        let incoming: Vec<_> = fixtures.iter().flat_map(|dto| dto.stat_events()).collect();
        let existing_hashes = self.store.list_event_hashes().await?;

        let mut seen = existing_hashes;
        let mut inserts = Vec::new();
        for event in incoming {
            if seen.insert(event.event_hash.clone()) {
                inserts.push(event);
            }
        }

        if inserts.is_empty() {
            debug!("No new stat events");
            return Ok(0);
        }

        info!(inserts = inserts.len(), "Syncing stat events");
        self.store.insert_events(&inserts).await?;
        Ok(inserts.len())
    }

    /// Fetch every registered user's picks for the reported gameweek and
    /// upsert changed rows. A fetch failure aborts the whole pass.
    pub async fn sync_results(&self, gameweek: i32) -> SyncResult<()> {
        let users = self.store.list_users().await?;

        let mut incoming: Vec<GameweekResult> = Vec::with_capacity(users.len());
        for user in &users {
            let result = self
                .provider
                .fetch_picks(user.team_id, &user.user_id, gameweek)
                .await?;
            incoming.push(result);
        }

        let existing = self.store.results_for_gameweek(gameweek).await?;
        let plan = plan(
            incoming,
            &existing,
            |r| r.user_id.clone(),
            SyncMode::Upsert,
        );
        if plan.is_noop() {
            debug!(gameweek, "Gameweek results already in sync");
            return Ok(());
        }

        info!(
            gameweek,
            inserts = plan.inserts.len(),
            updates = plan.updates.len(),
            "Syncing gameweek results"
        );
        self.store
            .apply_result_plan(&plan.inserts, &plan.updates)
            .await?;
        Ok(())
    }
}
