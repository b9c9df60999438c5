//! Card-generation orchestration: build immutable snapshots, fan users out
//! across the worker pool, land each user's cards in their own transaction.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::info;

use gaffer_core::{Card, GameweekResult, LeagueMembership, StatEvent};
use gaffer_store::Store;

use crate::error::{CardError, CardResult};
use crate::generator::generate_for_user;
use crate::pool::run_pool;

/// Read-only lookup data shared by every worker. Built once before fan-out;
/// workers never write to it.
struct Snapshot {
    results_by_user: HashMap<String, Vec<GameweekResult>>,
    events_by_player: HashMap<i64, Vec<StatEvent>>,
    linked_by_user: HashMap<String, Vec<LeagueMembership>>,
    existing_hashes: HashSet<String>,
}

pub struct CardService {
    store: Store,
    workers: usize,
}

impl CardService {
    pub fn new(store: Store, workers: usize) -> Self {
        Self { store, workers }
    }

    /// Generate cards for every registered user. Individual user failures
    /// do not block other users; any failure surfaces as an aggregate
    /// error after the pass completes.
    pub async fn generate_all(&self) -> CardResult<()> {
        let users = self.store.list_users().await?;
        let snapshot = Arc::new(self.build_snapshot().await?);

        let jobs: Vec<String> = users.into_iter().map(|u| u.user_id).collect();
        let total = jobs.len();
        info!(users = total, workers = self.workers, "Generating cards");

        let store = self.store.clone();
        let report = run_pool(self.workers, jobs, move |user_id: String| {
            let store = store.clone();
            let snapshot = Arc::clone(&snapshot);
            async move { generate_one(&store, &snapshot, &user_id).await }
        })
        .await;

        if report.all_succeeded() {
            Ok(())
        } else {
            Err(CardError::WorkerFailures {
                failed: report.failed,
                total: report.total,
            })
        }
    }

    async fn build_snapshot(&self) -> CardResult<Snapshot> {
        let mut results_by_user: HashMap<String, Vec<GameweekResult>> = HashMap::new();
        for result in self.store.list_results().await? {
            results_by_user
                .entry(result.user_id.clone())
                .or_default()
                .push(result);
        }

        let mut events_by_player: HashMap<i64, Vec<StatEvent>> = HashMap::new();
        for event in self.store.list_events().await? {
            events_by_player
                .entry(event.player_id)
                .or_default()
                .push(event);
        }

        let mut linked_by_user: HashMap<String, Vec<LeagueMembership>> = HashMap::new();
        for membership in self.store.list_memberships().await? {
            if membership.is_linked {
                linked_by_user
                    .entry(membership.user_id.clone())
                    .or_default()
                    .push(membership);
            }
        }

        let existing_hashes = self.store.list_card_hashes().await?;

        Ok(Snapshot {
            results_by_user,
            events_by_player,
            linked_by_user,
            existing_hashes,
        })
    }
}

async fn generate_one(store: &Store, snapshot: &Snapshot, user_id: &str) -> CardResult<()> {
    let Some(results) = snapshot.results_by_user.get(user_id) else {
        return Ok(());
    };
    let Some(leagues) = snapshot.linked_by_user.get(user_id) else {
        return Ok(());
    };

    let cards: Vec<Card> = generate_for_user(
        results,
        &snapshot.events_by_player,
        leagues,
        &snapshot.existing_hashes,
    );
    if cards.is_empty() {
        return Ok(());
    }

    let inserted = store.insert_cards(&cards).await?;
    info!(user_id = %user_id, inserted, "Generated cards for user");
    Ok(())
}
