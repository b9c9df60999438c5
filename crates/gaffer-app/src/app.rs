//! Application wiring: the pipeline behind the readiness scheduler.
//!
//! One daily task checks whether a gameweek's completion boundary is today
//! and, if so, ensures the status poll is registered. The status poll ends
//! itself once the provider reports the gameweek settled, after running the
//! full chain: events → results → cards → aggregation → expiry.

use std::future::Future;
use std::ops::ControlFlow;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveTime, Utc};
use parking_lot::Mutex;
use tracing::{debug, error, info};

use gaffer_aggregate::AggregateService;
use gaffer_cards::CardService;
use gaffer_provider::{FplClient, ProviderClient};
use gaffer_scheduler::{ReadinessMachine, TaskRegistry, WatchAction};
use gaffer_store::Store;
use gaffer_sync::Reconciler;

use crate::config::AppConfig;
use crate::error::AppResult;

const DAILY_TASK: &str = "daily-readiness";
const STATUS_POLL_TASK: &str = "status-poll";

type TaskFuture = Pin<Box<dyn Future<Output = ControlFlow<()>> + Send>>;

struct Pipeline {
    provider: Arc<dyn ProviderClient>,
    store: Store,
    reconciler: Reconciler,
    cards: CardService,
    aggregates: AggregateService,
    machine: Mutex<ReadinessMachine>,
}

impl Pipeline {
    /// Daily readiness pass. Returns true when the status poll must be
    /// registered. Any failure leaves the state untouched; tomorrow's
    /// tick is the retry.
    async fn daily_tick(&self) -> bool {
        if let Err(err) = self.reconciler.sync_fixtures().await {
            error!(error = %err, "Fixture sync failed");
            return false;
        }
        if let Err(err) = self.reconciler.sync_players().await {
            error!(error = %err, "Player sync failed");
            return false;
        }

        let kickoffs = match self.store.latest_kickoffs().await {
            Ok(kickoffs) => kickoffs,
            Err(err) => {
                error!(error = %err, "Failed to read fixture kickoffs");
                return false;
            }
        };

        let today_midnight = Utc::now().date_naive().and_time(NaiveTime::MIN).and_utc();
        let due = self.machine.lock().daily_check(today_midnight, &kickoffs);
        if due {
            info!("A gameweek's completion boundary is today; watching for settlement");
        }
        due
    }

    /// Status poll pass. `Break` ends the poll: either the gameweek
    /// settled and the chain ran, or it failed and the next daily boundary
    /// is the retry.
    async fn hourly_tick(&self) -> ControlFlow<()> {
        let status = match self.provider.fetch_event_status().await {
            Ok(status) => status,
            Err(err) => {
                error!(error = %err, "Status poll failed");
                return ControlFlow::Continue(());
            }
        };
        let gameweek = match status.reported_gameweek() {
            Ok(gameweek) => gameweek,
            Err(err) => {
                error!(error = %err, "Status poll returned no entries");
                return ControlFlow::Continue(());
            }
        };

        let action = self
            .machine
            .lock()
            .observe_status(status.is_updated(), gameweek);
        match action {
            WatchAction::Stay => {
                debug!(gameweek, leagues = %status.leagues, "Gameweek not settled yet");
                ControlFlow::Continue(())
            }
            WatchAction::RunChain { gameweek } => {
                info!(gameweek, "Gameweek settled; running pipeline chain");
                if let Err(err) = self.run_chain(gameweek).await {
                    // Settlement was signalled, so the poll still ends;
                    // the next completion boundary is the retry.
                    error!(error = %err, gameweek, "Pipeline chain failed");
                }
                ControlFlow::Break(())
            }
        }
    }

    async fn run_chain(&self, gameweek: i32) -> AppResult<()> {
        self.reconciler.sync_events().await?;
        self.reconciler.sync_results(gameweek).await?;
        self.cards.generate_all().await?;
        self.aggregates.aggregate().await?;
        self.aggregates.expire_cards().await?;
        info!(gameweek, "Pipeline chain complete");
        Ok(())
    }
}

pub struct Application {
    config: AppConfig,
    pipeline: Arc<Pipeline>,
    registry: Arc<TaskRegistry>,
}

impl Application {
    /// Connect the store, run migrations and wire the pipeline.
    pub async fn new(config: AppConfig) -> AppResult<Self> {
        let store = Store::connect(&config.database_url, config.max_connections).await?;
        store.migrate().await?;

        let provider: Arc<dyn ProviderClient> =
            Arc::new(FplClient::new(config.provider_base_url.clone())?);

        let pipeline = Arc::new(Pipeline {
            provider: Arc::clone(&provider),
            store: store.clone(),
            reconciler: Reconciler::new(provider, store.clone()),
            cards: CardService::new(store.clone(), config.workers),
            aggregates: AggregateService::new(store),
            machine: Mutex::new(ReadinessMachine::new()),
        });

        Ok(Self {
            config,
            pipeline,
            registry: Arc::new(TaskRegistry::new()),
        })
    }

    /// Run until shutdown is requested.
    pub async fn run(&self) -> AppResult<()> {
        let poll_period = Duration::from_secs(self.config.status_poll_secs);

        // First readiness check at startup; the daily task covers the rest.
        run_daily_check(&self.pipeline, &self.registry, poll_period).await;

        let pipeline = Arc::clone(&self.pipeline);
        let registry = Arc::clone(&self.registry);
        self.registry.ensure_registered(
            DAILY_TASK,
            Duration::from_secs(self.config.daily_check_secs),
            move || {
                let pipeline = Arc::clone(&pipeline);
                let registry = Arc::clone(&registry);
                Box::pin(async move {
                    run_daily_check(&pipeline, &registry, poll_period).await;
                    ControlFlow::Continue(())
                }) as TaskFuture
            },
        );

        tokio::signal::ctrl_c().await?;
        info!("Shutdown signal received");
        self.registry.shutdown();
        Ok(())
    }
}

async fn run_daily_check(
    pipeline: &Arc<Pipeline>,
    registry: &Arc<TaskRegistry>,
    poll_period: Duration,
) {
    if pipeline.daily_tick().await {
        let pipeline = Arc::clone(pipeline);
        registry.ensure_registered(STATUS_POLL_TASK, poll_period, move || {
            let pipeline = Arc::clone(&pipeline);
            Box::pin(async move { pipeline.hourly_tick().await }) as TaskFuture
        });
    }
}
