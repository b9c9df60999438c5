//! Named recurring tasks over tokio intervals. Registration is
//! "ensure present": re-registering a live task is a no-op, and a task can
//! end itself by returning `ControlFlow::Break` from a tick.

use std::collections::HashMap;
use std::future::Future;
use std::ops::ControlFlow;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::{debug, info};

#[derive(Default)]
pub struct TaskRegistry {
    tasks: Mutex<HashMap<String, JoinHandle<()>>>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while the named task is registered and still running.
    pub fn is_registered(&self, name: &str) -> bool {
        self.tasks
            .lock()
            .get(name)
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Register the named task unless it is already live. The first tick
    /// fires one full period after registration. The tick closure returns
    /// `ControlFlow::Break(())` to end the task from inside.
    pub fn ensure_registered<F, Fut>(&self, name: &str, period: Duration, tick: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ControlFlow<()>> + Send + 'static,
    {
        let mut tasks = self.tasks.lock();
        if let Some(handle) = tasks.get(name) {
            if !handle.is_finished() {
                debug!(task = %name, "Task already registered");
                return;
            }
        }

        info!(task = %name, period_secs = period.as_secs(), "Registering task");
        let task_name = name.to_string();
        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            loop {
                interval.tick().await;
                if tick().await.is_break() {
                    info!(task = %task_name, "Task ended itself");
                    break;
                }
            }
        });
        tasks.insert(name.to_string(), handle);
    }

    /// Abort and forget the named task. Returns false if it was not
    /// registered.
    pub fn deregister(&self, name: &str) -> bool {
        match self.tasks.lock().remove(name) {
            Some(handle) => {
                handle.abort();
                info!(task = %name, "Deregistered task");
                true
            }
            None => false,
        }
    }

    /// Abort everything. Used on shutdown.
    pub fn shutdown(&self) {
        let mut tasks = self.tasks.lock();
        for (name, handle) in tasks.drain() {
            handle.abort();
            debug!(task = %name, "Aborted task");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_task_ticks_until_break() {
        let registry = TaskRegistry::new();
        let counter = Arc::new(AtomicUsize::new(0));

        let ticks = Arc::clone(&counter);
        registry.ensure_registered("hourly", Duration::from_secs(60), move || {
            let ticks = Arc::clone(&ticks);
            async move {
                if ticks.fetch_add(1, Ordering::SeqCst) + 1 >= 3 {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            }
        });
        assert!(registry.is_registered("hourly"));

        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 3);
        assert!(!registry.is_registered("hourly"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reregistering_live_task_is_noop() {
        let registry = TaskRegistry::new();
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..2 {
            let ticks = Arc::clone(&counter);
            registry.ensure_registered("daily", Duration::from_secs(60), move || {
                let ticks = Arc::clone(&ticks);
                async move {
                    ticks.fetch_add(1, Ordering::SeqCst);
                    ControlFlow::Continue(())
                }
            });
        }

        tokio::time::sleep(Duration::from_secs(61)).await;
        // A duplicate registration would have doubled the tick count.
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        registry.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn test_deregister_stops_ticks() {
        let registry = TaskRegistry::new();
        let counter = Arc::new(AtomicUsize::new(0));

        let ticks = Arc::clone(&counter);
        registry.ensure_registered("hourly", Duration::from_secs(60), move || {
            let ticks = Arc::clone(&ticks);
            async move {
                ticks.fetch_add(1, Ordering::SeqCst);
                ControlFlow::Continue(())
            }
        });

        assert!(registry.deregister("hourly"));
        assert!(!registry.deregister("hourly"));

        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }
}
