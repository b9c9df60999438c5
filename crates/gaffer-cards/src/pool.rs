//! Bounded worker pool.
//!
//! Jobs are enqueued up front on a buffered channel; a fixed set of workers
//! shares the receiver and sends one result per job. The coordinator drains
//! results and reports how many jobs failed. No cross-job ordering; each
//! job's atomicity comes from its own store transaction.

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tracing::error;

/// Default worker count.
pub const DEFAULT_WORKERS: usize = 5;

/// What the coordinator saw after all workers finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolReport {
    pub total: usize,
    pub failed: usize,
}

impl PoolReport {
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// Run `job_fn` over `jobs` with at most `workers` concurrent executions.
pub async fn run_pool<J, E, F, Fut>(workers: usize, jobs: Vec<J>, job_fn: F) -> PoolReport
where
    J: Send + 'static,
    E: Display + Send + 'static,
    F: Fn(J) -> Fut + Send + Sync + Clone + 'static,
    Fut: Future<Output = Result<(), E>> + Send + 'static,
{
    let total = jobs.len();
    if total == 0 {
        return PoolReport { total: 0, failed: 0 };
    }

    let (job_tx, job_rx) = mpsc::channel::<J>(total);
    let (result_tx, mut result_rx) = mpsc::channel::<Result<(), E>>(total);
    let job_rx = Arc::new(Mutex::new(job_rx));

    let mut handles = Vec::with_capacity(workers.max(1));
    for _ in 0..workers.max(1) {
        let job_rx = Arc::clone(&job_rx);
        let result_tx = result_tx.clone();
        let job_fn = job_fn.clone();
        handles.push(tokio::spawn(async move {
            loop {
                let job = {
                    let mut rx = job_rx.lock().await;
                    rx.recv().await
                };
                let Some(job) = job else {
                    break;
                };
                let outcome = job_fn(job).await;
                if result_tx.send(outcome).await.is_err() {
                    break;
                }
            }
        }));
    }
    drop(result_tx);

    for job in jobs {
        // Capacity equals the job count, so this never blocks.
        let _ = job_tx.send(job).await;
    }
    drop(job_tx);

    for handle in handles {
        let _ = handle.await;
    }

    let mut failed = 0;
    while let Some(outcome) = result_rx.recv().await {
        if let Err(err) = outcome {
            error!(error = %err, "Card-generation job failed");
            failed += 1;
        }
    }

    PoolReport { total, failed }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_pool_runs_every_job() {
        let counter = Arc::new(AtomicUsize::new(0));
        let jobs: Vec<usize> = (0..20).collect();

        let seen = Arc::clone(&counter);
        let report = run_pool(5, jobs, move |_job| {
            let seen = Arc::clone(&seen);
            async move {
                seen.fetch_add(1, Ordering::SeqCst);
                Ok::<(), String>(())
            }
        })
        .await;

        assert_eq!(report.total, 20);
        assert_eq!(report.failed, 0);
        assert_eq!(counter.load(Ordering::SeqCst), 20);
    }

    #[tokio::test]
    async fn test_failures_are_counted_not_fatal() {
        let jobs: Vec<usize> = (0..10).collect();

        let report = run_pool(3, jobs, |job| async move {
            if job % 2 == 0 {
                Err(format!("job {job} broke"))
            } else {
                Ok(())
            }
        })
        .await;

        assert_eq!(report.total, 10);
        assert_eq!(report.failed, 5);
        assert!(!report.all_succeeded());
    }

    #[tokio::test]
    async fn test_empty_job_list_is_clean() {
        let report = run_pool(5, Vec::<usize>::new(), |_job| async move {
            Ok::<(), String>(())
        })
        .await;

        assert_eq!(report, PoolReport { total: 0, failed: 0 });
    }
}
