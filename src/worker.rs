// Background snapshot worker: collect on an interval, store, prune old rows.
// A fatal collection error only skips that tick.

use crate::collector;
use crate::engine::EngineConnector;
use crate::history_repo::HistoryRepo;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::time::{Duration, interval};

/// Collector, store and shutdown for the worker.
pub struct WorkerDeps<C: EngineConnector> {
    pub connector: C,
    pub history_repo: Arc<HistoryRepo>,
    pub counters: Arc<WorkerCounters>,
    pub shutdown_rx: tokio::sync::oneshot::Receiver<()>,
}

/// Worker timing config. Stats logging and pruning use real-time intervals.
pub struct WorkerConfig {
    pub interval_secs: u64,
    /// Overall bound on one collection; `None` waits for the engine.
    pub deadline: Option<Duration>,
    pub stats_log_interval_secs: u64,
    pub prune_interval_secs: u64,
}

/// Running totals, shared with whoever wants to report them.
#[derive(Debug, Default)]
pub struct WorkerCounters {
    pub snapshots_taken: AtomicU64,
    pub snapshots_failed: AtomicU64,
    pub snapshots_pruned: AtomicU64,
}

pub fn spawn<C: EngineConnector>(
    deps: WorkerDeps<C>,
    config: WorkerConfig,
) -> tokio::task::JoinHandle<()> {
    let WorkerDeps {
        connector,
        history_repo,
        counters,
        mut shutdown_rx,
    } = deps;
    let WorkerConfig {
        interval_secs,
        deadline,
        stats_log_interval_secs,
        prune_interval_secs,
    } = config;

    tokio::spawn(async move {
        let mut tick = interval(Duration::from_secs(interval_secs));
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut stats_log_tick = interval(Duration::from_secs(stats_log_interval_secs));
        stats_log_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut prune_tick = interval(Duration::from_secs(prune_interval_secs));
        prune_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    collect_and_store(&connector, &history_repo, &counters, deadline).await;
                }
                _ = &mut shutdown_rx => {
                    tracing::debug!("Worker shutting down");
                    break;
                }
                _ = stats_log_tick.tick() => {
                    tracing::info!(
                        snapshots_taken = counters.snapshots_taken.load(Ordering::Relaxed),
                        snapshots_failed = counters.snapshots_failed.load(Ordering::Relaxed),
                        snapshots_pruned = counters.snapshots_pruned.load(Ordering::Relaxed),
                        "collector stats"
                    );
                }
                _ = prune_tick.tick() => {
                    match history_repo.prune_old_data().await {
                        Ok(n) => {
                            tracing::debug!(operation = "prune_old_data", pruned = n, "Old snapshots pruned");
                            counters.snapshots_pruned.fetch_add(n, Ordering::Relaxed);
                        }
                        Err(e) => {
                            tracing::warn!(
                                error = %e,
                                operation = "prune_old_data",
                                "Failed to prune old snapshots"
                            );
                        }
                    }
                }
            }
        }
    })
}

async fn collect_and_store<C: EngineConnector>(
    connector: &C,
    history_repo: &HistoryRepo,
    counters: &WorkerCounters,
    deadline: Option<Duration>,
) {
    let snapshot = match collector::create_snapshot(connector, deadline).await {
        Ok(s) => s,
        Err(e) => {
            counters.snapshots_failed.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(error = %e, operation = "create_snapshot", "snapshot failed");
            return;
        }
    };
    counters.snapshots_taken.fetch_add(1, Ordering::Relaxed);

    match history_repo.save_snapshot(&snapshot).await {
        Ok(id) => tracing::debug!(
            operation = "save_snapshot",
            id,
            running = snapshot.running_container_count,
            stopped = snapshot.stopped_container_count,
            "Snapshot saved"
        ),
        Err(e) => tracing::warn!(error = %e, operation = "save_snapshot", "save_snapshot failed"),
    }
}
