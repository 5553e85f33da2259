// Background maintenance: prune samples past retention, VACUUM on a schedule,
// and log ingestion stats. VACUUM runs on a cron expression (local time) or a fixed interval.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::ingest::IngestCounters;
use crate::sample_repo::SampleRepo;
use tracing::{info, instrument, warn};

/// Config for the maintenance worker.
#[derive(Debug, Clone)]
pub struct MaintenanceWorkerConfig {
    pub prune_interval_secs: u64,
    pub stats_log_interval_secs: u64,
    /// Optional cron expression for VACUUM (e.g. "0 0 3 * * *" = 03:00 daily). Uses local time.
    pub vacuum_schedule: Option<String>,
    /// Run VACUUM every N seconds when vacuum_schedule is not set.
    pub vacuum_interval_secs: u64,
}

/// Spawns the maintenance worker. Returns a join handle; the task ends when `shutdown_rx` fires.
pub fn spawn(
    repo: Arc<SampleRepo>,
    counters: Arc<IngestCounters>,
    config: MaintenanceWorkerConfig,
    shutdown_rx: tokio::sync::oneshot::Receiver<()>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        run(repo, counters, config, shutdown_rx).await;
    })
}

#[instrument(skip(repo, counters, shutdown_rx), fields(prune_interval_secs = config.prune_interval_secs))]
async fn run(
    repo: Arc<SampleRepo>,
    counters: Arc<IngestCounters>,
    config: MaintenanceWorkerConfig,
    mut shutdown_rx: tokio::sync::oneshot::Receiver<()>,
) {
    let mut prune_tick = tokio::time::interval(Duration::from_secs(config.prune_interval_secs));
    prune_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut stats_log_tick =
        tokio::time::interval(Duration::from_secs(config.stats_log_interval_secs));
    stats_log_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let (vacuum_tx, mut vacuum_rx) = tokio::sync::mpsc::channel::<()>(1);
    let scheduler = tokio::spawn(vacuum_scheduler(config.clone(), vacuum_tx));

    let mut samples_pruned_total: u64 = 0;

    loop {
        tokio::select! {
            _ = prune_tick.tick() => {
                match repo.prune_old_data().await {
                    Ok(n) => {
                        samples_pruned_total += n;
                        if n > 0 {
                            info!(samples_pruned = n, "pruned samples past retention");
                        }
                    }
                    Err(e) => warn!(error = %e, operation = "prune_old_data", "Failed to prune old data"),
                }
            }
            _ = stats_log_tick.tick() => {
                let (accepted, inserted, rejected) = counters.snapshot();
                info!(
                    samples_accepted_total = accepted,
                    samples_inserted_total = inserted,
                    samples_rejected_total = rejected,
                    samples_pruned_total,
                    "app stats"
                );
            }
            Some(()) = vacuum_rx.recv() => {
                if let Err(e) = repo.vacuum().await {
                    warn!(error = %e, "vacuum failed");
                } else {
                    info!("vacuum complete");
                }
            }
            _ = &mut shutdown_rx => {
                tracing::debug!("Maintenance worker shutting down");
                break;
            }
        }
    }
    scheduler.abort();
}

/// Sends a message on `tx` at each VACUUM time (cron or fixed interval). Uses local time for cron.
async fn vacuum_scheduler(config: MaintenanceWorkerConfig, tx: tokio::sync::mpsc::Sender<()>) {
    if let Some(ref cron_str) = config.vacuum_schedule {
        let Ok(schedule) = cron::Schedule::from_str(cron_str) else {
            warn!(cron = %cron_str, "invalid vacuum_schedule; VACUUM will not run");
            return;
        };
        loop {
            let now = chrono::Local::now();
            let next = schedule.after(&now).next();
            if let Some(next) = next {
                let delay = (next - now).to_std().unwrap_or(Duration::from_secs(1));
                tokio::time::sleep(delay).await;
                if tx.send(()).await.is_err() {
                    break;
                }
            } else {
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
        }
    } else {
        let interval = Duration::from_secs(config.vacuum_interval_secs);
        loop {
            tokio::time::sleep(interval).await;
            if tx.send(()).await.is_err() {
                break;
            }
        }
    }
}
