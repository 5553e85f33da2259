// Sample writer: the only path that mutates the sample store.
// HTTP ingestion queues validated samples on a channel; this task batches them into the repo.

use crate::models::ServiceSample;
use crate::sample_repo::SampleRepo;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use tokio::time::{Duration, interval};

/// Channel capacity for the sample writer (backpressure if the writer falls behind).
pub fn writer_channel_capacity(flush_rate: u64) -> usize {
    (flush_rate as usize * 2).max(32)
}

/// Running totals reported by the stats log.
#[derive(Debug, Default)]
pub struct IngestCounters {
    /// Samples that passed validation and were queued.
    pub accepted: AtomicU64,
    pub inserted: AtomicU64,
    /// Samples refused at validation or by the store.
    pub rejected: AtomicU64,
}

impl IngestCounters {
    pub fn snapshot(&self) -> (u64, u64, u64) {
        (
            self.accepted.load(Ordering::Relaxed),
            self.inserted.load(Ordering::Relaxed),
            self.rejected.load(Ordering::Relaxed),
        )
    }
}

/// Writer config: batching for the dedicated sample writer task.
pub struct SampleWriterConfig {
    pub flush_rate: u64,
    pub flush_interval_secs: u64,
}

/// Spawns the task that receives samples and flushes them to the store.
/// Flushes when buffer len >= flush_rate, every flush_interval_secs, and when the channel closes.
pub fn spawn_sample_writer(
    mut rx: mpsc::Receiver<ServiceSample>,
    repo: Arc<SampleRepo>,
    config: SampleWriterConfig,
    counters: Arc<IngestCounters>,
) -> tokio::task::JoinHandle<()> {
    let flush_interval = Duration::from_secs(config.flush_interval_secs);
    let buffer_cap = writer_channel_capacity(config.flush_rate);
    tokio::spawn(async move {
        let mut buffer: Vec<ServiceSample> = Vec::new();
        let mut flush_tick = interval(flush_interval);
        flush_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                result = rx.recv() => {
                    match result {
                        Some(sample) => {
                            buffer.push(sample);
                            shed_oldest(&mut buffer, buffer_cap, &counters);
                            if buffer.len() >= config.flush_rate as usize
                                && let Err(e) = flush_buffer(&repo, &mut buffer, &counters).await
                            {
                                tracing::warn!(error = %e, "sample writer: append_samples failed");
                            }
                        }
                        None => break,
                    }
                }
                _ = flush_tick.tick() => {
                    if let Err(e) = flush_buffer(&repo, &mut buffer, &counters).await {
                        tracing::warn!(error = %e, "sample writer: append_samples failed");
                    }
                }
            }
        }
        if let Err(e) = flush_buffer(&repo, &mut buffer, &counters).await {
            tracing::warn!(error = %e, "sample writer: final flush failed");
        }
        tracing::debug!("Sample writer shutting down");
    })
}

/// Keeps at most `cap` samples while the store is failing; the oldest go first
/// and count as rejected.
fn shed_oldest(buffer: &mut Vec<ServiceSample>, cap: usize, counters: &IngestCounters) {
    if buffer.len() <= cap {
        return;
    }
    let excess = buffer.len() - cap;
    buffer.drain(..excess);
    counters
        .rejected
        .fetch_add(excess as u64, Ordering::Relaxed);
    tracing::warn!(
        dropped = excess,
        buffered = cap,
        "sample writer: buffer full, dropping oldest samples"
    );
}

/// On store failure the buffer is kept and retried on the next flush.
async fn flush_buffer(
    repo: &SampleRepo,
    buffer: &mut Vec<ServiceSample>,
    counters: &IngestCounters,
) -> anyhow::Result<()> {
    if buffer.is_empty() {
        return Ok(());
    }
    let n = buffer.len();
    let outcome = repo.append_samples(buffer).await?;
    buffer.clear();

    counters
        .inserted
        .fetch_add(outcome.inserted as u64, Ordering::Relaxed);
    counters
        .rejected
        .fetch_add(outcome.rejected.len() as u64, Ordering::Relaxed);
    for e in &outcome.rejected {
        tracing::warn!(error = %e, operation = "append_samples", "sample rejected by store");
    }
    tracing::debug!(
        operation = "append_samples",
        samples_count = n,
        inserted = outcome.inserted,
        "Samples flushed"
    );
    Ok(())
}
