//! Fan-out/fan-in variants of the filter and aggregate stages.
//!
//! Workers are tokio tasks spawned into a `JoinSet` for the duration of a
//! single call; the `JoinSet` is the completion barrier. Results travel over
//! bounded `mpsc` channels whose capacity equals the worker count, so a worker
//! never blocks on its single delivery.

use super::aggregate::{Merger, aggregate, aggregate_by_category};
use super::filter::filter_by_prefix;
use super::partition::{PartitionPolicy, partition};
use crate::domain::transaction::{AggregatedTransaction, Transaction};
use crate::error::{PipelineError, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinSet;
use tracing::{debug, trace};

/// Receiving end of a stream of transaction chunks.
pub type ChunkReceiver = mpsc::Receiver<Vec<Transaction>>;

/// Category-keyed rollups as produced by the fan-in merge.
pub type CategoryMap = HashMap<String, AggregatedTransaction>;

fn closed_channel(stage: &str, worker: usize) -> PipelineError {
    PipelineError::WorkerFailed(format!("{stage} worker {worker}: result channel closed"))
}

/// Waits for every worker in `workers`, surfacing the first failure.
async fn join_all(workers: &mut JoinSet<Result<()>>) -> Result<()> {
    while let Some(joined) = workers.join_next().await {
        joined??;
    }
    Ok(())
}

/// Filters `transactions` by `prefix` with `num_workers` concurrent workers.
///
/// Each worker filters one partition and delivers its matches exactly once.
/// The call returns after every worker has delivered; the returned channel is
/// already closed for sending, so draining it terminates.
pub async fn filter_parallel(
    transactions: &[Transaction],
    prefix: &str,
    num_workers: usize,
    policy: PartitionPolicy,
) -> Result<ChunkReceiver> {
    let chunks = partition(transactions, num_workers, policy)?;
    let (results, receiver) = mpsc::channel(num_workers);

    let mut workers = JoinSet::new();
    for (id, chunk) in chunks.into_iter().enumerate() {
        let results = results.clone();
        let prefix = prefix.to_owned();
        workers.spawn(async move {
            let matched = filter_by_prefix(&chunk, &prefix);
            debug!(
                worker = id,
                scanned = chunk.len(),
                matched = matched.len(),
                "filter worker finished"
            );
            results
                .send(matched)
                .await
                .map_err(|_| closed_channel("filter", id))
        });
    }
    drop(results);

    join_all(&mut workers).await?;
    Ok(receiver)
}

/// [`filter_parallel`] drained into a single vector.
///
/// Chunks are concatenated in completion order, so only the multiset of
/// matches is deterministic.
pub async fn filter_parallel_collect(
    transactions: &[Transaction],
    prefix: &str,
    num_workers: usize,
    policy: PartitionPolicy,
) -> Result<Vec<Transaction>> {
    let mut receiver = filter_parallel(transactions, prefix, num_workers, policy).await?;
    let mut matched = Vec::new();
    while let Some(chunk) = receiver.recv().await {
        matched.extend(chunk);
    }
    Ok(matched)
}

/// Wraps pre-computed chunks in a closed channel ready for
/// [`aggregate_parallel`].
pub fn chunk_channel(chunks: Vec<Vec<Transaction>>) -> Result<ChunkReceiver> {
    let (sender, receiver) = mpsc::channel(chunks.len().max(1));
    for chunk in chunks {
        sender
            .try_send(chunk)
            .map_err(|e| PipelineError::WorkerFailed(format!("chunk channel: {e}")))?;
    }
    Ok(receiver)
}

/// Aggregates the chunks arriving on `chunks` with `num_workers` workers and
/// merges their partial rollups.
///
/// Workers share the input channel and take whichever chunk is next, so a
/// fast worker naturally picks up more of them. Each worker sends the partials
/// it accumulated exactly once, after the input channel is exhausted. A single
/// merge loop owns the resulting map and stops once every worker has either
/// delivered or gone away.
pub async fn aggregate_parallel(chunks: ChunkReceiver, num_workers: usize) -> Result<CategoryMap> {
    if num_workers == 0 {
        return Err(PipelineError::InvalidWorkerCount(num_workers));
    }

    let chunks = Arc::new(Mutex::new(chunks));
    let (partials, mut fan_in) = mpsc::channel::<Vec<AggregatedTransaction>>(num_workers);

    let mut workers = JoinSet::new();
    for id in 0..num_workers {
        let chunks = Arc::clone(&chunks);
        let partials = partials.clone();
        workers.spawn(async move {
            let mut accumulated = Vec::new();
            let mut taken = 0usize;
            loop {
                // The async guard is held across `recv`, so one idle worker
                // waits on the channel while the rest queue on the lock.
                let next = chunks.lock().await.recv().await;
                let Some(chunk) = next else { break };
                taken += 1;
                accumulated.extend(aggregate(&chunk));
            }
            debug!(
                worker = id,
                chunks = taken,
                partials = accumulated.len(),
                "aggregate worker drained input"
            );
            partials
                .send(accumulated)
                .await
                .map_err(|_| closed_channel("aggregate", id))
        });
    }
    drop(partials);

    let mut merger = Merger::new();
    let mut delivered = 0usize;
    while let Some(batch) = fan_in.recv().await {
        trace!(partials = batch.len(), "merging batch");
        merger.absorb(&batch);
        delivered += 1;
    }

    join_all(&mut workers).await?;
    if delivered != num_workers {
        return Err(PipelineError::WorkerFailed(format!(
            "expected {num_workers} partial batches, merged {delivered}"
        )));
    }

    Ok(merger.finish())
}

/// Filters and aggregates each partition inside the same worker, then merges
/// the per-worker rollups once every worker has finished.
pub async fn filter_aggregate_fused(
    transactions: &[Transaction],
    prefix: &str,
    num_workers: usize,
    policy: PartitionPolicy,
) -> Result<CategoryMap> {
    let chunks = partition(transactions, num_workers, policy)?;

    let mut workers = JoinSet::new();
    for (id, chunk) in chunks.into_iter().enumerate() {
        let prefix = prefix.to_owned();
        workers.spawn(async move {
            let rollups = aggregate_by_category(&filter_by_prefix(&chunk, &prefix));
            debug!(worker = id, categories = rollups.len(), "fused worker finished");
            rollups
        });
    }

    let mut merger = Merger::new();
    while let Some(joined) = workers.join_next().await {
        merger.absorb(joined?.values());
    }
    Ok(merger.finish())
}
