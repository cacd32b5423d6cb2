use crate::domain::transaction::Transaction;
use crate::error::{PipelineError, Result};
use std::ops::Range;
use tracing::warn;

/// How input records are divided among workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PartitionPolicy {
    /// Every chunk is `len / workers` records long, the last one included.
    ///
    /// The trailing `len % workers` records land in no chunk and are dropped,
    /// which some benchmarks rely on. Prefer [`PartitionPolicy::RemainderSafe`]
    /// unless that truncation is wanted.
    EvenDivision,
    /// Same chunking, but the last chunk runs to the end of the input so that
    /// no record is dropped.
    #[default]
    RemainderSafe,
}

impl PartitionPolicy {
    /// Index ranges of the `num_workers` contiguous chunks over `len` records.
    pub fn bounds(self, len: usize, num_workers: usize) -> Result<Vec<Range<usize>>> {
        if num_workers == 0 {
            return Err(PipelineError::InvalidWorkerCount(num_workers));
        }

        let part_size = len / num_workers;
        let mut bounds: Vec<Range<usize>> = (0..num_workers)
            .map(|i| i * part_size..(i + 1) * part_size)
            .collect();

        match self {
            PartitionPolicy::EvenDivision => {
                let dropped = len - part_size * num_workers;
                if dropped > 0 {
                    warn!(
                        len,
                        num_workers,
                        "Even-division partitioning dropped {} trailing records",
                        dropped
                    );
                }
            }
            PartitionPolicy::RemainderSafe => {
                if let Some(last) = bounds.last_mut() {
                    last.end = len;
                }
            }
        }

        Ok(bounds)
    }
}

/// Splits `transactions` into `num_workers` contiguous chunks.
///
/// Fails fast with [`PipelineError::InvalidWorkerCount`] when `num_workers` is
/// zero. With more workers than records the excess chunks are empty.
pub fn partition(
    transactions: &[Transaction],
    num_workers: usize,
    policy: PartitionPolicy,
) -> Result<Vec<Vec<Transaction>>> {
    let bounds = policy.bounds(transactions.len(), num_workers)?;
    Ok(bounds
        .into_iter()
        .map(|range| transactions[range].to_vec())
        .collect())
}
