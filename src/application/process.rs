use crate::domain::aggregate::AggregateSet;
use crate::domain::transaction::ProcessedTransaction;

/// Maps every rollup to a report row, one row per rollup, in iteration order.
///
/// Accepts either the list produced by sequential aggregation or the map
/// produced by the parallel merge.
pub fn process(aggregates: impl Into<AggregateSet>) -> Vec<ProcessedTransaction> {
    let aggregates = aggregates.into();
    aggregates.iter().map(ProcessedTransaction::from).collect()
}
