use super::aggregate::{aggregate, total_revenue};
use super::filter::filter_by_prefix;
use super::parallel::{aggregate_parallel, filter_aggregate_fused, filter_parallel};
use super::partition::PartitionPolicy;
use super::prefix_tree::PrefixTree;
use super::process::process;
use crate::domain::ports::TransactionSourceBox;
use crate::domain::transaction::{ProcessedTransaction, Transaction};
use crate::error::{PipelineError, Result};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Fan-out width used when the caller does not pick one.
pub const DEFAULT_WORKERS: usize = 4;

/// How the filter and aggregate stages are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Single pass, no workers.
    Sequential,
    /// Parallel filter feeding a parallel aggregate over a channel.
    #[default]
    FanOut,
    /// Each worker filters and aggregates its own partition.
    Fused,
}

/// How the sequential filter locates matching records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterIndex {
    #[default]
    Linear,
    PrefixTree,
}

/// Caller-supplied knobs for one pipeline invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub prefix: String,
    pub num_workers: usize,
    pub partition: PartitionPolicy,
    pub strategy: Strategy,
    pub index: FilterIndex,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            num_workers: DEFAULT_WORKERS,
            partition: PartitionPolicy::default(),
            strategy: Strategy::default(),
            index: FilterIndex::default(),
        }
    }
}

impl PipelineConfig {
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_workers(mut self, num_workers: usize) -> Self {
        self.num_workers = num_workers;
        self
    }

    pub fn with_partition(mut self, partition: PartitionPolicy) -> Self {
        self.partition = partition;
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_index(mut self, index: FilterIndex) -> Self {
        self.index = index;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.strategy != Strategy::Sequential && self.num_workers == 0 {
            return Err(PipelineError::InvalidWorkerCount(self.num_workers));
        }
        if self.strategy != Strategy::Sequential && self.index == FilterIndex::PrefixTree {
            warn!(strategy = ?self.strategy, "prefix tree index only applies to the sequential strategy");
        }
        Ok(())
    }
}

/// Filter, aggregate and process on the calling thread.
pub fn run_sequential(
    transactions: &[Transaction],
    prefix: &str,
    index: FilterIndex,
) -> Vec<ProcessedTransaction> {
    let started = Instant::now();
    let filtered = match index {
        FilterIndex::Linear => filter_by_prefix(transactions, prefix),
        FilterIndex::PrefixTree => PrefixTree::build(transactions).query(prefix),
    };
    debug!(elapsed = ?started.elapsed(), matched = filtered.len(), "filtering done");

    let started = Instant::now();
    let aggregates = aggregate(&filtered);
    debug!(elapsed = ?started.elapsed(), categories = aggregates.len(), "aggregation done");

    let started = Instant::now();
    let rows = process(aggregates);
    debug!(elapsed = ?started.elapsed(), "processing done");
    rows
}

/// Parallel filter feeding a parallel aggregate, then processing.
pub async fn run_fan_out(
    transactions: &[Transaction],
    prefix: &str,
    num_workers: usize,
    policy: PartitionPolicy,
) -> Result<Vec<ProcessedTransaction>> {
    let started = Instant::now();
    let filtered = filter_parallel(transactions, prefix, num_workers, policy).await?;
    debug!(elapsed = ?started.elapsed(), "filtering done");

    let started = Instant::now();
    let aggregates = aggregate_parallel(filtered, num_workers).await?;
    debug!(elapsed = ?started.elapsed(), categories = aggregates.len(), "aggregation done");

    let started = Instant::now();
    let rows = process(aggregates);
    debug!(elapsed = ?started.elapsed(), "processing done");
    Ok(rows)
}

/// Per-worker filter-and-aggregate, merged once, then processing.
pub async fn run_fused(
    transactions: &[Transaction],
    prefix: &str,
    num_workers: usize,
    policy: PartitionPolicy,
) -> Result<Vec<ProcessedTransaction>> {
    let started = Instant::now();
    let aggregates = filter_aggregate_fused(transactions, prefix, num_workers, policy).await?;
    debug!(elapsed = ?started.elapsed(), categories = aggregates.len(), "filter-aggregation done");

    Ok(process(aggregates))
}

/// Runs `config` over an already materialized transaction sequence.
pub async fn run_pipeline(
    transactions: &[Transaction],
    config: &PipelineConfig,
) -> Result<Vec<ProcessedTransaction>> {
    config.validate()?;
    match config.strategy {
        Strategy::Sequential => Ok(run_sequential(transactions, &config.prefix, config.index)),
        Strategy::FanOut => {
            run_fan_out(transactions, &config.prefix, config.num_workers, config.partition).await
        }
        Strategy::Fused => {
            run_fused(transactions, &config.prefix, config.num_workers, config.partition).await
        }
    }
}

/// Outcome of one [`PipelineRunner::run`].
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub customer_id: String,
    /// Number of transactions retrieved for the customer.
    pub dataset_size: usize,
    /// Revenue over the whole retrieved dataset, before filtering.
    pub dataset_revenue: f64,
    pub rows: Vec<ProcessedTransaction>,
    pub retrieval_time: Duration,
    pub pipeline_time: Duration,
}

/// Retrieves a customer's transactions from a source and runs the pipeline
/// over them.
///
/// The runner holds no state between invocations besides the source itself.
pub struct PipelineRunner {
    source: TransactionSourceBox,
}

impl PipelineRunner {
    pub fn new(source: TransactionSourceBox) -> Self {
        Self { source }
    }

    pub async fn run(&self, customer_id: &str, config: &PipelineConfig) -> Result<PipelineReport> {
        config.validate()?;

        let started = Instant::now();
        let transactions = self.source.get_transactions(customer_id).await?;
        let retrieval_time = started.elapsed();
        info!(
            customer = customer_id,
            dataset_size = transactions.len(),
            elapsed = ?retrieval_time,
            "retrieved transactions"
        );

        let started = Instant::now();
        let rows = run_pipeline(&transactions, config).await?;
        let pipeline_time = started.elapsed();
        info!(
            customer = customer_id,
            strategy = ?config.strategy,
            rows = rows.len(),
            elapsed = ?pipeline_time,
            "pipeline finished"
        );

        Ok(PipelineReport {
            customer_id: customer_id.to_owned(),
            dataset_size: transactions.len(),
            dataset_revenue: total_revenue(&transactions),
            rows,
            retrieval_time,
            pipeline_time,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::money::Money;
    use crate::infrastructure::generator::TransactionGenerator;
    use crate::infrastructure::in_memory::InMemoryTransactionStore;
    use crate::test_support::abc_scenario;
    use std::collections::HashMap;

    fn keyed(rows: &[ProcessedTransaction]) -> HashMap<String, (Money, Money)> {
        rows.iter()
            .map(|r| {
                let sales = Money::from_f64(r.total_sales).unwrap();
                let avg = Money::from_f64(r.avg_quantity).unwrap();
                (r.category.clone(), (sales, avg))
            })
            .collect()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_every_strategy_agrees() {
        let txs = TransactionGenerator::seeded(21).generate(500);
        let expected = keyed(&run_sequential(&txs, "USB", FilterIndex::Linear));
        assert!(!expected.is_empty());

        let base = PipelineConfig::default().with_prefix("USB");
        let configs = [
            base.clone().with_strategy(Strategy::Sequential).with_index(FilterIndex::PrefixTree),
            base.clone().with_strategy(Strategy::FanOut),
            base.clone().with_strategy(Strategy::Fused),
            base.clone().with_strategy(Strategy::FanOut).with_workers(7),
        ];
        for config in configs {
            let rows = run_pipeline(&txs, &config).await.unwrap();
            assert_eq!(keyed(&rows), expected, "{config:?}");
        }
    }

    #[tokio::test]
    async fn test_abc_scenario_end_to_end() {
        let config = PipelineConfig::default().with_workers(2);
        let rows = run_pipeline(&abc_scenario(), &config).await.unwrap();

        let by_category: HashMap<_, _> = rows
            .iter()
            .map(|r| (r.category.as_str(), (r.total_sales, r.avg_quantity)))
            .collect();
        assert_eq!(by_category["Processed_A"], (30.0, 1.5));
        assert_eq!(by_category["Processed_B"], (70.0, 3.5));
        assert_eq!(by_category["Processed_C"], (50.0, 5.0));
    }

    #[tokio::test]
    async fn test_zero_workers_fails_before_running() {
        let config = PipelineConfig::default().with_workers(0);
        let result = run_pipeline(&abc_scenario(), &config).await;
        assert!(matches!(result, Err(PipelineError::InvalidWorkerCount(0))));

        // the sequential strategy has no workers to validate
        let config = config.with_strategy(Strategy::Sequential);
        assert_eq!(run_pipeline(&abc_scenario(), &config).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_even_division_loses_the_tail_remainder_safe_keeps_it() {
        // five records over two workers: the fifth (category C) has no chunk
        for strategy in [Strategy::FanOut, Strategy::Fused] {
            let base = PipelineConfig::default()
                .with_strategy(strategy)
                .with_workers(2);

            let even = run_pipeline(
                &abc_scenario(),
                &base.clone().with_partition(PartitionPolicy::EvenDivision),
            )
            .await
            .unwrap();
            let categories: HashMap<_, _> = even
                .iter()
                .map(|r| (r.category.as_str(), r.total_sales))
                .collect();
            assert_eq!(categories.len(), 2, "{strategy:?}");
            assert_eq!(categories["Processed_A"], 30.0);
            assert_eq!(categories["Processed_B"], 70.0);
            assert!(!categories.contains_key("Processed_C"));

            let safe = run_pipeline(
                &abc_scenario(),
                &base.with_partition(PartitionPolicy::RemainderSafe),
            )
            .await
            .unwrap();
            assert_eq!(safe.len(), 3, "{strategy:?}");
        }
    }

    #[tokio::test]
    async fn test_empty_dataset() {
        for strategy in [Strategy::Sequential, Strategy::FanOut, Strategy::Fused] {
            let config = PipelineConfig::default().with_strategy(strategy);
            assert!(run_pipeline(&[], &config).await.unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_runner_reports_dataset_and_rows() {
        let store = InMemoryTransactionStore::new();
        store.extend(abc_scenario()).await;
        let runner = PipelineRunner::new(Box::new(store));

        let report = runner
            .run("CUST1", &PipelineConfig::default())
            .await
            .unwrap();
        assert_eq!(report.customer_id, "CUST1");
        assert_eq!(report.dataset_size, 5);
        assert_eq!(report.dataset_revenue, 150.0);
        assert_eq!(report.rows.len(), 3);

        let missing = runner
            .run("NOBODY", &PipelineConfig::default())
            .await
            .unwrap();
        assert_eq!(missing.dataset_size, 0);
        assert!(missing.rows.is_empty());
    }
}
