use clap::{Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use txpipe::application::partition::PartitionPolicy;
use txpipe::application::pipeline::{
    DEFAULT_WORKERS, FilterIndex, PipelineConfig, PipelineRunner, Strategy,
};
use txpipe::domain::money::Money;
use txpipe::domain::ports::TransactionSourceBox;
use txpipe::infrastructure::cache::ReadThroughCache;
use txpipe::infrastructure::generator::TransactionGenerator;
use txpipe::infrastructure::in_memory::InMemoryTransactionStore;
use txpipe::interfaces::csv::report_writer::ReportWriter;
use txpipe::interfaces::csv::transaction_reader::TransactionReader;
use txpipe::interfaces::csv::transaction_writer::TransactionWriter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Filter, aggregate and process the transactions of a CSV file
    Run(RunArgs),
    /// Write synthetic transactions to a CSV file
    Generate(GenerateArgs),
}

#[derive(clap::Args)]
struct RunArgs {
    /// Input transactions CSV file
    input: PathBuf,

    /// Customer whose transactions are processed. Empty selects all.
    #[arg(long, default_value = "")]
    customer: String,

    /// Product name prefix to keep
    #[arg(long, default_value = "")]
    prefix: String,

    /// Number of workers for the parallel strategies
    #[arg(long, default_value_t = DEFAULT_WORKERS)]
    workers: usize,

    #[arg(long, value_enum, default_value_t = StrategyArg::FanOut)]
    strategy: StrategyArg,

    /// Filter index for the sequential strategy
    #[arg(long, value_enum, default_value_t = IndexArg::Linear)]
    index: IndexArg,

    #[arg(long, value_enum, default_value_t = PartitionArg::RemainderSafe)]
    partition: PartitionArg,

    /// Serve repeated customer lookups from a read-through cache
    #[arg(long)]
    with_cache: bool,

    #[arg(long, value_enum, default_value_t = FormatArg::Csv)]
    format: FormatArg,
}

#[derive(clap::Args)]
struct GenerateArgs {
    /// Output CSV file
    output: PathBuf,

    /// Number of transactions to write
    #[arg(long, default_value_t = 1000)]
    count: usize,

    /// Number of distinct customers
    #[arg(long, default_value_t = 1)]
    customers: usize,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    Sequential,
    FanOut,
    Fused,
}

#[derive(Clone, Copy, ValueEnum)]
enum IndexArg {
    Linear,
    PrefixTree,
}

#[derive(Clone, Copy, ValueEnum)]
enum PartitionArg {
    RemainderSafe,
    EvenDivision,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Csv,
    Json,
}

impl RunArgs {
    fn config(&self) -> PipelineConfig {
        PipelineConfig::default()
            .with_prefix(self.prefix.clone())
            .with_workers(self.workers)
            .with_strategy(match self.strategy {
                StrategyArg::Sequential => Strategy::Sequential,
                StrategyArg::FanOut => Strategy::FanOut,
                StrategyArg::Fused => Strategy::Fused,
            })
            .with_index(match self.index {
                IndexArg::Linear => FilterIndex::Linear,
                IndexArg::PrefixTree => FilterIndex::PrefixTree,
            })
            .with_partition(match self.partition {
                PartitionArg::RemainderSafe => PartitionPolicy::RemainderSafe,
                PartitionArg::EvenDivision => PartitionPolicy::EvenDivision,
            })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("txpipe=info")),
        )
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Run(args) => run(args).await,
        Command::Generate(args) => generate(args),
    }
}

async fn run(args: RunArgs) -> Result<()> {
    let config = args.config();

    // Load the file into memory; bad rows are reported and skipped
    let store = InMemoryTransactionStore::new();
    let file = File::open(&args.input).into_diagnostic()?;
    for tx_result in TransactionReader::new(file).transactions() {
        match tx_result {
            Ok(tx) => store.insert(tx).await,
            Err(e) => warn!("Error reading transaction: {}", e),
        }
    }

    let source: TransactionSourceBox = if args.with_cache {
        Box::new(ReadThroughCache::new(store))
    } else {
        Box::new(store)
    };
    let runner = PipelineRunner::new(source);

    let report = runner.run(&args.customer, &config).await.into_diagnostic()?;
    let revenue = Money::from_f64(report.dataset_revenue).unwrap_or_default();
    info!(
        customer = report.customer_id.as_str(),
        dataset_size = report.dataset_size,
        retrieval_time = ?report.retrieval_time,
        pipeline_time = ?report.pipeline_time,
        "Total revenue: {}",
        revenue
    );

    let stdout = io::stdout();
    let mut writer = ReportWriter::new(stdout.lock());
    match args.format {
        FormatArg::Csv => writer.write_csv(&report.rows).into_diagnostic()?,
        FormatArg::Json => writer.write_json(&report.rows).into_diagnostic()?,
    }

    Ok(())
}

fn generate(args: GenerateArgs) -> Result<()> {
    let generator = match args.seed {
        Some(seed) => TransactionGenerator::seeded(seed),
        None => TransactionGenerator::from_entropy(),
    };
    let transactions = generator.with_customers(args.customers).generate(args.count);

    let file = File::create(&args.output).into_diagnostic()?;
    TransactionWriter::new(file)
        .write_transactions(&transactions)
        .into_diagnostic()?;
    Ok(())
}
