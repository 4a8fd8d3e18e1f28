//! yearly-data CLI - run the aggregation pipeline over local JSON inputs
//!
//! ## Example Usage
//!
//! ```bash
//! yearly-data \
//!     --monthly-data monthly-data.json \
//!     --exchange-rates exchange-rates.json \
//!     --annual-out outputs/annual-data.jsonl
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::process;
use yearly_aggregates::utils::{FileReportStore, JsonFileSource, JsonLinesSink};
use yearly_aggregates::{PipelineConfig, PipelineResult, RunSummary, YearlyDataPipeline};

/// Normalize monthly company records to one currency and aggregate them per year
#[derive(Parser)]
#[command(name = "yearly-data")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Annual per-company aggregation of monthly financial records", long_about = None)]
struct Cli {
    /// JSON array of monthly records
    #[arg(long, value_name = "FILE")]
    monthly_data: PathBuf,

    /// JSON array of exchange rates
    #[arg(long, value_name = "FILE")]
    exchange_rates: PathBuf,

    /// File receiving one JSON line per annual aggregate
    #[arg(long, value_name = "FILE", default_value = "outputs/annual-data.jsonl")]
    annual_out: PathBuf,

    /// Configuration file path (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for the report artifacts
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Currency all values are converted into
    #[arg(long)]
    target_currency: Option<String>,

    /// Company whose cumulative total is reported
    #[arg(long)]
    company: Option<String>,
}

fn load_config(cli: &Cli) -> PipelineResult<PipelineConfig> {
    let mut config = match &cli.config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    };
    config.apply_env_overrides()?;

    if let Some(dir) = &cli.output_dir {
        config.output.data_dir = dir.clone();
    }
    if let Some(currency) = &cli.target_currency {
        config.target_currency = currency.clone();
    }
    if let Some(company) = &cli.company {
        config.designated_company = company.clone();
    }
    config.validate()?;
    Ok(config)
}

async fn run(cli: Cli) -> PipelineResult<RunSummary> {
    let config = load_config(&cli)?;
    if let Some(parent) = cli.annual_out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let source = JsonFileSource::new(cli.monthly_data, cli.exchange_rates);
    let sink = JsonLinesSink::new(cli.annual_out);
    let reports = FileReportStore::new(config.output.clone());

    // One snapshot for the whole run
    let as_of = chrono::Local::now().naive_local();
    let mut pipeline = YearlyDataPipeline::new(config, source, sink, reports);
    pipeline.run(as_of).await
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(summary) => {
            for (rule, count) in summary.output.dropped.iter() {
                log::info!("Dropped by {}: {}", rule, count);
            }
            log::info!(
                "Kept {} of {} records, posted {} annual rows",
                summary.output.records_kept,
                summary.output.records_in,
                summary.posted
            );
            if summary.posting_failure.is_some() {
                process::exit(2);
            }
        }
        Err(e) => {
            log::error!("{}", e);
            process::exit(1);
        }
    }
}
