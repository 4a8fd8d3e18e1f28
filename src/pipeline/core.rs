//! Pipeline orchestration: the pure processing chain and the collaborator-driven run

use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;

use crate::config::PipelineConfig;
use crate::pipeline::{
    annual_totals, company_total, monthly_highest, CurrencyConverter, DropCounts, RecordValidator,
};
use crate::rates::RateTable;
use crate::report::{to_csv_rows, to_post_payloads, to_text, AnnualDataPayload, MonthlyHighestRow};
use crate::traits::*;
use crate::types::*;

/// Everything the core derives from one batch of inputs
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    pub records_in: usize,
    pub records_kept: usize,
    pub dropped: DropCounts,
    /// Cleaned records without a direct rate to the target currency
    pub missing_rate: usize,
    pub annual: Vec<AnnualAggregate>,
    pub monthly_highest: Vec<MonthlyHighest>,
    pub designated_total: BigDecimal,
}

impl PipelineOutput {
    pub fn payloads(&self) -> Vec<AnnualDataPayload> {
        to_post_payloads(&self.annual)
    }

    pub fn csv_rows(&self) -> Vec<MonthlyHighestRow> {
        to_csv_rows(&self.monthly_highest)
    }

    pub fn total_text(&self) -> String {
        to_text(&self.designated_total)
    }
}

/// Run validation, conversion and aggregation over in-memory inputs.
///
/// `as_of` is the snapshot instant for the historical-only rule; the
/// caller captures it once per run.
pub fn process(
    raw_records: &[RawMonthlyRecord],
    raw_rates: &[ExchangeRateEntry],
    config: &PipelineConfig,
    as_of: NaiveDateTime,
) -> PipelineResult<PipelineOutput> {
    log::info!("Processing data...");
    let rates = RateTable::build(raw_rates);
    let covered = rates.covered_currencies();

    let records: Vec<MonthlyRecord> = raw_records.iter().map(MonthlyRecord::from_raw).collect();
    let outcome = RecordValidator::new(as_of).filter(records, &covered);
    let records_kept = outcome.kept.len();

    let converted = CurrencyConverter::new(&config.target_currency, &rates)
        .convert_records(outcome.kept)?;
    let missing_rate = converted
        .iter()
        .filter(|r| r.converted_value.is_none())
        .count();
    if missing_rate > 0 {
        log::info!("Records without a direct rate removed ({})", missing_rate);
    }

    let annual = annual_totals(&converted, &config.target_currency);
    log::info!("Annual data aggregated ({} rows)", annual.len());

    Ok(PipelineOutput {
        records_in: raw_records.len(),
        records_kept,
        dropped: outcome.dropped,
        missing_rate,
        annual,
        monthly_highest: monthly_highest(&converted),
        designated_total: company_total(&converted, &config.designated_company),
    })
}

/// Outcome of a full run against the collaborators
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub output: PipelineOutput,
    pub posted: usize,
    /// First sink error; posting stopped there
    pub posting_failure: Option<String>,
}

/// Drives a run: fetch, process, post every aggregate, persist reports
pub struct YearlyDataPipeline<S: MonthlyDataSource, K: AnnualDataSink, R: ReportStore> {
    config: PipelineConfig,
    source: S,
    sink: K,
    reports: R,
}

impl<S: MonthlyDataSource, K: AnnualDataSink, R: ReportStore> YearlyDataPipeline<S, K, R> {
    pub fn new(config: PipelineConfig, source: S, sink: K, reports: R) -> Self {
        Self {
            config,
            source,
            sink,
            reports,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Execute one run against the snapshot instant `as_of`.
    ///
    /// A rejected post stops further posting but not report persistence.
    /// Fetch, contract and persistence errors abort the run.
    pub async fn run(&mut self, as_of: NaiveDateTime) -> PipelineResult<RunSummary> {
        log::info!("Fetching data...");
        let records = self.source.fetch_monthly_records().await?;
        let rates = self.source.fetch_exchange_rates().await?;
        log::info!(
            "Fetched {} monthly records and {} exchange rates",
            records.len(),
            rates.len()
        );

        let output = process(&records, &rates, &self.config, as_of)?;

        log::info!("Posting annual data...");
        let (posted, posting_failure) = self.post_all(&output.payloads()).await;
        match &posting_failure {
            None => log::info!("Annual data successfully posted ({} rows)", posted),
            Some(reason) => log::warn!(
                "Failed to post annual data after {} rows: {}",
                posted,
                reason
            ),
        }

        self.reports.save_monthly_highest(&output.csv_rows()).await?;
        self.reports.save_total(&output.total_text()).await?;
        log::info!("Run completed");

        Ok(RunSummary {
            output,
            posted,
            posting_failure,
        })
    }

    async fn post_all(&mut self, payloads: &[AnnualDataPayload]) -> (usize, Option<String>) {
        let mut posted = 0;
        for payload in payloads {
            if let Err(e) = self.sink.post_annual(payload).await {
                return (posted, Some(e.to_string()));
            }
            posted += 1;
        }
        (posted, None)
    }
}
