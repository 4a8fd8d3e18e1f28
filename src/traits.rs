//! Traits for the external collaborators of a pipeline run
//!
//! Fetching raw data, posting aggregates and persisting report artifacts
//! happen behind these traits so the core stays pure and any transport
//! (HTTP, files, in-memory) can be plugged in.

use async_trait::async_trait;

use crate::report::{AnnualDataPayload, MonthlyHighestRow};
use crate::types::*;

/// Source of raw monthly records and exchange rates
#[async_trait]
pub trait MonthlyDataSource: Send + Sync {
    /// Fetch every raw monthly record
    async fn fetch_monthly_records(&self) -> PipelineResult<Vec<RawMonthlyRecord>>;

    /// Fetch the flat exchange-rate table
    async fn fetch_exchange_rates(&self) -> PipelineResult<Vec<ExchangeRateEntry>>;
}

/// Receiver of annual aggregates, one call per row.
///
/// Posting is append-only; calling twice with the same payload may store
/// it twice.
#[async_trait]
pub trait AnnualDataSink: Send + Sync {
    /// Post one aggregate row
    async fn post_annual(&mut self, payload: &AnnualDataPayload) -> PipelineResult<()>;
}

/// Durable storage for the report artifacts
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Persist the monthly-highest table
    async fn save_monthly_highest(&mut self, rows: &[MonthlyHighestRow]) -> PipelineResult<()>;

    /// Persist the designated-company total, already rendered as text
    async fn save_total(&mut self, total: &str) -> PipelineResult<()>;
}
