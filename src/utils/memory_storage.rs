//! In-memory collaborators for testing

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::report::{AnnualDataPayload, MonthlyHighestRow};
use crate::traits::*;
use crate::types::*;

fn poisoned(variant: fn(String) -> PipelineError, what: &str) -> PipelineError {
    variant(format!("{} lock poisoned", what))
}

/// Data source serving fixed records and rates
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    records: Vec<RawMonthlyRecord>,
    rates: Vec<ExchangeRateEntry>,
}

impl MemorySource {
    pub fn new(records: Vec<RawMonthlyRecord>, rates: Vec<ExchangeRateEntry>) -> Self {
        Self { records, rates }
    }
}

#[async_trait]
impl MonthlyDataSource for MemorySource {
    async fn fetch_monthly_records(&self) -> PipelineResult<Vec<RawMonthlyRecord>> {
        Ok(self.records.clone())
    }

    async fn fetch_exchange_rates(&self) -> PipelineResult<Vec<ExchangeRateEntry>> {
        Ok(self.rates.clone())
    }
}

/// Sink collecting posted payloads.
///
/// Clones share the same buffer, so a test can keep one handle while the
/// pipeline owns another.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    posted: Arc<RwLock<Vec<AnnualDataPayload>>>,
    /// Reject every post once this many have been accepted
    accept_limit: Option<usize>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that rejects posts after accepting `limit` of them
    pub fn failing_after(limit: usize) -> Self {
        Self {
            posted: Arc::default(),
            accept_limit: Some(limit),
        }
    }

    pub fn posted(&self) -> Vec<AnnualDataPayload> {
        self.posted
            .read()
            .map(|posted| posted.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl AnnualDataSink for MemorySink {
    async fn post_annual(&mut self, payload: &AnnualDataPayload) -> PipelineResult<()> {
        let mut posted = self.posted.write().map_err(|_| poisoned(PipelineError::Sink, "sink"))?;
        if self.accept_limit.is_some_and(|limit| posted.len() >= limit) {
            return Err(PipelineError::Sink(format!(
                "rejected post for {} {}",
                payload.company, payload.year
            )));
        }
        posted.push(payload.clone());
        Ok(())
    }
}

/// Report store keeping artifacts in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryReportStore {
    monthly_highest: Arc<RwLock<Option<Vec<MonthlyHighestRow>>>>,
    total: Arc<RwLock<Option<String>>>,
}

impl MemoryReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn monthly_highest(&self) -> Option<Vec<MonthlyHighestRow>> {
        self.monthly_highest
            .read()
            .ok()
            .and_then(|rows| rows.clone())
    }

    pub fn total(&self) -> Option<String> {
        self.total.read().ok().and_then(|total| total.clone())
    }
}

#[async_trait]
impl ReportStore for MemoryReportStore {
    async fn save_monthly_highest(&mut self, rows: &[MonthlyHighestRow]) -> PipelineResult<()> {
        *self
            .monthly_highest
            .write()
            .map_err(|_| poisoned(PipelineError::Report, "report store"))? = Some(rows.to_vec());
        Ok(())
    }

    async fn save_total(&mut self, total: &str) -> PipelineResult<()> {
        *self.total.write().map_err(|_| poisoned(PipelineError::Report, "report store"))? = Some(total.to_string());
        Ok(())
    }
}
