//! File-backed collaborators used by the command-line binary

use async_trait::async_trait;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::OutputConfig;
use crate::report::{write_csv, AnnualDataPayload, MonthlyHighestRow};
use crate::traits::*;
use crate::types::*;

/// Reads records and rates from two JSON array files
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    monthly_data: PathBuf,
    exchange_rates: PathBuf,
}

impl JsonFileSource {
    pub fn new(monthly_data: impl Into<PathBuf>, exchange_rates: impl Into<PathBuf>) -> Self {
        Self {
            monthly_data: monthly_data.into(),
            exchange_rates: exchange_rates.into(),
        }
    }

    fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> PipelineResult<T> {
        let text = fs::read_to_string(path).map_err(|e| {
            PipelineError::Source(format!("cannot read {}: {}", path.display(), e))
        })?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl MonthlyDataSource for JsonFileSource {
    async fn fetch_monthly_records(&self) -> PipelineResult<Vec<RawMonthlyRecord>> {
        Self::read_json(&self.monthly_data)
    }

    async fn fetch_exchange_rates(&self) -> PipelineResult<Vec<ExchangeRateEntry>> {
        Self::read_json(&self.exchange_rates)
    }
}

/// Appends each posted payload as one JSON object per line
#[derive(Debug, Clone)]
pub struct JsonLinesSink {
    path: PathBuf,
}

impl JsonLinesSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl AnnualDataSink for JsonLinesSink {
    async fn post_annual(&mut self, payload: &AnnualDataPayload) -> PipelineResult<()> {
        let line = serde_json::to_string(payload)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| PipelineError::Sink(format!("{}: {}", self.path.display(), e)))?;
        writeln!(file, "{}", line)
            .map_err(|e| PipelineError::Sink(format!("{}: {}", self.path.display(), e)))?;
        Ok(())
    }
}

/// Writes the CSV table and the total text file under the output directory
#[derive(Debug, Clone)]
pub struct FileReportStore {
    output: OutputConfig,
}

impl FileReportStore {
    pub fn new(output: OutputConfig) -> Self {
        Self { output }
    }

    fn ensure_dir(&self) -> PipelineResult<()> {
        fs::create_dir_all(&self.output.data_dir)?;
        Ok(())
    }
}

#[async_trait]
impl ReportStore for FileReportStore {
    async fn save_monthly_highest(&mut self, rows: &[MonthlyHighestRow]) -> PipelineResult<()> {
        self.ensure_dir()?;
        let path = self.output.monthly_highest_path();
        let file = File::create(&path)?;
        write_csv(rows, BufWriter::new(file))?;
        log::info!("Highest value company per month saved in {}", path.display());
        Ok(())
    }

    async fn save_total(&mut self, total: &str) -> PipelineResult<()> {
        self.ensure_dir()?;
        let path = self.output.total_path();
        fs::write(&path, total)?;
        log::info!("Designated company total saved in {}", path.display());
        Ok(())
    }
}
