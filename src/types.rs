//! Core types and data structures for the yearly aggregation pipeline

use bigdecimal::BigDecimal;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Textual date format accepted for record timestamps
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d";

/// Monthly record exactly as delivered by the data source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMonthlyRecord {
    /// Company the value belongs to
    pub company: String,
    /// Date text, expected as `YYYY-MM-DD` but not guaranteed
    pub timestamp: String,
    /// Reported value, any sign
    pub value: f64,
    /// Currency code of `value`
    pub currency: String,
}

impl RawMonthlyRecord {
    pub fn new(company: &str, timestamp: &str, value: f64, currency: &str) -> Self {
        Self {
            company: company.to_string(),
            timestamp: timestamp.to_string(),
            value,
            currency: currency.to_string(),
        }
    }
}

/// Monthly record with its timestamp parsed and value held as a decimal
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyRecord {
    pub company: String,
    /// `None` when the source text did not match [`TIMESTAMP_FORMAT`]
    pub timestamp: Option<NaiveDate>,
    pub value: BigDecimal,
    pub currency: String,
}

impl MonthlyRecord {
    /// Parse a raw record. Never fails: an unparsable timestamp becomes `None`.
    pub fn from_raw(raw: &RawMonthlyRecord) -> Self {
        Self {
            company: raw.company.clone(),
            timestamp: parse_timestamp(&raw.timestamp),
            value: decimal_from_f64(raw.value),
            currency: raw.currency.clone(),
        }
    }
}

impl From<RawMonthlyRecord> for MonthlyRecord {
    fn from(raw: RawMonthlyRecord) -> Self {
        Self::from_raw(&raw)
    }
}

/// A record that passed every validation rule
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedRecord {
    pub company: String,
    pub date: NaiveDate,
    pub value: BigDecimal,
    pub currency: String,
}

impl CleanedRecord {
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn month(&self) -> u32 {
        self.date.month()
    }
}

/// A cleaned record with its value expressed in the target currency
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertedRecord {
    pub record: CleanedRecord,
    /// `None` when no direct rate to the target currency exists
    pub converted_value: Option<BigDecimal>,
}

/// Exchange rate entry as delivered by the data source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRateEntry {
    pub from_currency: String,
    pub to_currency: String,
    /// 1 unit of `from_currency` equals `rate` units of `to_currency`
    pub rate: f64,
}

impl ExchangeRateEntry {
    pub fn new(from_currency: &str, to_currency: &str, rate: f64) -> Self {
        Self {
            from_currency: from_currency.to_string(),
            to_currency: to_currency.to_string(),
            rate,
        }
    }
}

/// Sum of converted values for one company over one calendar year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualAggregate {
    pub company: String,
    pub year: i32,
    pub value: BigDecimal,
    pub currency: String,
}

/// Company holding the highest converted value in a given month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyHighest {
    pub year: i32,
    pub month: u32,
    pub company: String,
}

/// Errors that can occur while running the pipeline
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Contract violation: {0}")]
    ContractViolation(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Data source error: {0}")]
    Source(String),
    #[error("Sink error: {0}")]
    Sink(String),
    #[error("Report error: {0}")]
    Report(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Parse a `YYYY-MM-DD` timestamp, returning `None` instead of an error
pub fn parse_timestamp(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, TIMESTAMP_FORMAT).ok()
}

/// Convert a JSON number to a decimal through its shortest round-trip text,
/// so `0.1` becomes exactly `0.1` rather than its binary expansion.
///
/// Non-finite input cannot come from JSON; it maps to zero and is later
/// removed by the positive-value rule.
pub fn decimal_from_f64(value: f64) -> BigDecimal {
    if !value.is_finite() {
        return BigDecimal::from(0);
    }
    BigDecimal::from_str(&value.to_string()).unwrap_or_else(|_| BigDecimal::from(0))
}

/// Round to two decimal places, half to even, always at scale 2
pub fn round_money(value: &BigDecimal) -> BigDecimal {
    value.round(2).with_scale(2)
}
