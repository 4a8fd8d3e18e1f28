//! # Yearly Aggregates
//!
//! Normalizes per-company monthly financial records to a single target
//! currency, filters out invalid records, and aggregates the rest into
//! annual per-company totals and two derived reports.
//!
//! ## Pipeline
//!
//! - **Rate table**: direct-pair exchange rates, last entry wins on duplicates
//! - **Validation**: currency support, timestamp validity, historical-only, positive value
//! - **Conversion**: same-currency amounts are only rounded; missing rates drop the record
//! - **Aggregation**: annual totals, monthly highest company, designated-company total
//! - **Reports**: sink payloads, a `year,month,company` CSV table, a text total
//!
//! Data-quality defects never raise: offending records are counted and
//! dropped. Only caller bugs such as mismatched converter inputs return
//! [`PipelineError::ContractViolation`].
//!
//! ## Quick Start
//!
//! ```rust
//! use yearly_aggregates::{process, ExchangeRateEntry, PipelineConfig, RawMonthlyRecord};
//! use chrono::NaiveDate;
//!
//! let records = vec![
//!     RawMonthlyRecord::new("A", "2024-01-01", 5.0, "USD"),
//!     RawMonthlyRecord::new("A", "2024-01-02", 3.0, "SEK"),
//! ];
//! let rates = vec![ExchangeRateEntry::new("USD", "SEK", 10.0)];
//! let as_of = NaiveDate::from_ymd_opt(2025, 1, 1)
//!     .unwrap()
//!     .and_hms_opt(0, 0, 0)
//!     .unwrap();
//!
//! let output = process(&records, &rates, &PipelineConfig::default(), as_of).unwrap();
//! assert_eq!(output.annual[0].value.to_string(), "53.00");
//! ```

pub mod config;
pub mod pipeline;
pub mod rates;
pub mod report;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::*;
pub use pipeline::*;
pub use rates::*;
pub use report::*;
pub use traits::*;
pub use types::*;
