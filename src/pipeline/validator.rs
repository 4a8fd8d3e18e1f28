//! Ordered inclusion rules applied to monthly records

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::types::{CleanedRecord, MonthlyRecord};

/// Validation rules, in the order they are applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ValidationRule {
    /// Currency must appear in at least one exchange-rate pair
    CurrencySupport,
    /// Timestamp must have parsed as `YYYY-MM-DD`
    TimestampValidity,
    /// Timestamp must lie strictly before the run snapshot
    HistoricalOnly,
    /// Value must be strictly positive
    PositiveValue,
}

impl ValidationRule {
    pub const ALL: [ValidationRule; 4] = [
        ValidationRule::CurrencySupport,
        ValidationRule::TimestampValidity,
        ValidationRule::HistoricalOnly,
        ValidationRule::PositiveValue,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ValidationRule::CurrencySupport => "currency_support",
            ValidationRule::TimestampValidity => "timestamp_validity",
            ValidationRule::HistoricalOnly => "historical_only",
            ValidationRule::PositiveValue => "positive_value",
        }
    }
}

impl fmt::Display for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Number of records removed by each rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropCounts {
    counts: BTreeMap<ValidationRule, usize>,
}

impl DropCounts {
    fn new() -> Self {
        Self {
            counts: ValidationRule::ALL.iter().map(|rule| (*rule, 0)).collect(),
        }
    }

    fn record(&mut self, rule: ValidationRule, dropped: usize) {
        *self.counts.entry(rule).or_insert(0) += dropped;
    }

    pub fn get(&self, rule: ValidationRule) -> usize {
        self.counts.get(&rule).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Counts keyed by rule name, in rule order
    pub fn iter(&self) -> impl Iterator<Item = (ValidationRule, usize)> + '_ {
        self.counts.iter().map(|(rule, count)| (*rule, *count))
    }
}

/// Records that survived validation plus what each rule removed
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationOutcome {
    pub kept: Vec<CleanedRecord>,
    pub dropped: DropCounts,
}

/// Applies the inclusion rules against a fixed snapshot instant.
///
/// The instant is captured once by the caller so every record in a run
/// is judged against the same "now".
#[derive(Debug, Clone)]
pub struct RecordValidator {
    as_of: NaiveDateTime,
}

impl RecordValidator {
    pub fn new(as_of: NaiveDateTime) -> Self {
        Self { as_of }
    }

    pub fn as_of(&self) -> NaiveDateTime {
        self.as_of
    }

    /// Run every rule in order; each rule only sees survivors of the previous one
    pub fn filter(
        &self,
        records: Vec<MonthlyRecord>,
        covered_currencies: &BTreeSet<String>,
    ) -> ValidationOutcome {
        let mut dropped = DropCounts::new();

        let supported = retain_counted(
            &mut dropped,
            ValidationRule::CurrencySupport,
            records,
            |r| covered_currencies.contains(&r.currency),
        );
        log::info!(
            "Unsupported currencies removed ({})",
            dropped.get(ValidationRule::CurrencySupport)
        );

        let total = supported.len();
        let dated: Vec<(NaiveDate, MonthlyRecord)> = supported
            .into_iter()
            .filter_map(|r| r.timestamp.map(|date| (date, r)))
            .collect();
        dropped.record(ValidationRule::TimestampValidity, total - dated.len());
        log::info!(
            "Invalid timestamps removed ({})",
            dropped.get(ValidationRule::TimestampValidity)
        );

        let historical = retain_counted(
            &mut dropped,
            ValidationRule::HistoricalOnly,
            dated,
            |(date, _)| self.is_historical(*date),
        );
        log::info!(
            "Non-historical records removed ({})",
            dropped.get(ValidationRule::HistoricalOnly)
        );

        let zero = BigDecimal::from(0);
        let positive = retain_counted(
            &mut dropped,
            ValidationRule::PositiveValue,
            historical,
            |(_, r)| r.value > zero,
        );
        log::info!(
            "Non-positive values removed ({})",
            dropped.get(ValidationRule::PositiveValue)
        );

        let kept = positive
            .into_iter()
            .map(|(date, r)| CleanedRecord {
                company: r.company,
                date,
                value: r.value,
                currency: r.currency,
            })
            .collect();

        ValidationOutcome { kept, dropped }
    }

    /// A date counts as historical when its midnight precedes the snapshot
    fn is_historical(&self, date: NaiveDate) -> bool {
        date.and_hms_opt(0, 0, 0)
            .is_some_and(|start| start < self.as_of)
    }
}

fn retain_counted<T>(
    dropped: &mut DropCounts,
    rule: ValidationRule,
    items: Vec<T>,
    keep: impl Fn(&T) -> bool,
) -> Vec<T> {
    let before = items.len();
    let kept: Vec<T> = items.into_iter().filter(|item| keep(item)).collect();
    dropped.record(rule, before - kept.len());
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RawMonthlyRecord;

    fn as_of() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn covered() -> BTreeSet<String> {
        ["USD", "SEK", "EUR"].iter().map(|c| c.to_string()).collect()
    }

    fn record(company: &str, timestamp: &str, value: f64, currency: &str) -> MonthlyRecord {
        MonthlyRecord::from_raw(&RawMonthlyRecord::new(company, timestamp, value, currency))
    }

    #[test]
    fn test_each_rule_drops_its_defect() {
        let records = vec![
            record("A", "2024-01-01", 10.0, "USD"),
            record("B", "2024-01-01", 10.0, "XXX"),
            record("C", "2024/01/01", 10.0, "SEK"),
            record("D", "2099-01-01", 10.0, "EUR"),
            record("E", "2024-02-01", 0.0, "EUR"),
            record("F", "2024-02-01", -4.0, "USD"),
        ];

        let outcome = RecordValidator::new(as_of()).filter(records, &covered());

        assert_eq!(outcome.kept.len(), 1);
        assert_eq!(outcome.kept[0].company, "A");
        assert_eq!(outcome.dropped.get(ValidationRule::CurrencySupport), 1);
        assert_eq!(outcome.dropped.get(ValidationRule::TimestampValidity), 1);
        assert_eq!(outcome.dropped.get(ValidationRule::HistoricalOnly), 1);
        assert_eq!(outcome.dropped.get(ValidationRule::PositiveValue), 2);
    }

    #[test]
    fn test_rules_apply_in_order() {
        // Unsupported currency and bad timestamp: counted under the first rule only
        let records = vec![record("A", "garbage", -1.0, "XXX")];
        let outcome = RecordValidator::new(as_of()).filter(records, &covered());

        assert!(outcome.kept.is_empty());
        assert_eq!(outcome.dropped.get(ValidationRule::CurrencySupport), 1);
        assert_eq!(outcome.dropped.get(ValidationRule::TimestampValidity), 0);
        assert_eq!(outcome.dropped.get(ValidationRule::PositiveValue), 0);
    }

    #[test]
    fn test_kept_plus_dropped_equals_input() {
        let records = vec![
            record("A", "2024-01-01", 1.0, "USD"),
            record("A", "2024-13-01", 1.0, "USD"),
            record("A", "2030-01-01", 1.0, "USD"),
            record("A", "2024-01-01", -1.0, "NOK"),
            record("B", "2023-05-31", 7.25, "SEK"),
        ];
        let input_len = records.len();
        let outcome = RecordValidator::new(as_of()).filter(records, &covered());

        assert_eq!(outcome.kept.len() + outcome.dropped.total(), input_len);
    }

    #[test]
    fn test_snapshot_day_is_not_historical() {
        let records = vec![
            record("A", "2025-06-14", 1.0, "USD"),
            record("A", "2025-06-15", 1.0, "USD"),
            record("A", "2025-06-16", 1.0, "USD"),
        ];
        let outcome = RecordValidator::new(as_of()).filter(records, &covered());
        assert_eq!(outcome.kept.len(), 2);

        let midnight = NaiveDate::from_ymd_opt(2025, 6, 15)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let records = vec![record("A", "2025-06-15", 1.0, "USD")];
        let outcome = RecordValidator::new(midnight).filter(records, &covered());
        assert!(outcome.kept.is_empty());
        assert_eq!(outcome.dropped.get(ValidationRule::HistoricalOnly), 1);
    }

    #[test]
    fn test_empty_input_reports_every_rule() {
        let outcome = RecordValidator::new(as_of()).filter(Vec::new(), &covered());
        assert!(outcome.kept.is_empty());
        let rules: Vec<ValidationRule> = outcome.dropped.iter().map(|(rule, _)| rule).collect();
        assert_eq!(rules, ValidationRule::ALL.to_vec());
        assert_eq!(outcome.dropped.total(), 0);
    }
}
