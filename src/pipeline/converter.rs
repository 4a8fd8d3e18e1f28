//! Conversion of record values into the target currency

use bigdecimal::BigDecimal;

use crate::rates::RateTable;
use crate::types::*;

/// Converts amounts to a single target currency using direct-pair rates only
#[derive(Debug, Clone)]
pub struct CurrencyConverter<'a> {
    target: &'a str,
    rates: &'a RateTable,
}

impl<'a> CurrencyConverter<'a> {
    pub fn new(target: &'a str, rates: &'a RateTable) -> Self {
        Self { target, rates }
    }

    pub fn target(&self) -> &str {
        self.target
    }

    /// Convert a single amount.
    ///
    /// Amounts already in the target currency are only rounded. Returns
    /// `None` when no `(currency, target)` rate exists.
    pub fn convert_one(&self, value: &BigDecimal, currency: &str) -> Option<BigDecimal> {
        if currency == self.target {
            return Some(round_money(value));
        }
        self.rates
            .lookup(currency, self.target)
            .map(|rate| round_money(&(value * rate)))
    }

    /// Convert parallel sequences of amounts and currency codes.
    ///
    /// One output per input, in the same order. Sequences of different
    /// lengths indicate a caller bug and abort with
    /// [`PipelineError::ContractViolation`].
    pub fn convert<S: AsRef<str>>(
        &self,
        values: &[BigDecimal],
        currencies: &[S],
    ) -> PipelineResult<Vec<Option<BigDecimal>>> {
        if values.len() != currencies.len() {
            return Err(PipelineError::ContractViolation(format!(
                "values and currencies must have the same length: {} != {}",
                values.len(),
                currencies.len()
            )));
        }

        log::info!("Converting {} amounts to {}", values.len(), self.target);
        let converted = values
            .iter()
            .zip(currencies)
            .map(|(value, currency)| self.convert_one(value, currency.as_ref()))
            .collect();
        log::info!("Currency conversion completed");

        Ok(converted)
    }

    /// Attach a converted value to every cleaned record
    pub fn convert_records(
        &self,
        records: Vec<CleanedRecord>,
    ) -> PipelineResult<Vec<ConvertedRecord>> {
        let values: Vec<BigDecimal> = records.iter().map(|r| r.value.clone()).collect();
        let currencies: Vec<&str> = records.iter().map(|r| r.currency.as_str()).collect();
        let converted = self.convert(&values, &currencies)?;

        Ok(records
            .into_iter()
            .zip(converted)
            .map(|(record, converted_value)| {
                if converted_value.is_none() {
                    log::debug!(
                        "No {}->{} rate for {} on {}",
                        record.currency,
                        self.target,
                        record.company,
                        record.date
                    );
                }
                ConvertedRecord {
                    record,
                    converted_value,
                }
            })
            .collect())
    }
}

/// Convert parallel sequences of amounts and currencies to `target`
pub fn convert<S: AsRef<str>>(
    values: &[BigDecimal],
    currencies: &[S],
    target: &str,
    rates: &RateTable,
) -> PipelineResult<Vec<Option<BigDecimal>>> {
    CurrencyConverter::new(target, rates).convert(values, currencies)
}
