//! Direct-pair exchange rate lookup

use bigdecimal::BigDecimal;
use std::collections::{BTreeMap, BTreeSet};

use crate::types::{decimal_from_f64, ExchangeRateEntry};

/// Ordered `(from_currency, to_currency)` key
pub type CurrencyPair = (String, String);

/// Exchange rates keyed by ordered currency pair.
///
/// Rates are directional: a `(USD, SEK)` entry says nothing about
/// `(SEK, USD)`, and no rate is ever derived by chaining two pairs.
/// When the same pair appears more than once, the last entry wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateTable {
    rates: BTreeMap<CurrencyPair, BigDecimal>,
}

impl RateTable {
    /// Build a table from a flat list of entries
    pub fn build(entries: &[ExchangeRateEntry]) -> Self {
        let mut table = Self::default();
        for entry in entries {
            table.insert(
                &entry.from_currency,
                &entry.to_currency,
                decimal_from_f64(entry.rate),
            );
        }
        table
    }

    /// Insert or overwrite the rate for a pair
    pub fn insert(&mut self, from: &str, to: &str, rate: BigDecimal) {
        if let Some(previous) = self
            .rates
            .insert((from.to_string(), to.to_string()), rate)
        {
            log::debug!("Rate {}->{} replaced (was {})", from, to, previous);
        }
    }

    /// Rate for an exact `(from, to)` match
    pub fn lookup(&self, from: &str, to: &str) -> Option<&BigDecimal> {
        self.rates.get(&(from.to_string(), to.to_string()))
    }

    /// Every currency appearing on either side of any pair
    pub fn covered_currencies(&self) -> BTreeSet<String> {
        self.rates
            .keys()
            .flat_map(|(from, to)| [from.clone(), to.clone()])
            .collect()
    }

    /// Iterate over all pairs in sorted order
    pub fn pairs(&self) -> impl Iterator<Item = (&CurrencyPair, &BigDecimal)> {
        self.rates.iter()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}
