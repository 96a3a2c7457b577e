//! Rate table keyed by currency code against the USD numeraire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use valuta_common::{seed_rates, Currency};

/// Where a table's rates came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateSource {
    /// Built-in rates shipped with the app.
    Seed,
    /// Fetched from the rate provider.
    Live,
    /// Locally perturbed copy of the previous table.
    Simulated,
}

/// Snapshot of rates: units of each currency per one unit of `base`.
///
/// Replaced wholesale on every refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateTable {
    /// Numeraire the rates are expressed against (USD).
    pub base: Currency,
    /// Rate per currency code.
    pub rates: BTreeMap<Currency, f64>,
    /// When the table was last refreshed successfully.
    pub last_updated: DateTime<Utc>,
    /// Origin of the rates.
    pub source: RateSource,
}

impl RateTable {
    /// Create a table against USD.
    pub fn new(
        rates: impl IntoIterator<Item = (Currency, f64)>,
        last_updated: DateTime<Utc>,
        source: RateSource,
    ) -> Self {
        Self {
            base: Currency::usd(),
            rates: rates.into_iter().collect(),
            last_updated,
            source,
        }
    }

    /// Table built from the catalog's seed rates.
    pub fn seed(now: DateTime<Utc>) -> Self {
        Self::new(seed_rates(), now, RateSource::Seed)
    }

    /// Rate for a currency, if present.
    pub fn rate(&self, currency: &Currency) -> Option<f64> {
        self.rates.get(currency).copied()
    }

    /// Rate for a currency, treating missing or unusable rates as 1.
    pub fn rate_or_identity(&self, currency: &Currency) -> f64 {
        match self.rate(currency) {
            Some(rate) if rate.is_finite() && rate > 0.0 => rate,
            _ => 1.0,
        }
    }

    /// Check if the table has a rate for a currency.
    pub fn contains(&self, currency: &Currency) -> bool {
        self.rates.contains_key(currency)
    }

    /// Currencies in the table, in code order.
    pub fn currencies(&self) -> impl Iterator<Item = &Currency> {
        self.rates.keys()
    }

    /// Number of currencies in the table.
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_table() {
        let table = RateTable::seed(Utc::now());

        assert_eq!(table.base, Currency::usd());
        assert_eq!(table.rate(&Currency::usd()), Some(1.0));
        assert_eq!(table.rate(&Currency::eur()), Some(0.92));
        assert_eq!(table.source, RateSource::Seed);
        assert!(!table.is_empty());
    }

    #[test]
    fn test_rate_or_identity() {
        let table = RateTable::new(
            [
                (Currency::usd(), 1.0),
                (Currency::eur(), 0.9),
                (Currency::new("BAD"), 0.0),
            ],
            Utc::now(),
            RateSource::Live,
        );

        assert_eq!(table.rate_or_identity(&Currency::eur()), 0.9);
        assert_eq!(table.rate_or_identity(&Currency::new("ZZZ")), 1.0);
        assert_eq!(table.rate_or_identity(&Currency::new("BAD")), 1.0);
    }

    #[test]
    fn test_table_json_shape() {
        let table = RateTable::new([(Currency::usd(), 1.0)], Utc::now(), RateSource::Live);
        let json = serde_json::to_value(&table).unwrap();

        assert_eq!(json["base"], "USD");
        assert_eq!(json["rates"]["USD"], 1.0);
        assert_eq!(json["source"], "live");
        assert!(json.get("lastUpdated").is_some());

        let back: RateTable = serde_json::from_value(json).unwrap();
        assert_eq!(back, table);
    }
}
