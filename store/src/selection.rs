//! Base currency and the ordered list of currencies shown side by side.

use serde::{Deserialize, Serialize};
use valuta_common::Currency;
use valuta_fx::{convert, RateTable};

/// Selected currencies and the base the list is converted from.
///
/// The base may be absent from the list (the initial state has USD as base
/// with EUR, GBP and GEL listed); setting a new base adds it to the front.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CurrencySelection {
    base_currency: Currency,
    selected_currencies: Vec<Currency>,
}

impl Default for CurrencySelection {
    fn default() -> Self {
        Self {
            base_currency: Currency::usd(),
            selected_currencies: vec![Currency::eur(), Currency::gbp(), Currency::new("GEL")],
        }
    }
}

impl CurrencySelection {
    /// Create a selection from a base and list.
    pub fn new(base: Currency, selected: Vec<Currency>) -> Self {
        let mut selection = Self {
            base_currency: base,
            selected_currencies: Vec::new(),
        };
        selection.set_all(selected);
        selection
    }

    pub fn base(&self) -> &Currency {
        &self.base_currency
    }

    pub fn currencies(&self) -> &[Currency] {
        &self.selected_currencies
    }

    pub fn len(&self) -> usize {
        self.selected_currencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected_currencies.is_empty()
    }

    pub fn contains(&self, currency: &Currency) -> bool {
        self.selected_currencies.contains(currency)
    }

    /// Make `currency` the base, inserting it at the front if not listed.
    pub fn set_base(&mut self, currency: Currency) {
        if !self.contains(&currency) {
            self.selected_currencies.insert(0, currency.clone());
        }
        self.base_currency = currency;
    }

    /// Append a currency. Returns false if it was already listed.
    ///
    /// Quota checks are the caller's job.
    pub fn add(&mut self, currency: Currency) -> bool {
        if self.contains(&currency) {
            return false;
        }
        self.selected_currencies.push(currency);
        true
    }

    /// Remove a currency. The base cannot be removed.
    pub fn remove(&mut self, currency: &Currency) -> bool {
        if currency == &self.base_currency {
            return false;
        }
        let before = self.selected_currencies.len();
        self.selected_currencies.retain(|c| c != currency);
        self.selected_currencies.len() != before
    }

    /// Move the entry at `from` to position `to` (clamped to the end).
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        if from >= self.selected_currencies.len() {
            return false;
        }
        let item = self.selected_currencies.remove(from);
        let to = to.min(self.selected_currencies.len());
        self.selected_currencies.insert(to, item);
        true
    }

    /// Replace the list, dropping duplicates but keeping first-seen order.
    pub fn set_all(&mut self, currencies: Vec<Currency>) {
        self.selected_currencies.clear();
        for currency in currencies {
            self.add(currency);
        }
    }

    /// `amount` of the base converted into every listed currency.
    pub fn converted_amounts(&self, amount: f64, table: &RateTable) -> Vec<(Currency, f64)> {
        self.selected_currencies
            .iter()
            .map(|c| (c.clone(), convert(amount, &self.base_currency, c, table)))
            .collect()
    }
}
