//! Cross-rate conversion and display formatting.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use valuta_common::{group_thousands, Currency};

use crate::table::RateTable;

/// Convert `amount` from one currency to another through the numeraire.
///
/// Missing currencies are treated as having rate 1, so an unknown code
/// behaves like the numeraire instead of failing. No rounding is applied.
pub fn convert(amount: f64, from: &Currency, to: &Currency, table: &RateTable) -> f64 {
    if from == to {
        return amount;
    }

    let rate_from = table.rate_or_identity(from);
    let rate_to = table.rate_or_identity(to);
    (amount / rate_from) * rate_to
}

/// Units of `to` for one unit of `from`.
pub fn cross_rate(from: &Currency, to: &Currency, table: &RateTable) -> f64 {
    convert(1.0, from, to, table)
}

/// Request to convert an amount between two currencies.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    /// Amount in `from` units; zero and negative amounts are allowed.
    pub amount: f64,
    pub from: Currency,
    pub to: Currency,
}

impl ConversionRequest {
    /// Create a new conversion request.
    pub fn new(amount: f64, from: Currency, to: Currency) -> Self {
        Self { amount, from, to }
    }

    /// Same request in the opposite direction, for the swap button.
    pub fn swapped(&self) -> Self {
        Self {
            amount: self.amount,
            from: self.to.clone(),
            to: self.from.clone(),
        }
    }

    /// Converted amount against `table`.
    pub fn evaluate(&self, table: &RateTable) -> f64 {
        convert(self.amount, &self.from, &self.to, table)
    }
}

/// Decimal places used to display `value` in `currency`.
///
/// An explicit override wins; otherwise zero-decimal currencies get 0,
/// crypto and metals get 6 below one unit and 4 above, everything else 2.
pub fn display_decimals(value: f64, currency: &Currency, decimal_override: Option<u32>) -> u32 {
    if let Some(places) = decimal_override {
        return places;
    }

    if currency.is_zero_decimal() {
        return 0;
    }

    match currency.category() {
        Some(category) if category.is_high_precision() => {
            if value.abs() < 1.0 {
                6
            } else {
                4
            }
        }
        _ => 2,
    }
}

/// Fixed-point, thousands-grouped number with exactly `places` decimals.
///
/// Rounds half away from zero on the shortest decimal form of `value`.
pub fn format_grouped(value: f64, places: u32) -> String {
    let fixed = match Decimal::from_f64(value) {
        Some(decimal) => {
            let rounded =
                decimal.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
            format!("{:.*}", places as usize, rounded)
        }
        None => format!("{:.*}", places as usize, value),
    };

    group_thousands(&fixed)
}

/// Render `value` with the currency's symbol, e.g. `€1,234.50`.
pub fn format_display(value: f64, currency: &Currency, decimal_override: Option<u32>) -> String {
    let places = display_decimals(value, currency, decimal_override);
    format!("{}{}", currency.symbol(), format_grouped(value, places))
}
