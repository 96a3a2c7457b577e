//! Simulated rate movement for builds without a live provider.

use chrono::{DateTime, Utc};
use rand::Rng;
use std::collections::BTreeMap;

use crate::table::{RateSource, RateTable};

/// Maximum relative move per simulated refresh (±1%).
pub const DRIFT_BAND: f64 = 0.01;

/// Perturb every rate of `previous` by a uniform factor in
/// `[1 - DRIFT_BAND, 1 + DRIFT_BAND]`, then pin the numeraire back to 1.
pub fn simulate_drift<R: Rng + ?Sized>(
    previous: &RateTable,
    rng: &mut R,
    now: DateTime<Utc>,
) -> RateTable {
    let mut rates: BTreeMap<_, _> = previous
        .rates
        .iter()
        .map(|(currency, rate)| {
            let factor = rng.gen_range((1.0 - DRIFT_BAND)..=(1.0 + DRIFT_BAND));
            (currency.clone(), rate * factor)
        })
        .collect();

    rates.insert(previous.base.clone(), 1.0);

    RateTable {
        base: previous.base.clone(),
        rates,
        last_updated: now,
        source: RateSource::Simulated,
    }
}
