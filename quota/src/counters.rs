//! Persisted usage counters.

use serde::{Deserialize, Serialize};
use valuta_common::DayKey;

/// Per-day usage counts plus the subscription flag.
///
/// A count only means something on the day stored next to it; a stale date
/// reads as zero until the next increment resets it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UsageCounters {
    pub conversion_count: u32,
    /// Day of the last counted conversion; `None` if never.
    pub conversion_date: Option<DayKey>,
    pub refresh_count: u32,
    /// Day of the last counted refresh; `None` if never.
    pub refresh_date: Option<DayKey>,
    pub is_pro: bool,
}

impl UsageCounters {
    /// Conversions counted on `today`.
    pub fn conversions_on(&self, today: &DayKey) -> u32 {
        count_on(self.conversion_count, self.conversion_date.as_ref(), today)
    }

    /// Refreshes counted on `today`.
    pub fn refreshes_on(&self, today: &DayKey) -> u32 {
        count_on(self.refresh_count, self.refresh_date.as_ref(), today)
    }

    pub(crate) fn bump_conversion(&mut self, today: DayKey) {
        bump(&mut self.conversion_count, &mut self.conversion_date, today);
    }

    pub(crate) fn bump_refresh(&mut self, today: DayKey) {
        bump(&mut self.refresh_count, &mut self.refresh_date, today);
    }
}

fn count_on(count: u32, date: Option<&DayKey>, today: &DayKey) -> u32 {
    match date {
        Some(date) if date == today => count,
        _ => 0,
    }
}

fn bump(count: &mut u32, date: &mut Option<DayKey>, today: DayKey) {
    if date.as_ref() == Some(&today) {
        *count = count.saturating_add(1);
    } else {
        *count = 1;
        *date = Some(today);
    }
}
