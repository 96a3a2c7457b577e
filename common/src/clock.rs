//! Wall-clock access and calendar-day keys.
//!
//! Everything that reads "now" goes through [`Clock`] so quota windows and
//! refresh timestamps can be driven deterministically in tests.

use chrono::{DateTime, Datelike, Duration, FixedOffset, Local, NaiveDate, Offset, TimeZone, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Source of the current local time.
pub trait Clock: Send + Sync {
    /// Current time in the device's local offset.
    fn now(&self) -> DateTime<FixedOffset>;

    /// Current instant in UTC.
    fn now_utc(&self) -> DateTime<Utc> {
        self.now().with_timezone(&Utc)
    }

    /// Local calendar day used for quota windows.
    fn today(&self) -> DayKey {
        DayKey::from_date(self.now().date_naive())
    }

    /// Express an instant in this clock's local offset.
    fn localize(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        instant.with_timezone(self.now().offset())
    }
}

/// Clock backed by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// Manually driven clock for tests and replays.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<FixedOffset>>,
}

impl ManualClock {
    /// Create a clock frozen at `now`.
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Create a clock at the given local wall time in UTC+0.
    pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Self {
        let offset = Utc.fix();
        let now = offset
            .with_ymd_and_hms(year, month, day, hour, minute, 0)
            .single()
            .unwrap_or_else(|| Utc::now().with_timezone(&offset));
        Self::new(now)
    }

    /// Jump to a new time.
    pub fn set(&self, now: DateTime<FixedOffset>) {
        *self.now.lock() = now;
    }

    /// Move the clock forward (or backward for negative durations).
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now = *now + by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<FixedOffset> {
        *self.now.lock()
    }
}

/// Calendar day in `YYYY-M-D` form (no zero padding).
///
/// Quota counters compare these keys for equality only; they are not a
/// rolling 24-hour window.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayKey(String);

impl DayKey {
    /// Key for a calendar date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self(format!("{}-{}-{}", date.year(), date.month(), date.day()))
    }

    /// Raw key string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Render a timestamp the way the rate header shows it, e.g. `Oct 17, 14:05`.
pub fn format_last_updated(at: &DateTime<FixedOffset>) -> String {
    at.format("%b %-d, %H:%M").to_string()
}

/// Short chart axis label, e.g. `Oct 7`.
pub fn format_day_label(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}
