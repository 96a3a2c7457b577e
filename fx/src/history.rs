//! Historical chart series and summary statistics.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use valuta_common::format_day_label;

/// Chart time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ChartPeriod {
    #[serde(rename = "1D")]
    OneDay,
    #[serde(rename = "1W")]
    OneWeek,
    #[default]
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "3M")]
    ThreeMonths,
    #[serde(rename = "6M")]
    SixMonths,
    #[serde(rename = "1Y")]
    OneYear,
}

impl ChartPeriod {
    /// All periods in segmented-control order.
    pub const ALL: [ChartPeriod; 6] = [
        ChartPeriod::OneDay,
        ChartPeriod::OneWeek,
        ChartPeriod::OneMonth,
        ChartPeriod::ThreeMonths,
        ChartPeriod::SixMonths,
        ChartPeriod::OneYear,
    ];

    /// Days covered by the period.
    pub fn days(&self) -> u32 {
        match self {
            ChartPeriod::OneDay => 1,
            ChartPeriod::OneWeek => 7,
            ChartPeriod::OneMonth => 30,
            ChartPeriod::ThreeMonths => 90,
            ChartPeriod::SixMonths => 180,
            ChartPeriod::OneYear => 365,
        }
    }

    /// Days between sampled points.
    pub fn step(&self) -> u32 {
        match self {
            ChartPeriod::OneDay | ChartPeriod::OneWeek => 1,
            ChartPeriod::OneMonth => 2,
            ChartPeriod::ThreeMonths => 5,
            ChartPeriod::SixMonths => 10,
            ChartPeriod::OneYear => 20,
        }
    }

    /// Short label, e.g. `3M`.
    pub fn label(&self) -> &'static str {
        match self {
            ChartPeriod::OneDay => "1D",
            ChartPeriod::OneWeek => "1W",
            ChartPeriod::OneMonth => "1M",
            ChartPeriod::ThreeMonths => "3M",
            ChartPeriod::SixMonths => "6M",
            ChartPeriod::OneYear => "1Y",
        }
    }

    /// Parse a label; unknown labels fall back to the default period.
    pub fn from_label(label: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|p| p.label().eq_ignore_ascii_case(label.trim()))
            .unwrap_or_default()
    }

    /// Days to sample, oldest first: `today - days`, stepping by `step`,
    /// never past today.
    pub fn sample_dates(&self, today: NaiveDate) -> Vec<NaiveDate> {
        let step = self.step() as usize;
        (0..=self.days())
            .rev()
            .step_by(step)
            .map(|offset| today - Duration::days(i64::from(offset)))
            .collect()
    }
}

impl fmt::Display for ChartPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One sampled day of a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    /// Axis label, e.g. `Oct 7`.
    pub label: String,
    /// Units of the quote currency per one unit of the base.
    pub rate: f64,
}

impl ChartPoint {
    /// Create a point labelled from its date.
    pub fn new(date: NaiveDate, rate: f64) -> Self {
        Self {
            date,
            label: format_day_label(date),
            rate,
        }
    }
}

/// Summary shown under the chart.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartStats {
    pub high: f64,
    pub low: f64,
    pub average: f64,
    /// Last rate minus first rate.
    pub change_amount: f64,
    /// Change relative to the first rate, in percent.
    pub change_percent: f64,
}

impl ChartStats {
    /// Compute stats over a series. Empty series yield all zeros; fewer
    /// than two points yield zero change.
    pub fn from_points(points: &[ChartPoint]) -> Self {
        let (Some(first), Some(last)) = (points.first(), points.last()) else {
            return Self::default();
        };

        let high = points.iter().map(|p| p.rate).fold(f64::MIN, f64::max);
        let low = points.iter().map(|p| p.rate).fold(f64::MAX, f64::min);
        let average = points.iter().map(|p| p.rate).sum::<f64>() / points.len() as f64;

        let (change_amount, change_percent) = if points.len() < 2 {
            (0.0, 0.0)
        } else {
            let change = last.rate - first.rate;
            (change, change / first.rate * 100.0)
        };

        Self {
            high,
            low,
            average,
            change_amount,
            change_percent,
        }
    }

    /// Whether the series went up (or stayed flat).
    pub fn is_positive(&self) -> bool {
        self.change_percent >= 0.0
    }
}
