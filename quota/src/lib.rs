//! Valuta Usage Quotas
//!
//! Daily counters for conversions and refreshes, the free-tier limits,
//! and the gate that decides whether an action may proceed.

pub mod counters;
pub mod gate;
pub mod limits;

pub use counters::UsageCounters;
pub use gate::{ConversionQuota, UsageGate};
pub use limits::FreeLimits;
