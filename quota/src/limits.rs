//! Free-tier limits.

use serde::{Deserialize, Serialize};

/// Limits applied to non-PRO users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeLimits {
    /// Calculator evaluations per calendar day.
    pub max_conversions_per_day: u32,
    /// Currencies in the selection list.
    pub max_currencies: usize,
    /// Rate refreshes per calendar day.
    pub max_refreshes_per_day: u32,
}

impl Default for FreeLimits {
    fn default() -> Self {
        Self {
            max_conversions_per_day: 5,
            max_currencies: 3,
            max_refreshes_per_day: 1,
        }
    }
}
