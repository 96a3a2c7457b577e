//! Free/PRO usage gate.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};
use valuta_common::Clock;

use crate::counters::UsageCounters;
use crate::limits::FreeLimits;

/// Seam between the calculator and whatever tracks conversion usage.
pub trait ConversionQuota {
    /// Whether one more conversion is allowed right now.
    fn can_convert(&self) -> bool;

    /// Count one completed conversion.
    fn record_conversion(&mut self);
}

/// Decides whether gated actions may proceed and counts the ones that do.
///
/// Checks never mutate; only the `record_*` calls change the counters.
pub struct UsageGate {
    counters: UsageCounters,
    limits: FreeLimits,
    clock: Arc<dyn Clock>,
}

impl UsageGate {
    /// Create a gate over persisted counters.
    pub fn new(counters: UsageCounters, limits: FreeLimits, clock: Arc<dyn Clock>) -> Self {
        Self {
            counters,
            limits,
            clock,
        }
    }

    /// Gate with fresh counters and default free limits.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self::new(UsageCounters::default(), FreeLimits::default(), clock)
    }

    /// Whether the user has PRO.
    pub fn is_pro(&self) -> bool {
        self.counters.is_pro
    }

    /// Set the subscription flag.
    pub fn set_pro(&mut self, is_pro: bool) {
        self.counters.is_pro = is_pro;
    }

    /// Whether a currency may be added to a list of `current_count`.
    pub fn can_add_currency(&self, current_count: usize) -> bool {
        self.is_pro() || current_count < self.limits.max_currencies
    }

    /// Whether a rate refresh is allowed right now.
    pub fn can_refresh(&self) -> bool {
        if self.is_pro() {
            return true;
        }
        let used = self.counters.refreshes_on(&self.clock.today());
        let allowed = used < self.limits.max_refreshes_per_day;
        if !allowed {
            warn!(used, limit = self.limits.max_refreshes_per_day, "Refresh limit reached");
        }
        allowed
    }

    /// Count one successful refresh.
    pub fn record_refresh(&mut self) {
        let today = self.clock.today();
        self.counters.bump_refresh(today);
        debug!(count = self.counters.refresh_count, "Refresh recorded");
    }

    /// Conversions left today; `None` means unlimited.
    pub fn remaining_conversions(&self) -> Option<u32> {
        if self.is_pro() {
            return None;
        }
        let used = self.counters.conversions_on(&self.clock.today());
        Some(self.limits.max_conversions_per_day.saturating_sub(used))
    }

    /// Current counters, for persistence.
    pub fn counters(&self) -> &UsageCounters {
        &self.counters
    }

    /// Replace the counters, e.g. after loading persisted state.
    pub fn set_counters(&mut self, counters: UsageCounters) {
        self.counters = counters;
    }

    /// Limits in effect for free users.
    pub fn limits(&self) -> &FreeLimits {
        &self.limits
    }
}

impl ConversionQuota for UsageGate {
    fn can_convert(&self) -> bool {
        if self.is_pro() {
            return true;
        }
        let used = self.counters.conversions_on(&self.clock.today());
        let allowed = used < self.limits.max_conversions_per_day;
        if !allowed {
            warn!(used, limit = self.limits.max_conversions_per_day, "Conversion limit reached");
        }
        allowed
    }

    fn record_conversion(&mut self) {
        let today = self.clock.today();
        self.counters.bump_conversion(today);
        debug!(count = self.counters.conversion_count, "Conversion recorded");
    }
}

impl fmt::Debug for UsageGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UsageGate")
            .field("counters", &self.counters)
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use proptest::prelude::*;
    use valuta_common::ManualClock;

    fn setup() -> (UsageGate, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::at(2026, 10, 17, 9, 30));
        (UsageGate::with_clock(clock.clone()), clock)
    }

    #[test]
    fn test_five_conversions_per_day() {
        let (mut gate, clock) = setup();

        for _ in 0..5 {
            assert!(gate.can_convert());
            gate.record_conversion();
        }
        assert!(!gate.can_convert());
        assert_eq!(gate.remaining_conversions(), Some(0));

        clock.advance(Duration::days(1));
        assert!(gate.can_convert());
        assert_eq!(gate.remaining_conversions(), Some(5));

        gate.record_conversion();
        assert_eq!(gate.counters().conversion_count, 1);
    }

    #[test]
    fn test_window_is_calendar_day() {
        let clock = Arc::new(ManualClock::at(2026, 10, 17, 23, 59));
        let mut gate = UsageGate::with_clock(clock.clone());
        for _ in 0..5 {
            gate.record_conversion();
        }
        assert!(!gate.can_convert());

        clock.advance(Duration::minutes(2));
        assert!(gate.can_convert());
    }

    #[test]
    fn test_add_currency_limit() {
        let (mut gate, _) = setup();

        assert!(gate.can_add_currency(2));
        assert!(!gate.can_add_currency(3));

        gate.set_pro(true);
        assert!(gate.can_add_currency(2));
        assert!(gate.can_add_currency(3));
    }

    #[test]
    fn test_one_refresh_per_day() {
        let (mut gate, clock) = setup();

        assert!(gate.can_refresh());
        gate.record_refresh();
        assert!(!gate.can_refresh());

        clock.advance(Duration::days(1));
        assert!(gate.can_refresh());
    }

    #[test]
    fn test_pro_is_unlimited() {
        let (mut gate, _) = setup();
        gate.set_pro(true);

        for _ in 0..20 {
            gate.record_conversion();
            gate.record_refresh();
        }

        assert!(gate.can_convert());
        assert!(gate.can_refresh());
        assert_eq!(gate.remaining_conversions(), None);
    }

    #[test]
    fn test_checks_do_not_mutate() {
        let (gate, _) = setup();
        let before = gate.counters().clone();

        gate.can_convert();
        gate.can_refresh();
        gate.can_add_currency(1);

        assert_eq!(gate.counters(), &before);
    }

    proptest! {
        #[test]
        fn prop_remaining_never_exceeds_limit(n in 0u32..20) {
            let (mut gate, _) = setup();
            for _ in 0..n {
                gate.record_conversion();
            }

            let remaining = gate.remaining_conversions().unwrap_or(u32::MAX);
            prop_assert_eq!(remaining, 5u32.saturating_sub(n));
            prop_assert_eq!(gate.can_convert(), n < 5);
        }
    }
}
