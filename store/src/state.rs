//! The persisted state record.

use serde::{Deserialize, Serialize};
use tracing::warn;
use valuta_fx::RateTable;
use valuta_quota::UsageCounters;

use crate::selection::CurrencySelection;
use crate::settings::Settings;

/// Key the state record is stored under.
pub const STATE_KEY: &str = "currency-store";

/// Amount shown in the multi-currency list before the user enters one.
pub const DEFAULT_AMOUNT: f64 = 100.0;

/// Everything that survives a restart, stored as one JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedState {
    #[serde(flatten)]
    pub selection: CurrencySelection,
    /// Last rate table; `None` until the first save.
    pub rates: Option<RateTable>,
    pub current_amount: f64,
    #[serde(flatten)]
    pub settings: Settings,
    #[serde(flatten)]
    pub usage: UsageCounters,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            selection: CurrencySelection::default(),
            rates: None,
            current_amount: DEFAULT_AMOUNT,
            settings: Settings::default(),
            usage: UsageCounters::default(),
        }
    }
}

impl PersistedState {
    /// Serialize to the stored JSON form.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parse a stored blob, falling back to defaults if it is unreadable.
    pub fn from_json_or_default(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(state) => state,
            Err(e) => {
                warn!(error = %e, "Stored state unreadable, using defaults");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use valuta_common::Currency;

    #[test]
    fn test_json_shape_is_flat() {
        let mut state = PersistedState::default();
        state.settings.toggle_bold_text();
        state.usage.is_pro = true;

        let json: serde_json::Value = serde_json::from_str(&state.to_json().unwrap()).unwrap();

        assert_eq!(json["baseCurrency"], "USD");
        assert_eq!(json["selectedCurrencies"][2], "GEL");
        assert_eq!(json["currentAmount"], 100.0);
        assert_eq!(json["boldText"], true);
        assert_eq!(json["isPro"], true);
        assert_eq!(json["conversionCount"], 0);
        assert!(json["rates"].is_null());
    }

    #[test]
    fn test_roundtrip_with_rates() {
        let mut state = PersistedState::default();
        state.rates = Some(RateTable::seed(Utc::now()));
        state.selection.set_base(Currency::jpy());
        state.current_amount = 42.5;

        let restored = PersistedState::from_json_or_default(&state.to_json().unwrap());

        assert_eq!(restored, state);
    }

    #[test]
    fn test_partial_blob_fills_defaults() {
        let restored = PersistedState::from_json_or_default(r#"{"baseCurrency":"EUR","isPro":true}"#);

        assert_eq!(restored.selection.base(), &Currency::eur());
        assert!(restored.usage.is_pro);
        assert_eq!(restored.current_amount, DEFAULT_AMOUNT);
        assert_eq!(restored.selection.len(), 3);
    }

    #[test]
    fn test_unreadable_blob_falls_back() {
        let restored = PersistedState::from_json_or_default("{not json");
        assert_eq!(restored, PersistedState::default());
    }
}
