//! Display and app preferences.

use serde::{Deserialize, Serialize};

/// Color scheme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    #[default]
    System,
}

/// How rates are kept current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateMode {
    #[default]
    Auto,
    Manual,
}

/// User preferences, persisted with the rest of the state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub theme_mode: ThemeMode,
    /// Fixed decimal places for amounts; `None` picks per currency.
    pub decimal_digits: Option<u32>,
    pub bold_text: bool,
    pub use_system_size: bool,
    /// Suggest the device-region currency first in pickers.
    pub location_suggestions: bool,
    pub inapp_currency: bool,
    pub appeal_sounds: bool,
    pub update_mode: UpdateMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme_mode: ThemeMode::System,
            decimal_digits: None,
            bold_text: false,
            use_system_size: true,
            location_suggestions: true,
            inapp_currency: true,
            appeal_sounds: true,
            update_mode: UpdateMode::Auto,
        }
    }
}

impl Settings {
    pub fn set_theme_mode(&mut self, mode: ThemeMode) {
        self.theme_mode = mode;
    }

    pub fn set_decimal_digits(&mut self, digits: Option<u32>) {
        self.decimal_digits = digits;
    }

    pub fn toggle_bold_text(&mut self) {
        self.bold_text = !self.bold_text;
    }

    pub fn toggle_system_size(&mut self) {
        self.use_system_size = !self.use_system_size;
    }

    pub fn toggle_location_suggestions(&mut self) {
        self.location_suggestions = !self.location_suggestions;
    }

    pub fn toggle_inapp_currency(&mut self) {
        self.inapp_currency = !self.inapp_currency;
    }

    pub fn toggle_appeal_sounds(&mut self) {
        self.appeal_sounds = !self.appeal_sounds;
    }

    pub fn set_update_mode(&mut self, mode: UpdateMode) {
        self.update_mode = mode;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.theme_mode, ThemeMode::System);
        assert_eq!(settings.decimal_digits, None);
        assert!(settings.use_system_size);
        assert!(!settings.bold_text);
        assert_eq!(settings.update_mode, UpdateMode::Auto);
    }

    #[test]
    fn test_toggles() {
        let mut settings = Settings::default();

        settings.toggle_bold_text();
        settings.toggle_appeal_sounds();
        settings.set_decimal_digits(Some(3));
        settings.set_theme_mode(ThemeMode::Dark);

        assert!(settings.bold_text);
        assert!(!settings.appeal_sounds);
        assert_eq!(settings.decimal_digits, Some(3));

        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(json["themeMode"], "dark");
        assert_eq!(json["decimalDigits"], 3);
        assert_eq!(json["updateMode"], "auto");
    }
}
