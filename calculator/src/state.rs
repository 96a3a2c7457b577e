//! Calculator state machine.

use serde::{Deserialize, Serialize};
use tracing::debug;
use valuta_quota::ConversionQuota;

use crate::display::format_input_display;
use crate::key::{Key, Operator};

/// What a key press did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyOutcome {
    /// State changed (or the key was a no-op); nothing was evaluated.
    Updated,
    /// `=` completed a pending operation and counted one conversion.
    Evaluated(f64),
    /// `=` was refused by the quota; state is unchanged.
    QuotaExceeded,
}

/// Keypad calculator with deferred left-to-right evaluation.
///
/// `display` always matches `-?\d*\.?\d*` and is never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Calculator {
    display: String,
    stored_operand: Option<f64>,
    pending_operator: Option<Operator>,
    awaiting_fresh_operand: bool,
}

impl Default for Calculator {
    fn default() -> Self {
        Self {
            display: "0".to_string(),
            stored_operand: None,
            pending_operator: None,
            awaiting_fresh_operand: false,
        }
    }
}

impl Calculator {
    /// Create a calculator showing `0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw input buffer.
    pub fn display(&self) -> &str {
        &self.display
    }

    /// Buffer with thousands separators.
    pub fn formatted_display(&self) -> String {
        format_input_display(&self.display)
    }

    /// Numeric value of the buffer; unparseable input reads as 0.
    pub fn value(&self) -> f64 {
        parse_operand(&self.display)
    }

    pub fn stored_operand(&self) -> Option<f64> {
        self.stored_operand
    }

    pub fn pending_operator(&self) -> Option<Operator> {
        self.pending_operator
    }

    pub fn is_awaiting_operand(&self) -> bool {
        self.awaiting_fresh_operand
    }

    /// Apply one key press.
    pub fn press(&mut self, key: Key, quota: &mut dyn ConversionQuota) -> KeyOutcome {
        match key {
            Key::Digit(digit) => self.input_digit(digit),
            Key::Decimal => self.input_decimal(),
            Key::ToggleSign => self.toggle_sign(),
            Key::Operator(op) => self.input_operator(op),
            Key::Equals => return self.evaluate(quota),
            Key::Clear => *self = Self::default(),
            Key::Backspace => self.backspace(),
        }
        KeyOutcome::Updated
    }

    fn input_digit(&mut self, digit: u8) {
        let Some(ch) = char::from_digit(u32::from(digit), 10) else {
            return;
        };

        if self.awaiting_fresh_operand {
            self.display = ch.to_string();
            self.awaiting_fresh_operand = false;
        } else if self.display == "0" {
            self.display = ch.to_string();
        } else {
            self.display.push(ch);
        }
    }

    fn input_decimal(&mut self) {
        if self.awaiting_fresh_operand {
            self.display = "0.".to_string();
            self.awaiting_fresh_operand = false;
        } else if !self.display.contains('.') {
            self.display.push('.');
        }
    }

    fn toggle_sign(&mut self) {
        if let Some(rest) = self.display.strip_prefix('-') {
            self.display = rest.to_string();
            if self.display.is_empty() {
                self.display = "0".to_string();
            }
        } else if self.display != "0" {
            self.display.insert(0, '-');
        }
    }

    fn input_operator(&mut self, op: Operator) {
        let current = self.value();

        match (self.stored_operand, self.pending_operator) {
            (Some(stored), Some(pending)) if !self.awaiting_fresh_operand => {
                let result = pending.apply(stored, current);
                self.display = stringify(result);
                self.stored_operand = Some(result);
            }
            _ => self.stored_operand = Some(current),
        }

        self.pending_operator = Some(op);
        self.awaiting_fresh_operand = true;
    }

    fn evaluate(&mut self, quota: &mut dyn ConversionQuota) -> KeyOutcome {
        if !quota.can_convert() {
            return KeyOutcome::QuotaExceeded;
        }

        let (Some(stored), Some(pending)) = (self.stored_operand, self.pending_operator) else {
            return KeyOutcome::Updated;
        };

        let result = pending.apply(stored, self.value());
        self.display = stringify(result);
        self.stored_operand = None;
        self.pending_operator = None;
        self.awaiting_fresh_operand = true;
        quota.record_conversion();

        debug!(%stored, op = %pending, result, "Evaluated");
        KeyOutcome::Evaluated(result)
    }

    fn backspace(&mut self) {
        if self.awaiting_fresh_operand {
            return;
        }
        self.display.pop();
        if self.display.is_empty() {
            self.display = "0".to_string();
        }
    }
}

fn parse_operand(buffer: &str) -> f64 {
    buffer.parse::<f64>().unwrap_or(0.0)
}

/// Shortest round-tripping decimal form. Non-finite values and negative
/// zero render as `0`.
fn stringify(value: f64) -> String {
    if !value.is_finite() || value == 0.0 {
        return "0".to_string();
    }
    value.to_string()
}
