//! Keypad keys and arithmetic operators.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Binary operator on the keypad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    /// Apply `lhs op rhs`. Division by zero yields 0.
    pub fn apply(&self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Operator::Add => lhs + rhs,
            Operator::Subtract => lhs - rhs,
            Operator::Multiply => lhs * rhs,
            Operator::Divide => {
                if rhs != 0.0 {
                    lhs / rhs
                } else {
                    0.0
                }
            }
        }
    }

    /// Keypad glyph.
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "×",
            Operator::Divide => "÷",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A keypad press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Digit 0-9.
    Digit(u8),
    Decimal,
    ToggleSign,
    Operator(Operator),
    Equals,
    Clear,
    Backspace,
}

/// Label that does not name a keypad key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown keypad label: {label:?}")]
pub struct KeyParseError {
    pub label: String,
}

impl Key {
    /// Parse a keypad label such as `"7"`, `"÷"` or `"backspace"`.
    pub fn from_label(label: &str) -> Result<Self, KeyParseError> {
        let key = match label {
            "C" | "AC" => Key::Clear,
            "+/-" | "±" => Key::ToggleSign,
            "backspace" | "⌫" => Key::Backspace,
            "÷" | "/" => Key::Operator(Operator::Divide),
            "×" | "*" => Key::Operator(Operator::Multiply),
            "-" | "−" => Key::Operator(Operator::Subtract),
            "+" => Key::Operator(Operator::Add),
            "=" => Key::Equals,
            "." => Key::Decimal,
            _ => {
                let mut chars = label.chars();
                match (chars.next().and_then(|c| c.to_digit(10)), chars.next()) {
                    (Some(digit), None) => Key::Digit(digit as u8),
                    _ => {
                        return Err(KeyParseError {
                            label: label.to_string(),
                        })
                    }
                }
            }
        };
        Ok(key)
    }
}

impl FromStr for Key {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Key::from_label(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply() {
        assert_eq!(Operator::Add.apply(2.0, 3.0), 5.0);
        assert_eq!(Operator::Subtract.apply(2.0, 3.0), -1.0);
        assert_eq!(Operator::Multiply.apply(2.0, 3.0), 6.0);
        assert_eq!(Operator::Divide.apply(3.0, 2.0), 1.5);
        assert_eq!(Operator::Divide.apply(5.0, 0.0), 0.0);
    }

    #[test]
    fn test_from_label() {
        assert_eq!(Key::from_label("7"), Ok(Key::Digit(7)));
        assert_eq!(Key::from_label("0"), Ok(Key::Digit(0)));
        assert_eq!(Key::from_label("C"), Ok(Key::Clear));
        assert_eq!(Key::from_label("+/-"), Ok(Key::ToggleSign));
        assert_eq!(Key::from_label("backspace"), Ok(Key::Backspace));
        assert_eq!(Key::from_label("÷"), Ok(Key::Operator(Operator::Divide)));
        assert_eq!(Key::from_label("×"), Ok(Key::Operator(Operator::Multiply)));
        assert_eq!(Key::from_label("-"), Ok(Key::Operator(Operator::Subtract)));
        assert_eq!(Key::from_label("+"), Ok(Key::Operator(Operator::Add)));
        assert_eq!(Key::from_label("="), Ok(Key::Equals));
        assert_eq!(Key::from_label("."), Ok(Key::Decimal));
        assert_eq!("9".parse::<Key>(), Ok(Key::Digit(9)));
    }

    #[test]
    fn test_from_label_rejects_unknown() {
        let err = Key::from_label("12").unwrap_err();
        assert_eq!(err.label, "12");
        assert!(Key::from_label("").is_err());
        assert!(Key::from_label("%").is_err());
    }
}
