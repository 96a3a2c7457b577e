//! Valuta Calculator
//!
//! Four-function keypad calculator with deferred left-to-right evaluation.
//! Completing an evaluation counts against the conversion quota.

pub mod display;
pub mod key;
pub mod state;

pub use display::format_input_display;
pub use key::{Key, KeyParseError, Operator};
pub use state::{Calculator, KeyOutcome};
