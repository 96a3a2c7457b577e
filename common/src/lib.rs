//! Valuta Common Types
//!
//! Shared types used across the Valuta crates: currency codes and the
//! built-in catalog, locale defaults, and the injectable clock.

pub mod clock;
pub mod currency;
pub mod grouping;
pub mod locale;

pub use clock::*;
pub use currency::*;
pub use grouping::*;
pub use locale::*;
