//! Valuta Store
//!
//! The persisted client state (selected currencies, settings, usage
//! counters and the last rate table) and the [`AppStore`] facade that ties
//! rates, quotas and the calculator together.

pub mod app;
pub mod backend;
pub mod error;
pub mod selection;
pub mod settings;
pub mod state;

pub use app::{AddCurrencyOutcome, AppStore, AppStoreConfig, ChartView, ConverterPair, RefreshOutcome};
pub use backend::{FileStore, KeyValueStore, MemoryStore};
pub use error::{StoreError, StoreResult};
pub use selection::CurrencySelection;
pub use settings::{Settings, ThemeMode, UpdateMode};
pub use state::{PersistedState, STATE_KEY};
