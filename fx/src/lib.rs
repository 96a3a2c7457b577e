//! Valuta FX Engine
//!
//! Rate tables quoted against a single numeraire, cross-rate conversion,
//! live or simulated refreshes, and historical chart series.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use valuta_common::{Currency, SystemClock};
//! use valuta_fx::{ApiConfig, ExchangeRateApi, FxEngine, FxEngineConfig};
//!
//! let provider = Arc::new(ExchangeRateApi::new(ApiConfig::from_env())?);
//! let engine = FxEngine::new(Some(provider), Arc::new(SystemClock), FxEngineConfig::default());
//!
//! engine.refresh(true).await?;
//! let eur = engine.convert(100.0, &Currency::usd(), &Currency::eur());
//! ```

pub mod cache;
pub mod config;
pub mod conversion;
pub mod drift;
pub mod engine;
pub mod error;
pub mod history;
pub mod provider;
pub mod table;

pub use cache::{CacheStats, HistoryCache, HistoryCacheConfig};
pub use config::ApiConfig;
pub use conversion::{
    convert, cross_rate, display_decimals, format_display, format_grouped, ConversionRequest,
};
pub use drift::{simulate_drift, DRIFT_BAND};
pub use engine::{FxEngine, FxEngineConfig, FxEngineStats};
pub use error::{FxError, FxResult};
pub use history::{ChartPeriod, ChartPoint, ChartStats};
pub use provider::{ExchangeRateApi, ProviderRates, RateProvider, RatesResponse};
pub use table::{RateSource, RateTable};

#[cfg(any(test, feature = "test-utils"))]
pub use provider::MockRateProvider;
