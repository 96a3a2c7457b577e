//! Main FX engine implementation.

use std::sync::Arc;

use futures::future::join_all;
use parking_lot::{Mutex, RwLock};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, instrument, warn};
use valuta_common::{Clock, Currency};

use crate::cache::{CacheStats, HistoryCache, HistoryCacheConfig};
use crate::conversion::{self, ConversionRequest};
use crate::drift::simulate_drift;
use crate::error::{FxError, FxResult};
use crate::history::{ChartPeriod, ChartPoint};
use crate::provider::{ProviderRates, RateProvider};
use crate::table::{RateSource, RateTable};

/// Configuration for the FX engine.
#[derive(Debug, Clone)]
pub struct FxEngineConfig {
    /// Currency every table rate is quoted against.
    pub numeraire: Currency,
    /// Whether refreshes should hit the provider when one is configured.
    pub live_source: bool,
    /// History cache configuration.
    pub history_cache: HistoryCacheConfig,
}

impl Default for FxEngineConfig {
    fn default() -> Self {
        Self {
            numeraire: Currency::usd(),
            live_source: true,
            history_cache: HistoryCacheConfig::default(),
        }
    }
}

/// The FX engine: current rate table, refresh, conversion and chart data.
///
/// Overlapping refreshes are not coordinated; whichever finishes last
/// replaces the table.
pub struct FxEngine {
    provider: Option<Arc<dyn RateProvider>>,
    table: RwLock<RateTable>,
    cache: HistoryCache,
    rng: Mutex<StdRng>,
    clock: Arc<dyn Clock>,
    config: FxEngineConfig,
}

impl FxEngine {
    /// Create an engine seeded with the built-in rates.
    pub fn new(
        provider: Option<Arc<dyn RateProvider>>,
        clock: Arc<dyn Clock>,
        config: FxEngineConfig,
    ) -> Self {
        let seed = RateTable::seed(clock.now_utc());
        Self {
            provider,
            table: RwLock::new(seed),
            cache: HistoryCache::with_config(config.history_cache.clone(), clock.clone()),
            rng: Mutex::new(StdRng::from_entropy()),
            clock,
            config,
        }
    }

    /// Start from a previously persisted table instead of the seed.
    pub fn with_table(self, table: RateTable) -> Self {
        *self.table.write() = table;
        self
    }

    /// Use a specific random source for simulated refreshes.
    pub fn with_rng(self, rng: StdRng) -> Self {
        *self.rng.lock() = rng;
        self
    }

    /// Snapshot of the current table.
    pub fn table(&self) -> RateTable {
        self.table.read().clone()
    }

    /// Whether a refresh with `live_source` would reach the provider.
    pub fn has_live_source(&self) -> bool {
        self.config.live_source && self.provider.is_some()
    }

    /// Engine configuration.
    pub fn config(&self) -> &FxEngineConfig {
        &self.config
    }

    /// Refresh the table.
    ///
    /// With `live_source` and a configured provider the table is replaced by
    /// the provider's latest rates; on failure the current table is kept and
    /// the error returned. Otherwise the current table is drifted locally.
    #[instrument(skip(self))]
    pub async fn refresh(&self, live_source: bool) -> FxResult<RateTable> {
        let provider = match (&self.provider, live_source) {
            (Some(provider), true) => provider,
            _ => {
                debug!("No live source, simulating drift");
                return Ok(self.simulate());
            }
        };

        let fetched = provider.latest(&self.config.numeraire).await.map_err(|e| {
            warn!(provider = provider.name(), error = %e, "Rate refresh failed, keeping previous table");
            e
        })?;

        let table = RateTable {
            base: fetched.base,
            rates: fetched.rates,
            last_updated: self.clock.now_utc(),
            source: RateSource::Live,
        };
        *self.table.write() = table.clone();

        info!(
            provider = provider.name(),
            currencies = table.len(),
            "Rates refreshed"
        );

        Ok(table)
    }

    /// Replace the table with a drifted copy of itself.
    pub fn simulate(&self) -> RateTable {
        let now = self.clock.now_utc();
        let next = {
            let mut rng = self.rng.lock();
            let current = self.table.read();
            simulate_drift(&current, &mut *rng, now)
        };
        *self.table.write() = next.clone();

        info!(currencies = next.len(), "Simulated rate refresh");
        next
    }

    /// Convert an amount using the current table.
    pub fn convert(&self, amount: f64, from: &Currency, to: &Currency) -> f64 {
        conversion::convert(amount, from, to, &self.table.read())
    }

    /// Evaluate a conversion request against the current table.
    pub fn evaluate(&self, request: &ConversionRequest) -> f64 {
        request.evaluate(&self.table.read())
    }

    /// Units of `to` per one `from` in the current table.
    pub fn cross_rate(&self, from: &Currency, to: &Currency) -> f64 {
        conversion::cross_rate(from, to, &self.table.read())
    }

    /// Historical `from`→`to` series for a chart period, oldest first.
    ///
    /// Days are fetched concurrently. A day whose fetch fails, or whose
    /// rates lack `to`, is dropped from the series.
    #[instrument(skip_all, fields(from = %from, to = %to, period = %period))]
    pub async fn chart(
        &self,
        from: &Currency,
        to: &Currency,
        period: ChartPeriod,
    ) -> FxResult<Vec<ChartPoint>> {
        let provider = self.provider.as_ref().ok_or(FxError::NoProviderConfigured)?;
        let today = self.clock.now().date_naive();
        let dates = period.sample_dates(today);

        let fetches = dates.iter().map(|date| async move {
            let rates = self.historical_rates(provider.as_ref(), from, *date).await;
            (*date, rates)
        });

        let mut points = Vec::with_capacity(dates.len());
        for (date, rates) in join_all(fetches).await {
            match rates.and_then(|r| r.rate(to).filter(|rate| *rate != 0.0)) {
                Some(rate) => points.push(ChartPoint::new(date, rate)),
                None => warn!(date = %date, "Dropping chart point"),
            }
        }

        debug!(requested = dates.len(), kept = points.len(), "Chart series ready");
        Ok(points)
    }

    async fn historical_rates(
        &self,
        provider: &dyn RateProvider,
        base: &Currency,
        date: chrono::NaiveDate,
    ) -> Option<ProviderRates> {
        if let Some(cached) = self.cache.get(base, date) {
            return Some(cached);
        }

        match provider.historical(base, date).await {
            Ok(rates) => {
                self.cache.insert(base, date, rates.clone());
                Some(rates)
            }
            Err(e) => {
                debug!(date = %date, error = %e, "Historical fetch failed");
                None
            }
        }
    }

    /// Get engine statistics.
    pub fn stats(&self) -> FxEngineStats {
        let table = self.table.read();
        FxEngineStats {
            currencies: table.len(),
            source: table.source,
            cache_stats: self.cache.stats(),
        }
    }

    /// Drop expired history entries.
    pub fn cleanup(&self) {
        self.cache.evict_expired();
    }
}

/// Engine statistics.
#[derive(Debug, Clone)]
pub struct FxEngineStats {
    pub currencies: usize,
    pub source: RateSource,
    pub cache_stats: CacheStats,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MockRateProvider;
    use chrono::{Duration, NaiveDate};
    use valuta_common::ManualClock;

    fn clock() -> Arc<ManualClock> {
        Arc::new(ManualClock::at(2026, 10, 17, 12, 0))
    }

    fn setup_engine(provider: Arc<MockRateProvider>, clock: Arc<ManualClock>) -> FxEngine {
        FxEngine::new(Some(provider), clock, FxEngineConfig::default())
            .with_rng(StdRng::seed_from_u64(1))
    }

    #[tokio::test]
    async fn test_live_refresh_replaces_table() {
        let provider = Arc::new(MockRateProvider::new("test"));
        provider.set_latest(Some(&[("USD", 1.0), ("EUR", 0.5)]));
        let clock = clock();
        let engine = setup_engine(provider, clock.clone());

        clock.advance(Duration::minutes(10));
        let table = tokio_test::assert_ok!(engine.refresh(true).await);

        assert_eq!(table.source, RateSource::Live);
        assert_eq!(table.len(), 2);
        assert_eq!(table.last_updated, clock.now_utc());
        assert_eq!(engine.convert(10.0, &Currency::usd(), &Currency::eur()), 5.0);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_table() {
        let provider = Arc::new(MockRateProvider::new("test"));
        provider.set_latest(None);
        let engine = setup_engine(provider, clock());
        let before = engine.table();

        let result = engine.refresh(true).await;

        assert!(matches!(result, Err(FxError::Status { status: 503 })));
        assert_eq!(engine.table(), before);
    }

    #[tokio::test]
    async fn test_refresh_without_provider_simulates() {
        let engine = FxEngine::new(None, clock(), FxEngineConfig::default())
            .with_rng(StdRng::seed_from_u64(3));
        assert!(!engine.has_live_source());

        let table = engine.refresh(true).await.unwrap();

        assert_eq!(table.source, RateSource::Simulated);
        assert_eq!(table.rate(&Currency::usd()), Some(1.0));
        assert_eq!(engine.stats().source, RateSource::Simulated);
    }

    #[tokio::test]
    async fn test_refresh_not_live_skips_provider() {
        let provider = Arc::new(MockRateProvider::new("test"));
        provider.set_latest(Some(&[("USD", 1.0), ("EUR", 0.5)]));
        let engine = setup_engine(provider.clone(), clock());
        let before = engine.table();

        let table = engine.refresh(false).await.unwrap();

        assert_eq!(table.source, RateSource::Simulated);
        assert_eq!(table.len(), before.len());
        assert_eq!(table.rate(&Currency::usd()), Some(1.0));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_chart_drops_failed_days() {
        let provider = Arc::new(MockRateProvider::new("test"));
        let today = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        for offset in [7, 5, 3, 0] {
            let date = today - Duration::days(offset);
            provider.set_historical(date, &[("USD", 1.0), ("EUR", 0.9 + offset as f64 / 100.0)]);
        }
        // Present but missing the quote currency.
        provider.set_historical(today - Duration::days(1), &[("USD", 1.0)]);
        let engine = setup_engine(provider.clone(), clock());

        let points = engine
            .chart(&Currency::usd(), &Currency::eur(), ChartPeriod::OneWeek)
            .await
            .unwrap();

        let dates: Vec<NaiveDate> = points.iter().map(|p| p.date).collect();
        assert_eq!(
            dates,
            vec![
                today - Duration::days(7),
                today - Duration::days(5),
                today - Duration::days(3),
                today
            ]
        );
        assert!((points[0].rate - 0.97).abs() < 1e-12);
        assert_eq!(provider.calls(), 8);
    }

    #[tokio::test]
    async fn test_chart_uses_history_cache() {
        let provider = Arc::new(MockRateProvider::new("test"));
        let today = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        provider.set_historical(today, &[("USD", 1.0), ("EUR", 0.9)]);
        provider.set_historical(today - Duration::days(1), &[("USD", 1.0), ("EUR", 0.8)]);
        let engine = setup_engine(provider.clone(), clock());

        let first = engine
            .chart(&Currency::usd(), &Currency::eur(), ChartPeriod::OneDay)
            .await
            .unwrap();
        let second = engine
            .chart(&Currency::usd(), &Currency::eur(), ChartPeriod::OneDay)
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert_eq!(provider.calls(), 2);
        assert_eq!(engine.stats().cache_stats.valid_entries, 2);
    }

    #[tokio::test]
    async fn test_chart_requires_provider() {
        let engine = FxEngine::new(None, clock(), FxEngineConfig::default());

        let result = engine
            .chart(&Currency::usd(), &Currency::eur(), ChartPeriod::OneWeek)
            .await;

        assert!(matches!(result, Err(FxError::NoProviderConfigured)));
    }
}
