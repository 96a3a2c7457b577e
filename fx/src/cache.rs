//! Historical rate caching with TTL support.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use dashmap::DashMap;
use tracing::debug;
use valuta_common::{Clock, Currency};

use crate::provider::ProviderRates;

/// Cached historical day.
#[derive(Debug, Clone)]
struct CacheEntry {
    rates: ProviderRates,
    expires_at: DateTime<Utc>,
}

impl CacheEntry {
    fn is_valid(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Configuration for the history cache.
#[derive(Debug, Clone)]
pub struct HistoryCacheConfig {
    /// How long a fetched day stays usable.
    pub ttl: Duration,
    /// Maximum number of entries.
    pub max_entries: usize,
}

impl Default for HistoryCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::hours(1),
            max_entries: 2048,
        }
    }
}

/// Thread-safe cache of historical rate tables keyed by base and day.
pub struct HistoryCache {
    cache: DashMap<String, CacheEntry>,
    config: HistoryCacheConfig,
    clock: Arc<dyn Clock>,
}

impl HistoryCache {
    /// Create a new cache with default configuration.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_config(HistoryCacheConfig::default(), clock)
    }

    /// Create a new cache with custom configuration.
    pub fn with_config(config: HistoryCacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            cache: DashMap::new(),
            config,
            clock,
        }
    }

    /// Get a day's rates if cached and still valid.
    pub fn get(&self, base: &Currency, date: NaiveDate) -> Option<ProviderRates> {
        let key = Self::cache_key(base, date);
        let now = self.clock.now_utc();

        if let Some(entry) = self.cache.get(&key) {
            if entry.is_valid(now) {
                debug!(base = %base, date = %date, "Cache hit");
                return Some(entry.rates.clone());
            }
            debug!(base = %base, date = %date, "Cache entry expired");
            drop(entry);
            self.cache.remove(&key);
        }

        debug!(base = %base, date = %date, "Cache miss");
        None
    }

    /// Insert a day's rates fetched for `base`.
    pub fn insert(&self, base: &Currency, date: NaiveDate, rates: ProviderRates) {
        if self.config.max_entries == 0 {
            return;
        }

        if self.cache.len() >= self.config.max_entries {
            self.evict_expired();
            if self.cache.len() >= self.config.max_entries {
                self.cache.clear();
            }
        }

        let entry = CacheEntry {
            rates,
            expires_at: self.clock.now_utc() + self.config.ttl,
        };
        self.cache.insert(Self::cache_key(base, date), entry);
    }

    /// Clear all cached days.
    pub fn clear(&self) {
        self.cache.clear();
    }

    /// Get the number of entries in cache.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Check if cache is empty.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Evict expired entries.
    pub fn evict_expired(&self) {
        let now = self.clock.now_utc();
        self.cache.retain(|_, entry| entry.is_valid(now));
    }

    /// Get cache statistics.
    pub fn stats(&self) -> CacheStats {
        let now = self.clock.now_utc();
        let total = self.cache.len();
        let valid = self.cache.iter().filter(|e| e.is_valid(now)).count();

        CacheStats {
            total_entries: total,
            valid_entries: valid,
            expired_entries: total - valid,
        }
    }

    fn cache_key(base: &Currency, date: NaiveDate) -> String {
        format!("{}/{}", base.code(), date)
    }
}

/// Cache statistics.
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub total_entries: usize,
    pub valid_entries: usize,
    pub expired_entries: usize,
}
