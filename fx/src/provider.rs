//! Rate provider trait and implementations.

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, instrument, warn};
use valuta_common::Currency;

use crate::config::ApiConfig;
use crate::error::{FxError, FxResult};

/// User agent sent with provider requests.
const USER_AGENT: &str = concat!("Valuta/", env!("CARGO_PKG_VERSION"));

/// Rates returned by a provider for one base currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderRates {
    /// Base the rates are quoted against.
    pub base: Currency,
    /// Units of each currency per one unit of `base`.
    pub rates: BTreeMap<Currency, f64>,
    /// Provider's own update timestamp, if reported.
    pub provider_updated: Option<String>,
}

impl ProviderRates {
    /// Rate for a currency, if present.
    pub fn rate(&self, currency: &Currency) -> Option<f64> {
        self.rates.get(currency).copied()
    }
}

/// Trait for exchange-rate providers.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Get the provider name.
    fn name(&self) -> &str;

    /// Latest rates quoted against `base`.
    async fn latest(&self, base: &Currency) -> FxResult<ProviderRates>;

    /// Rates quoted against `base` on a past calendar day.
    async fn historical(&self, base: &Currency, date: NaiveDate) -> FxResult<ProviderRates>;
}

/// Response envelope shared by the `latest` and `history` endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct RatesResponse {
    pub result: String,
    #[serde(rename = "error-type", default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub base_code: Option<Currency>,
    #[serde(default)]
    pub time_last_update_utc: Option<String>,
    #[serde(default)]
    pub conversion_rates: BTreeMap<Currency, f64>,
}

impl RatesResponse {
    /// Validate the envelope and extract its rates.
    pub fn into_rates(self, requested_base: &Currency) -> FxResult<ProviderRates> {
        if self.result != "success" {
            return Err(FxError::Rejected {
                result: self.result,
                error_type: self.error_type,
            });
        }

        Ok(ProviderRates {
            base: self.base_code.unwrap_or_else(|| requested_base.clone()),
            rates: self.conversion_rates,
            provider_updated: self.time_last_update_utc,
        })
    }
}

/// HTTP client for the exchangerate-api.com v6 API.
#[derive(Debug, Clone)]
pub struct ExchangeRateApi {
    client: Client,
    config: ApiConfig,
}

impl ExchangeRateApi {
    /// Create a provider from a validated configuration.
    pub fn new(config: ApiConfig) -> FxResult<Self> {
        config.validate()?;
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client, config })
    }

    fn latest_url(&self, base: &Currency) -> String {
        format!("{}/latest/{}", self.config.endpoint(), base)
    }

    fn history_url(&self, base: &Currency, date: NaiveDate) -> String {
        format!(
            "{}/history/{}/{}/{}/{}",
            self.config.endpoint(),
            base,
            date.year(),
            date.month(),
            date.day()
        )
    }

    async fn fetch(&self, url: String, base: &Currency) -> FxResult<ProviderRates> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        debug!(status = %status, "Response received");

        if !status.is_success() {
            return Err(FxError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let envelope: RatesResponse = serde_json::from_slice(&body)?;
        envelope.into_rates(base)
    }
}

#[async_trait]
impl RateProvider for ExchangeRateApi {
    fn name(&self) -> &str {
        "exchangerate-api"
    }

    #[instrument(skip(self), fields(base = %base))]
    async fn latest(&self, base: &Currency) -> FxResult<ProviderRates> {
        let result = self.fetch(self.latest_url(base), base).await;
        if let Err(e) = &result {
            warn!(error = %e, "Latest rates request failed");
        }
        result
    }

    #[instrument(skip(self), fields(base = %base, date = %date))]
    async fn historical(&self, base: &Currency, date: NaiveDate) -> FxResult<ProviderRates> {
        self.fetch(self.history_url(base, date), base).await
    }
}

/// Mock rate provider for testing.
#[cfg(any(test, feature = "test-utils"))]
pub struct MockRateProvider {
    name: String,
    latest: parking_lot::Mutex<Option<ProviderRates>>,
    history: dashmap::DashMap<NaiveDate, ProviderRates>,
    calls: std::sync::atomic::AtomicUsize,
}

#[cfg(any(test, feature = "test-utils"))]
impl MockRateProvider {
    /// Create a new mock provider with no data.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            latest: parking_lot::Mutex::new(None),
            history: dashmap::DashMap::new(),
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Serve `rates` (against USD) from `latest`. `None` makes it fail.
    pub fn set_latest(&self, rates: Option<&[(&str, f64)]>) {
        *self.latest.lock() = rates.map(Self::usd_rates);
    }

    /// Serve `rates` (against USD) for a historical day.
    pub fn set_historical(&self, date: NaiveDate, rates: &[(&str, f64)]) {
        self.history.insert(date, Self::usd_rates(rates));
    }

    /// Number of provider calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }

    fn usd_rates(rates: &[(&str, f64)]) -> ProviderRates {
        ProviderRates {
            base: Currency::usd(),
            rates: rates
                .iter()
                .map(|(code, rate)| (Currency::new(*code), *rate))
                .collect(),
            provider_updated: None,
        }
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl RateProvider for MockRateProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn latest(&self, _base: &Currency) -> FxResult<ProviderRates> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.latest
            .lock()
            .clone()
            .ok_or_else(|| FxError::Status { status: 503 })
    }

    async fn historical(&self, _base: &Currency, date: NaiveDate) -> FxResult<ProviderRates> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.history
            .get(&date)
            .map(|r| r.clone())
            .ok_or_else(|| FxError::ProviderError(format!("no data for {date}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_success() {
        let json = r#"{
            "result": "success",
            "base_code": "USD",
            "time_last_update_utc": "Fri, 16 Oct 2026 00:00:01 +0000",
            "conversion_rates": {"USD": 1, "EUR": 0.9213, "GEL": 2.71}
        }"#;

        let envelope: RatesResponse = serde_json::from_str(json).unwrap();
        let rates = envelope.into_rates(&Currency::usd()).unwrap();

        assert_eq!(rates.base, Currency::usd());
        assert_eq!(rates.rate(&Currency::eur()), Some(0.9213));
        assert_eq!(rates.rate(&Currency::usd()), Some(1.0));
        assert!(rates.provider_updated.is_some());
    }

    #[test]
    fn test_envelope_error_result() {
        let json = r#"{"result": "error", "error-type": "quota-reached"}"#;

        let envelope: RatesResponse = serde_json::from_str(json).unwrap();
        let err = envelope.into_rates(&Currency::usd()).unwrap_err();

        match err {
            FxError::Rejected { result, error_type } => {
                assert_eq!(result, "error");
                assert_eq!(error_type.as_deref(), Some("quota-reached"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_urls() {
        let api = ExchangeRateApi::new(ApiConfig {
            base_url: "https://rates.example.com/v6".to_string(),
            api_key: "abc".to_string(),
        })
        .unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 3, 5).unwrap();

        assert_eq!(
            api.latest_url(&Currency::usd()),
            "https://rates.example.com/v6/abc/latest/USD"
        );
        assert_eq!(
            api.history_url(&Currency::usd(), date),
            "https://rates.example.com/v6/abc/history/USD/2026/3/5"
        );
    }

    #[test]
    fn test_new_rejects_missing_key() {
        assert!(matches!(
            ExchangeRateApi::new(ApiConfig::default()),
            Err(FxError::InvalidConfig(_))
        ));
    }

    #[tokio::test]
    async fn test_mock_provider() {
        let provider = MockRateProvider::new("test");
        provider.set_latest(Some(&[("USD", 1.0), ("EUR", 0.91)]));

        let rates = provider.latest(&Currency::usd()).await.unwrap();
        assert_eq!(rates.rate(&Currency::eur()), Some(0.91));

        provider.set_latest(None);
        assert!(provider.latest(&Currency::usd()).await.is_err());

        let date = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
        assert!(provider.historical(&Currency::usd(), date).await.is_err());
        assert_eq!(provider.calls(), 3);
    }
}
