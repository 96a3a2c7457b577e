//! Rate provider configuration.

use crate::error::{FxError, FxResult};

/// Default endpoint of the exchange-rate API.
pub const DEFAULT_API_URL: &str = "https://v6.exchangerate-api.com/v6";

/// Configuration for the HTTP rate provider.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL; requests go to `{base_url}/{api_key}/...`.
    pub base_url: String,
    /// API key embedded in the request path.
    pub api_key: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            api_key: String::new(),
        }
    }
}

impl ApiConfig {
    /// Create a configuration for the default endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("VALUTA_API_URL") {
            config.base_url = url;
        }

        if let Ok(key) = std::env::var("VALUTA_API_KEY") {
            config.api_key = key;
        }

        config
    }

    /// Whether enough is configured to talk to the live API.
    pub fn is_configured(&self) -> bool {
        self.validate().is_ok()
    }

    /// Validate configuration.
    pub fn validate(&self) -> FxResult<()> {
        if self.base_url.is_empty() {
            return Err(FxError::InvalidConfig("API base URL cannot be empty".to_string()));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(FxError::InvalidConfig(format!(
                "API base URL must be http(s): {}",
                self.base_url
            )));
        }

        if self.api_key.trim().is_empty() {
            return Err(FxError::InvalidConfig("API key cannot be empty".to_string()));
        }

        Ok(())
    }

    /// Endpoint prefix with the key, without a trailing slash.
    pub(crate) fn endpoint(&self) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), self.api_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_requires_key() {
        let config = ApiConfig::default();
        assert!(matches!(config.validate(), Err(FxError::InvalidConfig(_))));
        assert!(!config.is_configured());
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let config = ApiConfig {
            base_url: "https://rates.example.com/v6/".to_string(),
            api_key: "k3y".to_string(),
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.endpoint(), "https://rates.example.com/v6/k3y");
    }

    #[test]
    fn test_rejects_non_http_url() {
        let config = ApiConfig {
            base_url: "ftp://rates.example.com".to_string(),
            api_key: "k3y".to_string(),
        };
        assert!(config.validate().is_err());
    }
}
