//! FX engine error types.

use thiserror::Error;

/// Errors that can occur in the FX engine.
#[derive(Debug, Error)]
pub enum FxError {
    /// Transport-level failure talking to the rate provider.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider answered with a non-success HTTP status.
    #[error("Rate provider returned HTTP {status}")]
    Status { status: u16 },

    /// Provider answered but reported `result != "success"`.
    #[error("Rate provider rejected request: {result} ({})", .error_type.as_deref().unwrap_or("unknown"))]
    Rejected {
        result: String,
        error_type: Option<String>,
    },

    /// Provider payload could not be decoded.
    #[error("Invalid provider response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Provider has no data for the request.
    #[error("Rate provider error: {0}")]
    ProviderError(String),

    /// A live operation was requested but no provider is configured.
    #[error("No rate provider configured")]
    NoProviderConfigured,

    /// Configuration is incomplete or malformed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl FxError {
    /// Check if a later attempt could succeed.
    ///
    /// The engine never retries on its own; this only informs the caller.
    pub fn is_retryable(&self) -> bool {
        match self {
            FxError::Http(_) => true,
            FxError::Status { status } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Stable code for surfacing the error state to the UI.
    pub fn error_code(&self) -> &'static str {
        match self {
            FxError::Http(_) => "NETWORK_ERROR",
            FxError::Status { .. } => "HTTP_STATUS",
            FxError::Rejected { .. } => "PROVIDER_REJECTED",
            FxError::Decode(_) => "INVALID_RESPONSE",
            FxError::ProviderError(_) => "PROVIDER_ERROR",
            FxError::NoProviderConfigured => "NO_PROVIDER",
            FxError::InvalidConfig(_) => "CONFIGURATION_ERROR",
        }
    }
}

/// Result type for FX operations.
pub type FxResult<T> = Result<T, FxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_statuses() {
        assert!(FxError::Status { status: 503 }.is_retryable());
        assert!(FxError::Status { status: 429 }.is_retryable());
        assert!(!FxError::Status { status: 403 }.is_retryable());
        assert!(!FxError::NoProviderConfigured.is_retryable());
    }

    #[test]
    fn test_rejected_message() {
        let err = FxError::Rejected {
            result: "error".to_string(),
            error_type: Some("invalid-key".to_string()),
        };
        assert_eq!(err.to_string(), "Rate provider rejected request: error (invalid-key)");
        assert_eq!(err.error_code(), "PROVIDER_REJECTED");
    }
}
