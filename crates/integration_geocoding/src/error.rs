//! Geocoding error types

use thiserror::Error;

/// Errors that can occur during geocoding operations
#[derive(Debug, Error)]
pub enum GeocodingError {
    /// Provider is misconfigured (e.g. missing API key)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Connection to the geocoding service failed
    #[error("Geocoding connection failed: {0}")]
    ConnectionFailed(String),

    /// Request timeout
    #[error("Geocoding request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },

    /// Provider answered with a non-success HTTP status
    #[error("Geocoding request failed: HTTP {status}")]
    RequestFailed {
        /// HTTP status code
        status: u16,
    },

    /// Failed to parse the provider response
    #[error("Geocoding parse error: {0}")]
    ParseError(String),

    /// Provider answered 200 but reported an error status in the body
    #[error("Geocoding provider returned status {status}: {message}")]
    ProviderStatus {
        /// Provider status string (e.g. "REQUEST_DENIED")
        status: String,
        /// Provider error message, if any
        message: String,
    },
}

impl GeocodingError {
    /// Returns true if this error is retryable
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ConnectionFailed(_) | Self::Timeout { .. } => true,
            Self::RequestFailed { status } => *status == 429 || *status >= 500,
            Self::ProviderStatus { status, .. } => {
                matches!(status.as_str(), "OVER_QUERY_LIMIT" | "UNKNOWN_ERROR")
            },
            Self::Configuration(_) | Self::ParseError(_) => false,
        }
    }

    /// Map a reqwest transport error, dropping the URL so query-string
    /// credentials never reach logs
    pub(crate) fn from_transport(err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout { timeout_secs }
        } else {
            Self::ConnectionFailed(err.without_url().to_string())
        }
    }
}
