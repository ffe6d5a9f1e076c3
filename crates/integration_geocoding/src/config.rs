//! Geocoding configuration

use std::fmt;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Identifying User-Agent required by the Nominatim usage policy
pub const DEFAULT_USER_AGENT: &str =
    "ViralTogether/1.0 (https://viraltogether.com; contact@viraltogether.com)";

/// Top-level geocoding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Provider name ("openstreetmap" or "google", case-insensitive).
    /// Unknown values fall back to OpenStreetMap.
    #[serde(default = "default_provider")]
    pub provider: String,

    /// OpenStreetMap / Nominatim settings
    #[serde(default)]
    pub openstreetmap: NominatimConfig,

    /// Google Maps settings (only required when `provider = "google"`)
    #[serde(default)]
    pub google: GoogleMapsConfig,
}

fn default_provider() -> String {
    "openstreetmap".to_string()
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            openstreetmap: NominatimConfig::default(),
            google: GoogleMapsConfig::default(),
        }
    }
}

impl GeocodingConfig {
    /// Configuration pointing both providers at a local mock server
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            provider: default_provider(),
            openstreetmap: NominatimConfig {
                base_url: base_url.to_string(),
                timeout_secs: 5,
                ..NominatimConfig::default()
            },
            google: GoogleMapsConfig {
                api_key: Some(SecretString::from("test-api-key")),
                base_url: base_url.to_string(),
                timeout_secs: 5,
            },
        }
    }
}

/// Configuration for the Nominatim (OpenStreetMap) geocoding service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NominatimConfig {
    /// Base URL for the Nominatim API
    #[serde(default = "default_nominatim_base_url")]
    pub base_url: String,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_nominatim_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: default_nominatim_base_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Configuration for the Google Maps Geocoding and Places APIs
#[derive(Clone, Serialize, Deserialize)]
pub struct GoogleMapsConfig {
    /// API key (sensitive - uses SecretString)
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    /// Base URL for the Google Maps APIs
    #[serde(default = "default_google_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_google_base_url() -> String {
    "https://maps.googleapis.com".to_string()
}

impl Default for GoogleMapsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_google_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl fmt::Debug for GoogleMapsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleMapsConfig")
            .field(
                "api_key",
                &if self.api_key.is_some() {
                    Some("[REDACTED]")
                } else {
                    None
                },
            )
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
