//! Application configuration
//!
//! Sources, lowest to highest precedence:
//! - built-in defaults
//! - optional `config.toml` in the working directory
//! - `VIRALTOGETHER_*` environment variables, nested keys joined with `__`
//!   (e.g. `VIRALTOGETHER_GEOCODING__PROVIDER=google`)
//! - the deployment variables `LOCATION_SERVICE_PROVIDER`,
//!   `GOOGLE_MAPS_API_KEY` and `GOOGLE_MAPS_BASE_URL`

mod server;

use std::path::Path;

use integration_geocoding::GeocodingConfig;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use server::ServerConfig;

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Environment variable prefix for structured overrides
pub const ENV_PREFIX: &str = "VIRALTOGETHER";

/// Provider name override
pub const ENV_LOCATION_SERVICE_PROVIDER: &str = "LOCATION_SERVICE_PROVIDER";
/// Google Maps API key
pub const ENV_GOOGLE_MAPS_API_KEY: &str = "GOOGLE_MAPS_API_KEY";
/// Google Maps base URL override
pub const ENV_GOOGLE_MAPS_BASE_URL: &str = "GOOGLE_MAPS_BASE_URL";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Geocoding provider configuration
    #[serde(default)]
    pub geocoding: GeocodingConfig,
}

impl AppConfig {
    /// Load configuration from `config.toml` (optional) and the environment
    ///
    /// # Errors
    ///
    /// Returns an error if a source is present but cannot be parsed.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_with(config::File::with_name("config").required(false))
    }

    /// Load configuration from an explicit file plus the environment
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or cannot be parsed.
    pub fn load_from_file(path: &Path) -> Result<Self, config::ConfigError> {
        Self::load_with(config::File::from(path))
    }

    fn load_with<S>(file: S) -> Result<Self, config::ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let builder = config::Config::builder()
            // Start with defaults
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8000)?
            .set_default("geocoding.provider", "openstreetmap")?
            // Load from file if exists
            .add_source(file)
            // Override with environment variables (e.g., VIRALTOGETHER_SERVER__PORT)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let mut config: Self = builder.build()?.try_deserialize()?;
        config.apply_legacy_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply the flat deployment variables on top of the loaded values
    ///
    /// Empty values are ignored.
    pub fn apply_legacy_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(provider) = var(ENV_LOCATION_SERVICE_PROVIDER) {
            debug!(%provider, "Provider set from {ENV_LOCATION_SERVICE_PROVIDER}");
            self.geocoding.provider = provider;
        }
        if let Some(api_key) = var(ENV_GOOGLE_MAPS_API_KEY) {
            debug!("Google Maps API key set from {ENV_GOOGLE_MAPS_API_KEY}");
            self.geocoding.google.api_key = Some(SecretString::from(api_key));
        }
        if let Some(base_url) = var(ENV_GOOGLE_MAPS_BASE_URL) {
            self.geocoding.google.base_url = base_url;
        }
    }
}
