//! Application state shared across handlers

use std::sync::Arc;

use application::LocationService;
use infrastructure::AppConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Geocoding, reverse geocoding and location search
    pub location_service: Arc<LocationService>,
    /// Application configuration
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Create state from a ready location service
    pub fn new(location_service: LocationService, config: AppConfig) -> Self {
        Self {
            location_service: Arc::new(location_service),
            config: Arc::new(config),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("location_service", &self.location_service)
            .field("server", &self.config.server.bind_address())
            .finish_non_exhaustive()
    }
}
