//! Geocoding adapter - Implements GeocodingPort using integration_geocoding

use std::sync::Arc;

use application::error::ApplicationError;
use application::ports::GeocodingPort;
use async_trait::async_trait;
use domain::{CountryCode, GeoLocation, GeocodeResult, ReverseGeocodeResult};
use integration_geocoding::{
    GeocodingConfig, GeocodingError, GeocodingService, GeocodingServiceFactory,
    LocationSearchService,
};
use tracing::{instrument, warn};

/// Adapter exposing the configured geocoding provider through `GeocodingPort`
pub struct GeocodingAdapter {
    geocoder: Arc<dyn GeocodingService>,
    search: Arc<dyn LocationSearchService>,
    degraded: bool,
}

impl std::fmt::Debug for GeocodingAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocodingAdapter")
            .field("geocoder", &self.geocoder.provider())
            .field("search", &self.search.provider())
            .field("degraded", &self.degraded)
            .finish()
    }
}

impl GeocodingAdapter {
    /// Wrap already constructed provider services
    pub fn new(
        geocoder: Arc<dyn GeocodingService>,
        search: Arc<dyn LocationSearchService>,
        degraded: bool,
    ) -> Self {
        Self {
            geocoder,
            search,
            degraded,
        }
    }

    /// Build both services from configuration
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` if the selected provider
    /// cannot be constructed (e.g. Google without an API key).
    pub fn from_config(config: &GeocodingConfig) -> Result<Self, ApplicationError> {
        let factory = GeocodingServiceFactory::new(config.clone());

        let geocoder = factory.create_geocoding_service().map_err(Self::map_error)?;
        let search = factory.create_location_search_service().map_err(Self::map_error)?;

        Ok(Self::new(geocoder, search, factory.selection().is_fallback()))
    }

    fn map_error(err: GeocodingError) -> ApplicationError {
        match err {
            GeocodingError::Configuration(e) => ApplicationError::Configuration(e),
            other => ApplicationError::ExternalService(other.to_string()),
        }
    }

    fn log_failure(&self, operation: &str, err: &GeocodingError) {
        warn!(
            provider = %self.geocoder.provider(),
            operation,
            retryable = err.is_retryable(),
            error = %err,
            "Geocoding provider call failed"
        );
    }
}

#[async_trait]
impl GeocodingPort for GeocodingAdapter {
    #[instrument(skip(self))]
    async fn geocode(
        &self,
        address: &str,
        country_code: Option<CountryCode>,
    ) -> Result<Option<GeocodeResult>, ApplicationError> {
        self.geocoder
            .try_geocode_address(address, country_code.as_ref().map(CountryCode::as_str))
            .await
            .map_err(|e| {
                self.log_failure("geocode", &e);
                Self::map_error(e)
            })
    }

    #[instrument(skip(self))]
    async fn reverse_geocode(
        &self,
        location: GeoLocation,
    ) -> Result<Option<ReverseGeocodeResult>, ApplicationError> {
        self.geocoder
            .try_reverse_geocode(location.latitude(), location.longitude())
            .await
            .map_err(|e| {
                self.log_failure("reverse_geocode", &e);
                Self::map_error(e)
            })
    }

    #[instrument(skip(self))]
    async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<GeocodeResult>, ApplicationError> {
        self.search
            .try_search_locations(query, limit)
            .await
            .map_err(|e| {
                self.log_failure("search", &e);
                Self::map_error(e)
            })
    }

    fn provider_name(&self) -> &'static str {
        self.geocoder.provider().as_str()
    }

    fn is_degraded(&self) -> bool {
        self.degraded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_error_configuration() {
        let err = GeocodingError::Configuration("missing key".into());
        assert!(matches!(
            GeocodingAdapter::map_error(err),
            ApplicationError::Configuration(_)
        ));
    }

    #[test]
    fn map_error_transport_is_external() {
        for err in [
            GeocodingError::ConnectionFailed("refused".into()),
            GeocodingError::Timeout { timeout_secs: 10 },
            GeocodingError::RequestFailed { status: 502 },
            GeocodingError::ParseError("eof".into()),
            GeocodingError::ProviderStatus {
                status: "REQUEST_DENIED".into(),
                message: "bad key".into(),
            },
        ] {
            assert!(matches!(
                GeocodingAdapter::map_error(err),
                ApplicationError::ExternalService(_)
            ));
        }
    }

    #[test]
    fn from_config_reports_fallback() {
        let config = GeocodingConfig {
            provider: "here".to_string(),
            ..GeocodingConfig::default()
        };
        let adapter = GeocodingAdapter::from_config(&config).unwrap();
        assert!(adapter.is_degraded());
        assert_eq!(adapter.provider_name(), "openstreetmap");
    }

    #[test]
    fn from_config_google_without_key_fails() {
        let config = GeocodingConfig {
            provider: "google".to_string(),
            ..GeocodingConfig::default()
        };
        assert!(matches!(
            GeocodingAdapter::from_config(&config),
            Err(ApplicationError::Configuration(_))
        ));
    }

    #[test]
    fn trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GeocodingAdapter>();
    }
}
