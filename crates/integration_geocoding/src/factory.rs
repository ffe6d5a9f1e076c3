//! Provider factory
//!
//! Maps the configured provider name to a concrete client so callers only
//! ever see the capability traits.

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::GeocodingConfig;
use crate::{
    GeocodingError, GeocodingProviderKind, GeocodingService, GoogleMapsGeocodingClient,
    LocationSearchService, NominatimGeocodingClient, ProviderSelection,
};

/// Creates geocoding and location search services from configuration
///
/// The provider name is resolved once, when the factory is built.
#[derive(Debug, Clone)]
pub struct GeocodingServiceFactory {
    config: GeocodingConfig,
    selection: ProviderSelection,
}

impl GeocodingServiceFactory {
    /// Create a factory and resolve the configured provider
    #[must_use]
    pub fn new(config: GeocodingConfig) -> Self {
        let selection = ProviderSelection::resolve(&config.provider);
        Self { config, selection }
    }

    /// The resolved provider selection
    #[must_use]
    pub const fn selection(&self) -> &ProviderSelection {
        &self.selection
    }

    /// Create the address/coordinate lookup service
    ///
    /// # Errors
    ///
    /// Returns `GeocodingError::Configuration` if the selected provider is
    /// missing a required credential.
    pub fn create_geocoding_service(&self) -> Result<Arc<dyn GeocodingService>, GeocodingError> {
        let kind = self.announce("geocoding");

        let service: Arc<dyn GeocodingService> = match kind {
            GeocodingProviderKind::OpenStreetMap => {
                Arc::new(NominatimGeocodingClient::new(&self.config.openstreetmap)?)
            },
            GeocodingProviderKind::Google => {
                Arc::new(GoogleMapsGeocodingClient::new(&self.config.google)?)
            },
        };

        Ok(service)
    }

    /// Create the free-text location search service
    ///
    /// # Errors
    ///
    /// Returns `GeocodingError::Configuration` if the selected provider is
    /// missing a required credential.
    pub fn create_location_search_service(
        &self,
    ) -> Result<Arc<dyn LocationSearchService>, GeocodingError> {
        let kind = self.announce("location search");

        let service: Arc<dyn LocationSearchService> = match kind {
            GeocodingProviderKind::OpenStreetMap => {
                Arc::new(NominatimGeocodingClient::new(&self.config.openstreetmap)?)
            },
            GeocodingProviderKind::Google => {
                Arc::new(GoogleMapsGeocodingClient::new(&self.config.google)?)
            },
        };

        Ok(service)
    }

    fn announce(&self, capability: &str) -> GeocodingProviderKind {
        let kind = self.selection.kind();

        if self.selection.is_fallback() {
            warn!(
                requested = %self.selection.requested(),
                fallback = %kind,
                capability,
                "Unknown {capability} provider: {}. Falling back to {kind}",
                self.selection.requested()
            );
        } else {
            info!(provider = %kind, capability, "Using {kind} {capability} service");
        }

        kind
    }
}

/// Create a geocoding service in one step
///
/// # Errors
///
/// See [`GeocodingServiceFactory::create_geocoding_service`].
pub fn create_geocoding_service(
    config: &GeocodingConfig,
) -> Result<Arc<dyn GeocodingService>, GeocodingError> {
    GeocodingServiceFactory::new(config.clone()).create_geocoding_service()
}

/// Create a location search service in one step
///
/// # Errors
///
/// See [`GeocodingServiceFactory::create_location_search_service`].
pub fn create_location_search_service(
    config: &GeocodingConfig,
) -> Result<Arc<dyn LocationSearchService>, GeocodingError> {
    GeocodingServiceFactory::new(config.clone()).create_location_search_service()
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    fn config_with_provider(provider: &str) -> GeocodingConfig {
        GeocodingConfig {
            provider: provider.to_string(),
            ..GeocodingConfig::default()
        }
    }

    #[test]
    fn test_default_config_selects_openstreetmap() {
        let factory = GeocodingServiceFactory::new(GeocodingConfig::default());
        let service = factory.create_geocoding_service().unwrap();
        assert_eq!(service.provider(), GeocodingProviderKind::OpenStreetMap);
        assert!(!factory.selection().is_fallback());
    }

    #[test]
    fn test_provider_name_is_case_insensitive() {
        let mut config = config_with_provider("GOOGLE");
        config.google.api_key = Some(SecretString::from("key"));

        let factory = GeocodingServiceFactory::new(config);
        assert_eq!(
            factory.create_geocoding_service().unwrap().provider(),
            GeocodingProviderKind::Google
        );
        assert_eq!(
            factory.create_location_search_service().unwrap().provider(),
            GeocodingProviderKind::Google
        );
    }

    #[test]
    fn test_unknown_provider_falls_back() {
        for name in ["mapbox", "", "OpenStreetMaps", "bing"] {
            let factory = GeocodingServiceFactory::new(config_with_provider(name));
            assert!(factory.selection().is_fallback());
            assert_eq!(
                factory.create_geocoding_service().unwrap().provider(),
                GeocodingProviderKind::OpenStreetMap
            );
            assert_eq!(
                factory.create_location_search_service().unwrap().provider(),
                GeocodingProviderKind::OpenStreetMap
            );
        }
    }

    #[test]
    fn test_google_without_key_fails_eagerly() {
        let factory = GeocodingServiceFactory::new(config_with_provider("google"));
        assert!(matches!(
            factory.create_geocoding_service(),
            Err(GeocodingError::Configuration(_))
        ));
        assert!(matches!(
            factory.create_location_search_service(),
            Err(GeocodingError::Configuration(_))
        ));
    }

    #[test]
    fn test_openstreetmap_never_needs_key() {
        let mut config = config_with_provider("openstreetmap");
        config.google.api_key = None;
        assert!(create_geocoding_service(&config).is_ok());
        assert!(create_location_search_service(&config).is_ok());
    }
}
