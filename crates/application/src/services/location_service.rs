//! Location use cases
//!
//! Validates caller input before any provider is contacted, then delegates
//! to the configured [`GeocodingPort`].

use std::sync::Arc;

use domain::{CountryCode, DomainError, GeoLocation, GeocodeResult, ReverseGeocodeResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::ApplicationError;
use crate::ports::GeocodingPort;

/// Number of search results returned when the caller gives no limit
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Largest accepted search limit
pub const MAX_SEARCH_LIMIT: usize = 50;

/// Provider information reported by readiness checks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeocodingStatus {
    /// Provider serving requests
    pub provider: String,
    /// The configured provider was unknown and a fallback is in use
    pub degraded: bool,
}

/// Application service for geocoding, reverse geocoding and location search
#[derive(Clone)]
pub struct LocationService {
    geocoding: Arc<dyn GeocodingPort>,
}

impl std::fmt::Debug for LocationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationService")
            .field("provider", &self.geocoding.provider_name())
            .finish()
    }
}

impl LocationService {
    /// Create a new location service
    pub fn new(geocoding: Arc<dyn GeocodingPort>) -> Self {
        Self { geocoding }
    }

    /// Resolve an address to coordinates
    ///
    /// Returns `Ok(None)` when the provider has no match.
    ///
    /// # Errors
    ///
    /// Returns a domain error for a blank address or a malformed country
    /// code, and `ExternalService` when the provider call fails.
    #[instrument(skip(self))]
    pub async fn geocode(
        &self,
        address: &str,
        country_code: Option<&str>,
    ) -> Result<Option<GeocodeResult>, ApplicationError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(DomainError::validation("address must not be empty").into());
        }

        let country_code = country_code.map(CountryCode::parse).transpose()?;

        let result = self.geocoding.geocode(address, country_code).await?;
        debug!(found = result.is_some(), "Geocode finished");
        Ok(result)
    }

    /// Resolve coordinates to an address
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCoordinates` for out-of-range values and
    /// `ExternalService` when the provider call fails.
    #[instrument(skip(self))]
    pub async fn reverse_geocode(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<ReverseGeocodeResult>, ApplicationError> {
        let location = GeoLocation::new(latitude, longitude).map_err(DomainError::from)?;

        let result = self.geocoding.reverse_geocode(location).await?;
        debug!(found = result.is_some(), "Reverse geocode finished");
        Ok(result)
    }

    /// Search locations by free text
    ///
    /// `limit` defaults to [`DEFAULT_SEARCH_LIMIT`] and must lie in
    /// `1..=MAX_SEARCH_LIMIT`.
    ///
    /// # Errors
    ///
    /// Returns a domain error for a blank query or an out-of-range limit,
    /// and `ExternalService` when the provider call fails.
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        query: &str,
        limit: Option<usize>,
    ) -> Result<Vec<GeocodeResult>, ApplicationError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(DomainError::validation("query must not be empty").into());
        }

        let limit = limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
        if !(1..=MAX_SEARCH_LIMIT).contains(&limit) {
            return Err(DomainError::validation(format!(
                "limit must be between 1 and {MAX_SEARCH_LIMIT}, got {limit}"
            ))
            .into());
        }

        let mut results = self.geocoding.search(query, limit).await?;
        results.truncate(limit);

        debug!(count = results.len(), "Search finished");
        Ok(results)
    }

    /// Provider currently serving requests
    pub fn status(&self) -> GeocodingStatus {
        GeocodingStatus {
            provider: self.geocoding.provider_name().to_string(),
            degraded: self.geocoding.is_degraded(),
        }
    }
}
