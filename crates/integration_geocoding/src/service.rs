//! Capability traits implemented by every geocoding provider
//!
//! Each capability comes in two forms. The `try_*` methods return a tagged
//! result: `Ok(Some(_))` for a match, `Ok(None)` when the provider has no
//! candidate, and `Err(_)` when the call itself failed. The plain methods
//! keep the lenient contract used by location endpoints: failures are
//! logged once and reported as "no result".

use std::fmt;

use async_trait::async_trait;
use domain::{GeocodeResult, ReverseGeocodeResult};
use tracing::error;

use crate::{GeocodingError, GeocodingProviderKind};

/// Address-to-coordinate and coordinate-to-address resolution
#[async_trait]
pub trait GeocodingService: Send + Sync + fmt::Debug {
    /// Which backend serves this instance
    fn provider(&self) -> GeocodingProviderKind;

    /// Resolve a free-text address, optionally restricted to a country
    async fn try_geocode_address(
        &self,
        address: &str,
        country_code: Option<&str>,
    ) -> Result<Option<GeocodeResult>, GeocodingError>;

    /// Resolve coordinates to an address description
    async fn try_reverse_geocode(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<ReverseGeocodeResult>, GeocodingError>;

    /// Like [`Self::try_geocode_address`], but provider failures are logged
    /// and reported as `None`
    async fn geocode_address(
        &self,
        address: &str,
        country_code: Option<&str>,
    ) -> Option<GeocodeResult> {
        self.try_geocode_address(address, country_code)
            .await
            .unwrap_or_else(|e| {
                error!(provider = %self.provider(), error = %e, "Geocoding failed");
                None
            })
    }

    /// Like [`Self::try_reverse_geocode`], but provider failures are logged
    /// and reported as `None`
    async fn reverse_geocode(&self, latitude: f64, longitude: f64) -> Option<ReverseGeocodeResult> {
        self.try_reverse_geocode(latitude, longitude)
            .await
            .unwrap_or_else(|e| {
                error!(provider = %self.provider(), error = %e, "Reverse geocoding failed");
                None
            })
    }
}

/// Free-text location search
#[async_trait]
pub trait LocationSearchService: Send + Sync + fmt::Debug {
    /// Which backend serves this instance
    fn provider(&self) -> GeocodingProviderKind;

    /// Search locations by name, in provider relevance order, at most `limit` entries
    async fn try_search_locations(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<GeocodeResult>, GeocodingError>;

    /// Like [`Self::try_search_locations`], but provider failures are logged
    /// and reported as an empty list
    async fn search_locations(&self, query: &str, limit: usize) -> Vec<GeocodeResult> {
        self.try_search_locations(query, limit)
            .await
            .unwrap_or_else(|e| {
                error!(provider = %self.provider(), error = %e, "Location search failed");
                Vec::new()
            })
    }
}
