//! Geocoding port
//!
//! Defines the interface for address and coordinate lookups.

use async_trait::async_trait;
use domain::{CountryCode, GeoLocation, GeocodeResult, ReverseGeocodeResult};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for geocoding operations
///
/// Implementations distinguish "nothing found" (`Ok(None)` / empty list)
/// from a failed provider call (`Err`).
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GeocodingPort: Send + Sync {
    /// Resolve a free-text address, optionally restricted to one country
    async fn geocode(
        &self,
        address: &str,
        country_code: Option<CountryCode>,
    ) -> Result<Option<GeocodeResult>, ApplicationError>;

    /// Resolve a validated location to an address
    async fn reverse_geocode(
        &self,
        location: GeoLocation,
    ) -> Result<Option<ReverseGeocodeResult>, ApplicationError>;

    /// Search locations by name, at most `limit` entries in relevance order
    async fn search(&self, query: &str, limit: usize)
    -> Result<Vec<GeocodeResult>, ApplicationError>;

    /// Name of the provider serving requests
    fn provider_name(&self) -> &'static str;

    /// True when the configured provider was not recognized and a fallback
    /// is serving requests
    fn is_degraded(&self) -> bool;
}
