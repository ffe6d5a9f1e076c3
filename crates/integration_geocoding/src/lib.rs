//! Geocoding integration for ViralTogether
//!
//! Resolves addresses to coordinates, coordinates to addresses, and free
//! text to candidate locations through one of two interchangeable providers:
//! [Nominatim/OpenStreetMap](https://nominatim.openstreetmap.org) (the
//! default, no credentials) or the
//! [Google Maps Platform](https://developers.google.com/maps) (API key
//! required).
//!
//! # Architecture
//!
//! Callers depend only on the capability traits [`GeocodingService`] and
//! [`LocationSearchService`]. [`GeocodingServiceFactory`] reads
//! [`GeocodingConfig`], picks [`NominatimGeocodingClient`] or
//! [`GoogleMapsGeocodingClient`], and hands back a shared trait object.
//! Unknown provider names fall back to OpenStreetMap with a warning.
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_geocoding::{GeocodingConfig, GeocodingServiceFactory};
//!
//! let factory = GeocodingServiceFactory::new(GeocodingConfig::default());
//! let geocoder = factory.create_geocoding_service()?;
//!
//! if let Some(hit) = geocoder.geocode_address("Berlin", Some("DE")).await {
//!     println!("{} -> {}, {}", hit.display_name(), hit.latitude(), hit.longitude());
//! }
//! ```

mod config;
mod error;
mod factory;
mod google_maps;
mod http;
mod nominatim;
mod provider;
mod service;

pub use config::{DEFAULT_USER_AGENT, GeocodingConfig, GoogleMapsConfig, NominatimConfig};
pub use error::GeocodingError;
pub use factory::{
    GeocodingServiceFactory, create_geocoding_service, create_location_search_service,
};
pub use google_maps::GoogleMapsGeocodingClient;
pub use nominatim::NominatimGeocodingClient;
pub use provider::{GeocodingProviderKind, ProviderSelection};
pub use service::{GeocodingService, LocationSearchService};
