//! Application services - Use case implementations

mod location_service;

pub use location_service::{
    DEFAULT_SEARCH_LIMIT, GeocodingStatus, LocationService, MAX_SEARCH_LIMIT,
};
