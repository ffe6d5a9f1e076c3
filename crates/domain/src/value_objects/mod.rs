//! Value Objects - Immutable, identity-less domain primitives

mod country_code;
mod geo_location;

pub use country_code::CountryCode;
pub use geo_location::{GeoLocation, InvalidCoordinates};
