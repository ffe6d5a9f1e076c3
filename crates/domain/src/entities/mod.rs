//! Domain entities produced by location lookups

mod geocode_result;

pub use geocode_result::{AddressComponents, GeocodeResult, ReverseGeocodeResult};
