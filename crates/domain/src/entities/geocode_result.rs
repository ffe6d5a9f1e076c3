//! Normalized geocoding results
//!
//! Every provider maps its own response shape onto these records. A field
//! is either populated from the provider response or absent; blank strings
//! are never stored.

use serde::{Deserialize, Serialize};

use crate::value_objects::CountryCode;

/// Structured address parts shared by forward and reverse lookups
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "AddressFields")]
pub struct AddressComponents {
    city: Option<String>,
    region: Option<String>,
    country: Option<String>,
    postcode: Option<String>,
    country_code: Option<CountryCode>,
}

/// Wire form of [`AddressComponents`]; deserialization goes through the
/// builders so blank values never survive
#[derive(Deserialize)]
struct AddressFields {
    city: Option<String>,
    region: Option<String>,
    country: Option<String>,
    postcode: Option<String>,
    country_code: Option<String>,
}

impl From<AddressFields> for AddressComponents {
    fn from(fields: AddressFields) -> Self {
        Self::new()
            .with_city(fields.city)
            .with_region(fields.region)
            .with_country(fields.country)
            .with_postcode(fields.postcode)
            .with_country_code(fields.country_code.as_deref())
    }
}

impl AddressComponents {
    /// Empty set of components
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the city (blank values are dropped)
    #[must_use]
    pub fn with_city(mut self, city: Option<String>) -> Self {
        self.city = non_blank(city);
        self
    }

    /// Set the region, i.e. state or first-level administrative area
    #[must_use]
    pub fn with_region(mut self, region: Option<String>) -> Self {
        self.region = non_blank(region);
        self
    }

    /// Set the country name
    #[must_use]
    pub fn with_country(mut self, country: Option<String>) -> Self {
        self.country = non_blank(country);
        self
    }

    /// Set the postal code
    #[must_use]
    pub fn with_postcode(mut self, postcode: Option<String>) -> Self {
        self.postcode = non_blank(postcode);
        self
    }

    /// Set the country code; anything that is not two letters is dropped
    #[must_use]
    pub fn with_country_code(mut self, country_code: Option<&str>) -> Self {
        self.country_code = country_code.and_then(|c| CountryCode::parse(c).ok());
        self
    }

    #[must_use]
    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    #[must_use]
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    #[must_use]
    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    #[must_use]
    pub fn postcode(&self) -> Option<&str> {
        self.postcode.as_deref()
    }

    #[must_use]
    pub const fn country_code(&self) -> Option<&CountryCode> {
        self.country_code.as_ref()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Result of an address-to-coordinate lookup (also used for search hits)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    latitude: f64,
    longitude: f64,
    display_name: String,
    #[serde(flatten)]
    address: AddressComponents,
}

impl GeocodeResult {
    /// Create a new result
    #[must_use]
    pub fn new(
        latitude: f64,
        longitude: f64,
        display_name: impl Into<String>,
        address: AddressComponents,
    ) -> Self {
        Self {
            latitude,
            longitude,
            display_name: display_name.into(),
            address,
        }
    }

    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[must_use]
    pub const fn address(&self) -> &AddressComponents {
        &self.address
    }

    /// Drop the coordinates, keeping the address description
    #[must_use]
    pub fn into_reverse(self) -> ReverseGeocodeResult {
        ReverseGeocodeResult::new(self.display_name, self.address)
    }
}

/// Result of a coordinate-to-address lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReverseGeocodeResult {
    display_name: String,
    #[serde(flatten)]
    address: AddressComponents,
}

impl ReverseGeocodeResult {
    /// Create a new result
    #[must_use]
    pub fn new(display_name: impl Into<String>, address: AddressComponents) -> Self {
        Self {
            display_name: display_name.into(),
            address,
        }
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[must_use]
    pub const fn address(&self) -> &AddressComponents {
        &self.address
    }
}
