//! Nominatim geocoding client
//!
//! Converts free-form address strings to geographic coordinates and back
//! using the [Nominatim](https://nominatim.openstreetmap.org) API
//! (OpenStreetMap). A single `/search` request returns coordinates, so
//! location search needs no follow-up calls.

use async_trait::async_trait;
use domain::{AddressComponents, GeocodeResult, ReverseGeocodeResult};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::config::NominatimConfig;
use crate::http::{build_client, get_json};
use crate::{GeocodingError, GeocodingProviderKind, GeocodingService, LocationSearchService};

/// Nominatim-based geocoding and location search client
#[derive(Debug, Clone)]
pub struct NominatimGeocodingClient {
    client: Client,
    config: NominatimConfig,
}

impl NominatimGeocodingClient {
    /// Create a new Nominatim geocoding client
    ///
    /// No credentials are needed; only the HTTP client can fail to build.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &NominatimConfig) -> Result<Self, GeocodingError> {
        let client = build_client(config.timeout_secs, Some(&config.user_agent))?;

        Ok(Self {
            client,
            config: NominatimConfig {
                base_url: config.base_url.trim_end_matches('/').to_string(),
                ..config.clone()
            },
        })
    }

    fn search_params(
        query: &str,
        limit: usize,
        country_code: Option<&str>,
    ) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("q", query.to_string()),
            ("format", "json".to_string()),
            ("limit", limit.to_string()),
            ("addressdetails", "1".to_string()),
        ];

        if let Some(code) = country_code {
            params.push(("countrycodes", code.to_lowercase()));
        }

        params
    }

    async fn search(
        &self,
        query: &str,
        limit: usize,
        country_code: Option<&str>,
    ) -> Result<Vec<NominatimPlace>, GeocodingError> {
        let url = format!("{}/search", self.config.base_url);
        let params = Self::search_params(query, limit, country_code);

        get_json(&self.client, &url, &params, self.config.timeout_secs).await
    }
}

#[async_trait]
impl GeocodingService for NominatimGeocodingClient {
    fn provider(&self) -> GeocodingProviderKind {
        GeocodingProviderKind::OpenStreetMap
    }

    #[instrument(skip(self), fields(provider = "openstreetmap"))]
    async fn try_geocode_address(
        &self,
        address: &str,
        country_code: Option<&str>,
    ) -> Result<Option<GeocodeResult>, GeocodingError> {
        debug!("Geocoding address");

        let places = self.search(address, 1, country_code).await?;

        places
            .into_iter()
            .next()
            .map(NominatimPlace::into_result)
            .transpose()
    }

    #[instrument(skip(self), fields(provider = "openstreetmap"))]
    async fn try_reverse_geocode(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<ReverseGeocodeResult>, GeocodingError> {
        let url = format!("{}/reverse", self.config.base_url);
        let params = [
            ("lat", latitude.to_string()),
            ("lon", longitude.to_string()),
            ("format", "json".to_string()),
            ("addressdetails", "1".to_string()),
        ];

        debug!("Reverse geocoding");

        let response: NominatimReverse =
            get_json(&self.client, &url, &params, self.config.timeout_secs).await?;

        match response {
            NominatimReverse::NotFound { error } => {
                debug!(%error, "No address at coordinates");
                Ok(None)
            },
            NominatimReverse::Found(place) => Ok(Some(ReverseGeocodeResult::new(
                place.display_name,
                place.address.into_components(),
            ))),
        }
    }
}

#[async_trait]
impl LocationSearchService for NominatimGeocodingClient {
    fn provider(&self) -> GeocodingProviderKind {
        GeocodingProviderKind::OpenStreetMap
    }

    #[instrument(skip(self), fields(provider = "openstreetmap"))]
    async fn try_search_locations(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<GeocodeResult>, GeocodingError> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let places = self.search(query, limit, None).await?;
        let results = places
            .into_iter()
            .take(limit)
            .map(NominatimPlace::into_result)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = results.len(), "Locations found");
        Ok(results)
    }
}

/// Raw Nominatim search record
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: String,
    #[serde(default)]
    address: NominatimAddress,
}

impl NominatimPlace {
    fn into_result(self) -> Result<GeocodeResult, GeocodingError> {
        let latitude: f64 = self
            .lat
            .trim()
            .parse()
            .map_err(|_| GeocodingError::ParseError(format!("Invalid latitude: {}", self.lat)))?;
        let longitude: f64 = self
            .lon
            .trim()
            .parse()
            .map_err(|_| GeocodingError::ParseError(format!("Invalid longitude: {}", self.lon)))?;

        Ok(GeocodeResult::new(
            latitude,
            longitude,
            self.display_name,
            self.address.into_components(),
        ))
    }
}

/// Raw Nominatim `/reverse` response
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NominatimReverse {
    NotFound { error: String },
    Found(NominatimReversePlace),
}

#[derive(Debug, Deserialize)]
struct NominatimReversePlace {
    display_name: String,
    #[serde(default)]
    address: NominatimAddress,
}

/// The `address` object returned with `addressdetails=1`
#[derive(Debug, Default, Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    municipality: Option<String>,
    state: Option<String>,
    country: Option<String>,
    postcode: Option<String>,
    country_code: Option<String>,
}

impl NominatimAddress {
    /// Map Nominatim keys onto the common address shape
    ///
    /// Settlements are tagged by size, so the city falls back through
    /// town, village and municipality.
    fn into_components(self) -> AddressComponents {
        let city = [self.city, self.town, self.village, self.municipality]
            .into_iter()
            .flatten()
            .find(|name| !name.trim().is_empty());

        AddressComponents::new()
            .with_city(city)
            .with_region(self.state)
            .with_country(self.country)
            .with_postcode(self.postcode)
            .with_country_code(self.country_code.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_params_include_required_keys() {
        let params = NominatimGeocodingClient::search_params("Paris", 1, Some("FR"));
        assert!(params.contains(&("q", "Paris".to_string())));
        assert!(params.contains(&("format", "json".to_string())));
        assert!(params.contains(&("limit", "1".to_string())));
        assert!(params.contains(&("addressdetails", "1".to_string())));
        assert!(params.contains(&("countrycodes", "fr".to_string())));
    }

    #[test]
    fn test_search_params_without_country() {
        let params = NominatimGeocodingClient::search_params("Paris", 10, None);
        assert!(!params.iter().any(|(k, _)| *k == "countrycodes"));
    }

    #[test]
    fn test_place_parsing() {
        let json = r#"[{
            "lat": "48.8588897",
            "lon": "2.3200410",
            "display_name": "Paris, Île-de-France, France métropolitaine, France",
            "address": {
                "city": "Paris",
                "state": "Île-de-France",
                "country": "France",
                "postcode": "75001",
                "country_code": "fr"
            }
        }]"#;
        let places: Vec<NominatimPlace> = serde_json::from_str(json).unwrap();
        let result = places.into_iter().next().unwrap().into_result().unwrap();

        assert!((result.latitude() - 48.858_889_7).abs() < 1e-9);
        assert!((result.longitude() - 2.320_041).abs() < 1e-9);
        assert_eq!(result.address().city(), Some("Paris"));
        assert_eq!(result.address().region(), Some("Île-de-France"));
        assert_eq!(result.address().postcode(), Some("75001"));
        assert_eq!(
            result.address().country_code().map(|c| c.as_str()),
            Some("FR")
        );
    }

    #[test]
    fn test_city_falls_back_to_town_then_village() {
        let town: NominatimAddress =
            serde_json::from_str(r#"{"town": "Hallstatt", "village": "Lahn"}"#).unwrap();
        assert_eq!(town.into_components().city(), Some("Hallstatt"));

        let village: NominatimAddress =
            serde_json::from_str(r#"{"village": "Giethoorn"}"#).unwrap();
        assert_eq!(village.into_components().city(), Some("Giethoorn"));

        let blank_city: NominatimAddress =
            serde_json::from_str(r#"{"city": "", "town": "Bled"}"#).unwrap();
        assert_eq!(blank_city.into_components().city(), Some("Bled"));
    }

    #[test]
    fn test_missing_address_details_yield_absent_fields() {
        let json = r#"{"lat": "0", "lon": "0", "display_name": "Somewhere"}"#;
        let place: NominatimPlace = serde_json::from_str(json).unwrap();
        let result = place.into_result().unwrap();
        assert_eq!(result.address(), &AddressComponents::default());
    }

    #[test]
    fn test_invalid_coordinate_is_parse_error() {
        let json = r#"{"lat": "north", "lon": "2.3", "display_name": "Broken"}"#;
        let place: NominatimPlace = serde_json::from_str(json).unwrap();
        assert!(matches!(
            place.into_result(),
            Err(GeocodingError::ParseError(_))
        ));
    }

    #[test]
    fn test_reverse_error_body_is_not_found() {
        let response: NominatimReverse =
            serde_json::from_str(r#"{"error": "Unable to geocode"}"#).unwrap();
        assert!(matches!(response, NominatimReverse::NotFound { .. }));
    }

    #[test]
    fn test_reverse_place_parsing() {
        let json = r#"{
            "lat": "51.5",
            "lon": "-0.12",
            "display_name": "Westminster, London, Greater London, England, United Kingdom",
            "address": {"city": "London", "state": "England", "country_code": "gb"}
        }"#;
        let response: NominatimReverse = serde_json::from_str(json).unwrap();
        match response {
            NominatimReverse::Found(place) => {
                let address = place.address.into_components();
                assert_eq!(address.city(), Some("London"));
                assert_eq!(address.country_code().map(|c| c.as_str()), Some("GB"));
            },
            NominatimReverse::NotFound { .. } => unreachable!("expected a place"),
        }
    }

    #[test]
    fn test_client_builds_without_credentials() {
        assert!(NominatimGeocodingClient::new(&NominatimConfig::default()).is_ok());
    }
}
