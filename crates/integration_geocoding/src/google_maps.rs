//! Google Maps geocoding client
//!
//! Uses the Geocoding API for forward and reverse lookups and the Places
//! Autocomplete + Details APIs for location search. Autocomplete returns
//! place references without coordinates, so each kept prediction costs one
//! extra details request.

use async_trait::async_trait;
use domain::{AddressComponents, GeocodeResult, ReverseGeocodeResult};
use futures::future::join_all;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::config::GoogleMapsConfig;
use crate::http::{build_client, get_json};
use crate::{GeocodingError, GeocodingProviderKind, GeocodingService, LocationSearchService};

const GEOCODE_PATH: &str = "/maps/api/geocode/json";
const AUTOCOMPLETE_PATH: &str = "/maps/api/place/autocomplete/json";
const DETAILS_PATH: &str = "/maps/api/place/details/json";
const DETAILS_FIELDS: &str = "geometry,formatted_address,address_components";

/// Google Maps-based geocoding and location search client
#[derive(Clone)]
pub struct GoogleMapsGeocodingClient {
    client: Client,
    api_key: SecretString,
    base_url: String,
    timeout_secs: u64,
}

impl std::fmt::Debug for GoogleMapsGeocodingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleMapsGeocodingClient")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish_non_exhaustive()
    }
}

impl GoogleMapsGeocodingClient {
    /// Create a new Google Maps client
    ///
    /// # Errors
    ///
    /// Returns `GeocodingError::Configuration` if no API key is configured
    /// or the HTTP client cannot be created.
    pub fn new(config: &GoogleMapsConfig) -> Result<Self, GeocodingError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.expose_secret().trim().is_empty())
            .ok_or_else(|| {
                GeocodingError::Configuration("Google Maps API key is required".to_string())
            })?;

        let client = build_client(config.timeout_secs, None)?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout_secs: config.timeout_secs,
        })
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        mut params: Vec<(&'static str, String)>,
    ) -> Result<T, GeocodingError> {
        params.push(("key", self.api_key.expose_secret().to_string()));
        let url = format!("{}{path}", self.base_url);

        get_json(&self.client, &url, &params, self.timeout_secs).await
    }

    /// Run a geocode request and return the first result, if any
    async fn geocode(
        &self,
        params: Vec<(&'static str, String)>,
    ) -> Result<Option<GooglePlace>, GeocodingError> {
        let response: GeocodeResponse = self.get(GEOCODE_PATH, params).await?;

        if !check_status(&response.status, response.error_message)? {
            return Ok(None);
        }

        Ok(response.results.into_iter().next())
    }

    /// Fetch coordinates and address components for one place reference
    async fn place_details(&self, place_id: &str) -> Result<Option<GeocodeResult>, GeocodingError> {
        let params = vec![
            ("place_id", place_id.to_string()),
            ("fields", DETAILS_FIELDS.to_string()),
        ];

        let response: DetailsResponse = self.get(DETAILS_PATH, params).await?;

        if !check_status(&response.status, response.error_message)? {
            return Ok(None);
        }

        Ok(response.result.map(GooglePlace::into_result))
    }
}

#[async_trait]
impl GeocodingService for GoogleMapsGeocodingClient {
    fn provider(&self) -> GeocodingProviderKind {
        GeocodingProviderKind::Google
    }

    #[instrument(skip(self), fields(provider = "google"))]
    async fn try_geocode_address(
        &self,
        address: &str,
        country_code: Option<&str>,
    ) -> Result<Option<GeocodeResult>, GeocodingError> {
        let mut params = vec![("address", address.to_string())];
        if let Some(code) = country_code {
            params.push(("components", format!("country:{code}")));
        }

        debug!("Geocoding address");

        Ok(self.geocode(params).await?.map(GooglePlace::into_result))
    }

    #[instrument(skip(self), fields(provider = "google"))]
    async fn try_reverse_geocode(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<ReverseGeocodeResult>, GeocodingError> {
        let params = vec![("latlng", format!("{latitude},{longitude}"))];

        debug!("Reverse geocoding");

        Ok(self
            .geocode(params)
            .await?
            .map(|place| place.into_result().into_reverse()))
    }
}

#[async_trait]
impl LocationSearchService for GoogleMapsGeocodingClient {
    fn provider(&self) -> GeocodingProviderKind {
        GeocodingProviderKind::Google
    }

    #[instrument(skip(self), fields(provider = "google"))]
    async fn try_search_locations(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<GeocodeResult>, GeocodingError> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let response: AutocompleteResponse = self
            .get(AUTOCOMPLETE_PATH, vec![("input", query.to_string())])
            .await?;

        if !check_status(&response.status, response.error_message)? {
            return Ok(Vec::new());
        }

        let predictions: Vec<Prediction> = response.predictions.into_iter().take(limit).collect();
        debug!(count = predictions.len(), "Fetching place details");

        // join_all keeps autocomplete order
        let details = join_all(
            predictions
                .iter()
                .map(|prediction| self.place_details(&prediction.place_id)),
        )
        .await;

        let results: Vec<GeocodeResult> = predictions
            .iter()
            .zip(details)
            .filter_map(|(prediction, detail)| match detail {
                Ok(Some(result)) => Some(result),
                Ok(None) => {
                    debug!(place_id = %prediction.place_id, "Place details not found");
                    None
                },
                Err(e) => {
                    warn!(
                        place_id = %prediction.place_id,
                        description = prediction.description.as_deref().unwrap_or_default(),
                        error = %e,
                        "Skipping prediction, place details failed"
                    );
                    None
                },
            })
            .collect();

        debug!(count = results.len(), "Locations found");
        Ok(results)
    }
}

/// Interpret a Google `status` field
///
/// `Ok(true)` means results are present, `Ok(false)` means the provider
/// found nothing; every other status is an error.
fn check_status(status: &str, error_message: Option<String>) -> Result<bool, GeocodingError> {
    match status {
        "OK" => Ok(true),
        "ZERO_RESULTS" | "NOT_FOUND" => Ok(false),
        other => Err(GeocodingError::ProviderStatus {
            status: other.to_string(),
            message: error_message.unwrap_or_else(|| "no error message".to_string()),
        }),
    }
}

/// Map Google `address_components` onto the common address shape
///
/// Every component is checked against every rule since one component can
/// carry several types (e.g. "country" + "political"). For the city,
/// `locality` wins over `postal_town`, which wins over `sublocality`.
fn extract_address_components(components: &[GoogleAddressComponent]) -> AddressComponents {
    let mut locality = None;
    let mut postal_town = None;
    let mut sublocality = None;
    let mut region = None;
    let mut country = None;
    let mut country_code = None;
    let mut postcode = None;

    for component in components {
        let has = |kind: &str| component.types.iter().any(|t| t == kind);

        if has("locality") && locality.is_none() {
            locality = Some(component.long_name.clone());
        }
        if has("postal_town") && postal_town.is_none() {
            postal_town = Some(component.long_name.clone());
        }
        if (has("sublocality") || has("sublocality_level_1")) && sublocality.is_none() {
            sublocality = Some(component.long_name.clone());
        }
        if has("administrative_area_level_1") && region.is_none() {
            region = Some(component.long_name.clone());
        }
        if has("country") && country.is_none() {
            country = Some(component.long_name.clone());
            country_code = Some(component.short_name.clone());
        }
        if has("postal_code") && postcode.is_none() {
            postcode = Some(component.long_name.clone());
        }
    }

    AddressComponents::new()
        .with_city(locality.or(postal_town).or(sublocality))
        .with_region(region)
        .with_country(country)
        .with_postcode(postcode)
        .with_country_code(country_code.as_deref())
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GooglePlace>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AutocompleteResponse {
    status: String,
    #[serde(default)]
    predictions: Vec<Prediction>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Prediction {
    place_id: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    status: String,
    result: Option<GooglePlace>,
    error_message: Option<String>,
}

/// Shared shape of geocode results and place details
#[derive(Debug, Deserialize)]
struct GooglePlace {
    formatted_address: String,
    geometry: Geometry,
    #[serde(default)]
    address_components: Vec<GoogleAddressComponent>,
}

impl GooglePlace {
    fn into_result(self) -> GeocodeResult {
        GeocodeResult::new(
            self.geometry.location.lat,
            self.geometry.location.lng,
            self.formatted_address,
            extract_address_components(&self.address_components),
        )
    }
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct GoogleAddressComponent {
    long_name: String,
    short_name: String,
    #[serde(default)]
    types: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component(long: &str, short: &str, types: &[&str]) -> GoogleAddressComponent {
        GoogleAddressComponent {
            long_name: long.to_string(),
            short_name: short.to_string(),
            types: types.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn test_new_requires_api_key() {
        let err = GoogleMapsGeocodingClient::new(&GoogleMapsConfig::default()).unwrap_err();
        assert!(matches!(err, GeocodingError::Configuration(_)));
    }

    #[test]
    fn test_new_rejects_blank_api_key() {
        let config = GoogleMapsConfig {
            api_key: Some(SecretString::from("   ")),
            ..GoogleMapsConfig::default()
        };
        assert!(GoogleMapsGeocodingClient::new(&config).is_err());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = GoogleMapsConfig {
            api_key: Some(SecretString::from("AIza-secret")),
            ..GoogleMapsConfig::default()
        };
        let client = GoogleMapsGeocodingClient::new(&config).unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("AIza-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_extract_full_address() {
        let components = vec![
            component("1600", "1600", &["street_number"]),
            component("Mountain View", "Mountain View", &["locality", "political"]),
            component(
                "California",
                "CA",
                &["administrative_area_level_1", "political"],
            ),
            component("United States", "US", &["country", "political"]),
            component("94043", "94043", &["postal_code"]),
        ];

        let address = extract_address_components(&components);
        assert_eq!(address.city(), Some("Mountain View"));
        assert_eq!(address.region(), Some("California"));
        assert_eq!(address.country(), Some("United States"));
        assert_eq!(address.postcode(), Some("94043"));
        assert_eq!(address.country_code().map(|c| c.as_str()), Some("US"));
    }

    #[test]
    fn test_city_prefers_locality_over_sublocality() {
        let components = vec![
            component("Brooklyn", "Brooklyn", &["sublocality_level_1", "sublocality"]),
            component("New York", "New York", &["locality", "political"]),
        ];
        assert_eq!(extract_address_components(&components).city(), Some("New York"));
    }

    #[test]
    fn test_city_falls_back_to_postal_town_then_sublocality() {
        let components = vec![
            component("Camden", "Camden", &["sublocality"]),
            component("London", "London", &["postal_town"]),
        ];
        assert_eq!(extract_address_components(&components).city(), Some("London"));

        let components = vec![component("Shibuya", "Shibuya", &["sublocality_level_1"])];
        assert_eq!(extract_address_components(&components).city(), Some("Shibuya"));
    }

    #[test]
    fn test_no_components_yield_absent_fields() {
        assert_eq!(extract_address_components(&[]), AddressComponents::default());
    }

    #[test]
    fn test_check_status() {
        assert!(check_status("OK", None).unwrap());
        assert!(!check_status("ZERO_RESULTS", None).unwrap());

        let err = check_status("REQUEST_DENIED", Some("The provided API key is invalid.".into()))
            .unwrap_err();
        match err {
            GeocodingError::ProviderStatus { status, message } => {
                assert_eq!(status, "REQUEST_DENIED");
                assert!(message.contains("API key"));
            },
            other => unreachable!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_geocode_response_parsing() {
        let json = r#"{
            "status": "OK",
            "results": [{
                "formatted_address": "10 Downing St, London SW1A 2AA, UK",
                "geometry": {"location": {"lat": 51.5033635, "lng": -0.1276248}},
                "address_components": [
                    {"long_name": "London", "short_name": "London", "types": ["postal_town"]},
                    {"long_name": "England", "short_name": "England", "types": ["administrative_area_level_1", "political"]},
                    {"long_name": "United Kingdom", "short_name": "GB", "types": ["country", "political"]},
                    {"long_name": "SW1A 2AA", "short_name": "SW1A 2AA", "types": ["postal_code"]}
                ]
            }]
        }"#;
        let response: GeocodeResponse = serde_json::from_str(json).unwrap();
        let result = response.results.into_iter().next().unwrap().into_result();

        assert!((result.latitude() - 51.503_363_5).abs() < 1e-9);
        assert_eq!(result.display_name(), "10 Downing St, London SW1A 2AA, UK");
        assert_eq!(result.address().city(), Some("London"));
        assert_eq!(result.address().postcode(), Some("SW1A 2AA"));
        assert_eq!(
            result.address().country_code().map(|c| c.as_str()),
            Some("GB")
        );
    }

    #[test]
    fn test_zero_results_response_parsing() {
        let response: GeocodeResponse =
            serde_json::from_str(r#"{"status": "ZERO_RESULTS", "results": []}"#).unwrap();
        assert!(!check_status(&response.status, response.error_message).unwrap());
    }
}
