//! Location lookup handlers
//!
//! Geocoding, reverse geocoding and free-text location search.

use axum::{Json, extract::State};
use domain::{CountryCode, GeocodeResult, ReverseGeocodeResult};
use serde::Deserialize;
use tracing::{debug, instrument};
use validator::{Validate, ValidationError};

use crate::{
    error::ApiError,
    middleware::{ValidatedJson, ValidatedQuery},
    state::AppState,
};

/// Request body for `POST /v1/geocode`
#[derive(Debug, Deserialize, Validate)]
pub struct GeocodeRequest {
    /// Free-text address
    #[validate(length(min = 1, message = "must not be empty"))]
    pub address: String,
    /// Optional ISO 3166-1 alpha-2 restriction
    #[validate(length(equal = 2, message = "must be a two-letter country code"))]
    pub country_code: Option<String>,
}

/// Request body for `POST /v1/reverse-geocode`
#[derive(Debug, Deserialize, Validate)]
pub struct ReverseGeocodeRequest {
    #[validate(range(min = -90.0, max = 90.0, message = "must be between -90 and 90"))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0, message = "must be between -180 and 180"))]
    pub longitude: f64,
}

/// Query string for `GET /v1/locations/search`
#[derive(Debug, Deserialize, Validate)]
pub struct SearchQuery {
    /// Free-text query
    #[validate(length(min = 1, message = "must not be empty"))]
    pub query: String,
    /// Accepted for compatibility with existing clients; search is not
    /// restricted by country
    #[validate(custom(function = "validate_country_code"))]
    pub country_code: Option<String>,
    /// Maximum number of results (1-50, default 10)
    #[validate(range(min = 1, max = 50, message = "must be between 1 and 50"))]
    pub limit: Option<usize>,
}

fn validate_country_code(code: &str) -> Result<(), ValidationError> {
    CountryCode::parse(code).map(|_| ()).map_err(|_| {
        ValidationError::new("country_code")
            .with_message("must be a two-letter country code".into())
    })
}

/// Resolve an address to coordinates
#[instrument(skip_all)]
pub async fn geocode(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<GeocodeRequest>,
) -> Result<Json<GeocodeResult>, ApiError> {
    let result = state
        .location_service
        .geocode(&request.address, request.country_code.as_deref())
        .await?
        .ok_or_else(|| ApiError::NotFound("No location found for this address".to_string()))?;

    debug!(display_name = %result.display_name(), "Address geocoded");
    Ok(Json(result))
}

/// Resolve coordinates to an address
#[instrument(skip_all, fields(latitude = request.latitude, longitude = request.longitude))]
pub async fn reverse_geocode(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ReverseGeocodeRequest>,
) -> Result<Json<ReverseGeocodeResult>, ApiError> {
    let result = state
        .location_service
        .reverse_geocode(request.latitude, request.longitude)
        .await?
        .ok_or_else(|| ApiError::NotFound("No address found for these coordinates".to_string()))?;

    Ok(Json(result))
}

/// Search locations by free text
#[instrument(skip_all, fields(query = %params.query, limit = ?params.limit))]
pub async fn search_locations(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<SearchQuery>,
) -> Result<Json<Vec<GeocodeResult>>, ApiError> {
    let results = state
        .location_service
        .search(&params.query, params.limit)
        .await?;

    debug!(count = results.len(), "Locations found");
    Ok(Json(results))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geocode_request_validation() {
        let ok = GeocodeRequest {
            address: "Berlin".to_string(),
            country_code: Some("DE".to_string()),
        };
        assert!(ok.validate().is_ok());

        let empty = GeocodeRequest {
            address: String::new(),
            country_code: None,
        };
        assert!(empty.validate().is_err());

        let bad_country = GeocodeRequest {
            address: "Berlin".to_string(),
            country_code: Some("DEU".to_string()),
        };
        assert!(bad_country.validate().is_err());
    }

    #[test]
    fn reverse_request_validation() {
        let ok = ReverseGeocodeRequest {
            latitude: -90.0,
            longitude: 180.0,
        };
        assert!(ok.validate().is_ok());

        let bad = ReverseGeocodeRequest {
            latitude: 91.0,
            longitude: 0.0,
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn search_query_limit_is_optional() {
        let query: SearchQuery = serde_json::from_str(r#"{"query": "Paris"}"#).unwrap();
        assert_eq!(query.query, "Paris");
        assert!(query.limit.is_none());
        assert!(query.validate().is_ok());
    }

    #[test]
    fn search_query_validation() {
        let query = |country_code: Option<&str>, limit: Option<usize>| SearchQuery {
            query: "Paris".to_string(),
            country_code: country_code.map(ToString::to_string),
            limit,
        };

        assert!(query(Some("fr"), Some(50)).validate().is_ok());
        assert!(query(Some("xyz"), None).validate().is_err());
        assert!(query(Some("1A"), None).validate().is_err());
        assert!(query(None, Some(0)).validate().is_err());
        assert!(query(None, Some(51)).validate().is_err());
    }
}
