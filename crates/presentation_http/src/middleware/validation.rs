//! Request validation
//!
//! Provides `ValidatedJson` and `ValidatedQuery` extractors that validate
//! request bodies and query strings using the validator crate.

use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts, Query, Request,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::error::ErrorResponse;

/// Validation error type
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid JSON: {0}")]
    JsonError(#[from] JsonRejection),
    #[error("Invalid query string: {0}")]
    QueryError(#[from] QueryRejection),
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::JsonError(e) => (StatusCode::BAD_REQUEST, e.body_text()),
            Self::QueryError(e) => (StatusCode::BAD_REQUEST, e.body_text()),
            Self::ValidationFailed(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        };

        let body = ErrorResponse {
            error: message,
            code: "validation_error".to_string(),
            details: None,
        };

        (status, Json(body)).into_response()
    }
}

/// Flatten field errors into `field: message` pairs, sorted by field name
fn describe(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                format!(
                    "{field}: {}",
                    error
                        .message
                        .as_ref()
                        .map_or_else(|| error.code.to_string(), ToString::to_string)
                )
            })
        })
        .collect();
    messages.sort();
    messages.join("; ")
}

/// A JSON extractor that also validates the request body
///
/// Malformed JSON, missing fields and failed field rules are all reported
/// as 400 with code `validation_error`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidationError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;

        value
            .validate()
            .map_err(|e| ValidationError::ValidationFailed(describe(&e)))?;

        Ok(Self(value))
    }
}

/// Query-string counterpart of [`ValidatedJson`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidationError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;

        value
            .validate()
            .map_err(|e| ValidationError::ValidationFailed(describe(&e)))?;

        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::Body,
        routing::{get, post},
    };
    use serde::Deserialize;
    use tower::ServiceExt;
    use validator::Validate;

    use super::*;

    #[derive(Debug, Deserialize, Validate)]
    struct TestRequest {
        #[validate(length(min = 1, message = "must not be empty"))]
        address: String,
        #[validate(range(min = -90.0, max = 90.0, message = "must be between -90 and 90"))]
        #[serde(default)]
        latitude: f64,
    }

    #[derive(Debug, Deserialize, Validate)]
    struct TestQuery {
        #[validate(length(min = 1, message = "must not be empty"))]
        name: String,
        #[validate(range(min = 1, max = 50, message = "must be between 1 and 50"))]
        limit: Option<usize>,
    }

    async fn test_handler(ValidatedJson(req): ValidatedJson<TestRequest>) -> String {
        req.address
    }

    async fn query_handler(ValidatedQuery(query): ValidatedQuery<TestQuery>) -> String {
        query.name
    }

    fn create_test_app() -> Router {
        Router::new()
            .route("/test", post(test_handler))
            .route("/query", get(query_handler))
    }

    async fn get_query(uri: &str) -> Response {
        create_test_app()
            .oneshot(
                axum::http::Request::builder()
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn error_body(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn post_json(body: &'static str) -> Response {
        create_test_app()
            .oneshot(
                axum::http::Request::builder()
                    .method("POST")
                    .uri("/test")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn valid_request_passes() {
        let response = post_json(r#"{"address": "Berlin", "latitude": 52.5}"#).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn empty_field_rejected() {
        let response = post_json(r#"{"address": ""}"#).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn out_of_range_rejected() {
        let response = post_json(r#"{"address": "Berlin", "latitude": 120.0}"#).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_field_rejected() {
        let response = post_json(r#"{"latitude": 10.0}"#).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn invalid_json_rejected() {
        let response = post_json(r#"{"address": not valid json}"#).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn valid_query_passes() {
        let response = get_query("/query?name=Paris&limit=5").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unparsable_query_is_json_error() {
        let response = get_query("/query?name=Paris&limit=ten").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = error_body(response).await;
        assert_eq!(body["code"], "validation_error");
        assert!(body["error"].as_str().unwrap().contains("limit"));
    }

    #[tokio::test]
    async fn missing_query_field_is_json_error() {
        let response = get_query("/query").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_body(response).await["code"], "validation_error");
    }

    #[tokio::test]
    async fn query_rules_are_checked() {
        let response = get_query("/query?name=Paris&limit=0").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = error_body(response).await;
        assert_eq!(body["error"], "limit: must be between 1 and 50");
    }

    #[tokio::test]
    async fn malformed_json_body_is_json_error() {
        let response = post_json(r#"{"address": not valid json}"#).await;
        assert_eq!(error_body(response).await["code"], "validation_error");
    }

    #[test]
    fn describe_lists_every_field() {
        let request = TestRequest {
            address: String::new(),
            latitude: -100.0,
        };
        let message = describe(&request.validate().unwrap_err());
        assert_eq!(
            message,
            "address: must not be empty; latitude: must be between -90 and 90"
        );
    }
}
