//! Shared HTTP plumbing for provider clients

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::GeocodingError;

/// Build a client that keeps no idle connections between calls
pub(crate) fn build_client(
    timeout_secs: u64,
    user_agent: Option<&str>,
) -> Result<Client, GeocodingError> {
    let mut builder = Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .pool_max_idle_per_host(0);

    if let Some(user_agent) = user_agent {
        builder = builder.user_agent(user_agent);
    }

    builder
        .build()
        .map_err(|e| GeocodingError::Configuration(format!("HTTP client: {e}")))
}

/// Issue a GET request and decode the JSON body
///
/// Non-success statuses and undecodable bodies are errors.
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &Client,
    url: &str,
    params: &[(&str, String)],
    timeout_secs: u64,
) -> Result<T, GeocodingError> {
    let response = client
        .get(url)
        .query(params)
        .send()
        .await
        .map_err(|e| GeocodingError::from_transport(e, timeout_secs))?;

    let status = response.status();
    if !status.is_success() {
        return Err(GeocodingError::RequestFailed {
            status: status.as_u16(),
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| GeocodingError::from_transport(e, timeout_secs))?;

    serde_json::from_str(&body).map_err(|e| GeocodingError::ParseError(e.to_string()))
}
