//! Route definitions

use axum::{
    Router,
    routing::{get, post},
};

use crate::{handlers, state::AppState};

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health and status endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        // Location API (v1)
        .route("/v1/geocode", post(handlers::location::geocode))
        .route("/v1/reverse-geocode", post(handlers::location::reverse_geocode))
        .route(
            "/v1/locations/search",
            get(handlers::location::search_locations),
        )
        // Attach state
        .with_state(state)
}
