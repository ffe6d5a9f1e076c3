//! ViralTogether location HTTP presentation layer
//!
//! Exposes geocoding, reverse geocoding and location search over HTTP.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::{ApiError, set_expose_internal_errors};
pub use middleware::{ValidatedJson, ValidatedQuery, ValidationError};
pub use routes::create_router;
pub use state::AppState;
