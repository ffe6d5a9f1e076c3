//! Domain layer for the ViralTogether location backend
//!
//! Contains the location value objects, the normalized geocoding result
//! entities and domain errors. This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
