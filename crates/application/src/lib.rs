//! Application layer - Use cases and orchestration
//!
//! Contains the location use cases and the port they depend on.
//! Input is validated here before any adapter is called.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
