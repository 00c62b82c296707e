//! Domain layer - Business abstractions
//!
//! Trait definitions for data access and the domain error type.
//! Entity models live in `crate::models`.

pub mod errors;
pub mod repositories;

pub use errors::DomainError;
pub use repositories::*;
