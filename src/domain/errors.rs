//! Domain error types
//!
//! These errors are framework-agnostic and represent business-level failures.
//! The HTTP mapping lives in `api::response`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    /// Resource not found, carries the resource name
    #[error("{0} not found")]
    NotFound(String),
    /// Input rejected by a business rule
    #[error("{0}")]
    Validation(String),
    /// Operation not allowed in the current status
    #[error("{0}")]
    InvalidState(String),
    /// Uniqueness or overlap violation
    #[error("{0}")]
    Conflict(String),
    /// Database/persistence error
    #[error("Database error: {0}")]
    Database(String),
    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(resource: &str) -> Self {
        DomainError::NotFound(resource.to_string())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        DomainError::Validation(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        DomainError::InvalidState(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        DomainError::Conflict(msg.into())
    }
}

// Conversion from SeaORM errors (used in infrastructure layer)
impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        DomainError::Database(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_the_resource() {
        assert_eq!(
            DomainError::not_found("Doctor").to_string(),
            "Doctor not found"
        );
    }

    #[test]
    fn db_errors_become_database_variant() {
        let err: DomainError = sea_orm::DbErr::Custom("boom".into()).into();
        assert!(matches!(err, DomainError::Database(msg) if msg.contains("boom")));
    }
}
