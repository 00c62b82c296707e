//! JSON envelopes shared by every handler
//!
//! Success: `{"status": true, "message": "...", "data": ...}`
//! Failure: `{"status": false, "message": "..."}`

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;

use crate::domain::DomainError;

pub type ApiResult = Result<Response, DomainError>;

pub fn ok<T: Serialize>(message: &str, data: T) -> ApiResult {
    Ok(envelope(StatusCode::OK, message, data))
}

pub fn created<T: Serialize>(message: &str, data: T) -> ApiResult {
    Ok(envelope(StatusCode::CREATED, message, data))
}

fn envelope<T: Serialize>(status: StatusCode, message: &str, data: T) -> Response {
    (
        status,
        Json(json!({
            "status": true,
            "message": message,
            "data": data
        })),
    )
        .into_response()
}

impl DomainError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            DomainError::NotFound(_) => StatusCode::NOT_FOUND,
            DomainError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            DomainError::InvalidState(_) | DomainError::Conflict(_) => StatusCode::CONFLICT,
            DomainError::Database(_) | DomainError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for DomainError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::warn!("{}", self);
        }

        // Internal details stay in the log
        let message = match &self {
            DomainError::Database(_) | DomainError::Internal(_) => {
                "Something went wrong, please try again".to_string()
            }
            other => other.to_string(),
        };

        (
            status,
            Json(json!({
                "status": false,
                "message": message
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_statuses() {
        assert_eq!(
            DomainError::not_found("Sale").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            DomainError::validation("bad").status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            DomainError::invalid_state("voided").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            DomainError::Database("locked".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
