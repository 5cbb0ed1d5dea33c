//! Error taxonomy shared by every service.
//!
//! Structural failures (`NotFound`, `ValidationFailed`, `AccessDenied`,
//! `Unauthorized`) are surfaced to the caller and abort the surrounding
//! transaction. Per-answer resolution problems during ingestion are not errors
//! at all; they only lower the stored answer count.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use common::responses::ApiError;
use log::{error, warn};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("validation failed: {}", .0.join("; "))]
    ValidationFailed(Vec<String>),

    #[error("access denied: {0}")]
    AccessDenied(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("export error: {0}")]
    Export(#[from] csv::Error),

    #[error("blocking task failed: {0}")]
    Blocking(#[from] actix_web::error::BlockingError),
}

impl ServiceError {
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        ServiceError::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        ServiceError::ValidationFailed(vec![message.into()])
    }

    fn title(&self) -> &'static str {
        match self {
            ServiceError::NotFound { .. } => "Not Found",
            ServiceError::ValidationFailed(_) => "Validation Failed",
            ServiceError::AccessDenied(_) => "Access Denied",
            ServiceError::Unauthorized(_) => "Unauthorized",
            _ => "Internal Server Error",
        }
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
            ServiceError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            ServiceError::AccessDenied(_) => StatusCode::FORBIDDEN,
            ServiceError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("{}", self);
        } else {
            warn!("{}", self);
        }

        let errors = match self {
            ServiceError::ValidationFailed(messages) => messages.clone(),
            _ => Vec::new(),
        };
        HttpResponse::build(status).json(ApiError {
            status: status.as_u16(),
            error: self.title().to_string(),
            message: self.to_string(),
            errors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_taxonomy_to_http_status() {
        assert_eq!(
            ServiceError::not_found("survey", 7).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::invalid("title must not be blank").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::AccessDenied("not the owner".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ServiceError::Storage(rusqlite::Error::InvalidQuery).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn validation_message_lists_every_item() {
        let err = ServiceError::ValidationFailed(vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "validation failed: a; b");
    }
}
