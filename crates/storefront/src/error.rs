//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-class errors to
//! Sentry before responding to the client. All route handlers return
//! `Result<T, AppError>`; every failure body uses the same JSON envelope:
//!
//! ```json
//! { "success": false, "error": "VALIDATION_ERROR", "message": "..." }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::cart::CartError;
use crate::db::RepositoryError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request input failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(RepositoryError),

    /// Upstream service failed in a way that could not be absorbed by
    /// fallback content. CMS failures currently always fall back, so no
    /// route produces this today; the `API_ERROR` kind stays part of the
    /// envelope contract.
    #[allow(dead_code)]
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated. Reserved until account routes get an
    /// authentication layer.
    #[allow(dead_code)]
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Write rejected by a uniqueness constraint.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Cart mutation rejected.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Session state could not be read or written.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Internal server error not covered by a more specific variant.
    #[allow(dead_code)]
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        // A missing row is a client-visible 404 and a constraint hit is a
        // 409, not server faults
        match err {
            RepositoryError::NotFound => Self::NotFound("resource not found".to_string()),
            RepositoryError::Conflict(msg) => Self::Conflict(msg),
            other => Self::Database(other),
        }
    }
}

impl AppError {
    /// The stable machine-readable error kind carried in the envelope.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) | Self::Cart(_) | Self::Conflict(_) => "VALIDATION_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Upstream(_) => "API_ERROR",
            Self::NotFound(_) => "NOT_FOUND_ERROR",
            Self::Unauthorized(_) => "AUTHENTICATION_ERROR",
            Self::Session(_) | Self::Internal(_) => "SERVER_ERROR",
        }
    }

    const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Cart(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Database(_) | Self::Session(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        }
    }

    /// Client-facing message. Server-class errors are redacted.
    fn message(&self) -> String {
        match self {
            Self::Database(_) | Self::Session(_) | Self::Internal(_) => {
                "Internal server error".to_string()
            }
            Self::Upstream(_) => "External service error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(
            self,
            Self::Database(_) | Self::Session(_) | Self::Internal(_) | Self::Upstream(_)
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let body = json!({
            "success": false,
            "error": self.kind(),
            "message": self.message(),
        });

        (self.status(), Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product classic-tee".to_string());
        assert_eq!(err.to_string(), "Not found: product classic-tee");

        let err = AppError::Validation("minPrice must not exceed maxPrice".to_string());
        assert_eq!(
            err.to_string(),
            "Validation error: minPrice must not exceed maxPrice"
        );
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            status_of(AppError::Validation("bad".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::NotFound("x".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AppError::Unauthorized("x".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(AppError::Internal("x".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(AppError::Upstream("x".to_string())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(AppError::Cart(CartError::ItemNotFound)),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_error_kinds_are_stable() {
        assert_eq!(AppError::Validation("x".to_string()).kind(), "VALIDATION_ERROR");
        assert_eq!(AppError::Upstream("x".to_string()).kind(), "API_ERROR");
        assert_eq!(AppError::NotFound("x".to_string()).kind(), "NOT_FOUND_ERROR");
        assert_eq!(
            AppError::Unauthorized("x".to_string()).kind(),
            "AUTHENTICATION_ERROR"
        );
        assert_eq!(AppError::Internal("x".to_string()).kind(), "SERVER_ERROR");
    }

    #[test]
    fn test_repository_not_found_maps_to_404() {
        let err: AppError = RepositoryError::NotFound.into();
        assert_eq!(err.kind(), "NOT_FOUND_ERROR");
        assert_eq!(status_of(err), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_repository_conflict_maps_to_409() {
        let err: AppError = RepositoryError::Conflict("email already exists".to_string()).into();
        assert_eq!(status_of(err), StatusCode::CONFLICT);
    }

    #[test]
    fn test_internal_message_is_redacted() {
        let err = AppError::Internal("secret pool state".to_string());
        assert_eq!(err.message(), "Internal server error");
    }
}
