//! Unified error handling with Sentry integration.
//!
//! Page handlers return `Result<T, AppError>`. Server errors are captured to
//! Sentry before responding; the client only sees a generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use quire_store::RepositoryError;

use crate::routes::pages::NotFoundTemplate;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Data store operation failed.
    #[error("Store error: {0}")]
    Store(#[from] RepositoryError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::Store(_) => {
                let event_id = sentry::capture_error(&self);
                tracing::error!(
                    error = %self,
                    sentry_event_id = %event_id,
                    "Request error"
                );
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
            Self::NotFound(what) => {
                tracing::debug!(%what, "Not found");
                (StatusCode::NOT_FOUND, NotFoundTemplate::new()).into_response()
            }
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
