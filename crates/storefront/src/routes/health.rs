//! Health check endpoints.

use axum::{extract::State, http::StatusCode};

use crate::state::AppState;

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the data directory is missing or is
/// not a directory.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    match tokio::fs::metadata(state.store().dir()).await {
        Ok(meta) if meta.is_dir() => StatusCode::OK,
        Ok(_) => {
            tracing::warn!(dir = %state.store().dir().display(), "Data path is not a directory");
            StatusCode::SERVICE_UNAVAILABLE
        }
        Err(e) => {
            tracing::warn!(error = %e, dir = %state.store().dir().display(), "Data directory unavailable");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
