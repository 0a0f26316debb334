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
        _ => {
            tracing::warn!(dir = %state.store().dir().display(), "Data directory unavailable");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use url::Url;

    use super::*;
    use crate::config::AdminConfig;

    #[tokio::test]
    async fn test_readiness_tracks_data_dir() {
        let tmp = tempfile::TempDir::new().unwrap();
        let dir = tmp.path().join("data");
        let state = AppState::new(AdminConfig::new(
            &dir,
            Url::parse("http://localhost:3000").unwrap(),
        ));

        assert_eq!(readiness(State(state.clone())).await, StatusCode::SERVICE_UNAVAILABLE);

        state.store().ensure_dir().await.unwrap();
        assert_eq!(readiness(State(state)).await, StatusCode::OK);
    }
}
