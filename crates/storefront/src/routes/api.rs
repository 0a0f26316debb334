//! Key-gated JSON read API.
//!
//! Every `GET` authenticates the `apiKey` query parameter, then applies the
//! CORS policy from `api-config.json`, then fetches the collection. `OPTIONS`
//! preflights only apply the CORS policy and need no key.
//!
//! The policy is edited at runtime from the admin panel, so CORS headers are
//! computed per request instead of through a static `CorsLayer`.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{
        HeaderMap, HeaderValue, StatusCode,
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, ORIGIN, VARY,
        },
    },
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use quire_core::{ApiConfig, WILDCARD_ORIGIN};
use quire_store::{ApiConfigRepository, CategoryRepository, ContentRepository, RepositoryError};

use crate::state::AppState;

/// Message returned with a 401.
pub const INVALID_API_KEY: &str = "Invalid API key";
/// Message returned when content cannot be read.
pub const CONTENT_FETCH_FAILED: &str = "Failed to fetch content";
/// Message returned when categories cannot be read.
pub const CATEGORIES_FETCH_FAILED: &str = "Failed to fetch categories";

/// Query parameters accepted by the read endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ApiKeyQuery {
    #[serde(rename = "apiKey")]
    pub api_key: Option<String>,
}

/// JSON error body: `{"error": "..."}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    fn response(status: StatusCode, message: &str) -> Response {
        (
            status,
            Json(Self {
                error: message.to_string(),
            }),
        )
            .into_response()
    }
}

/// Create the API routes router, nested under `/api`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/content", get(list_content).options(content_preflight))
        .route(
            "/categories",
            get(list_categories).options(categories_preflight),
        )
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /api/content?apiKey=...`
#[instrument(skip(state, headers, query))]
pub async fn list_content(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ApiKeyQuery>,
) -> Response {
    let config = match authorize(&state, query.api_key.as_deref(), CONTENT_FETCH_FAILED).await {
        Ok(config) => config,
        Err(response) => return response,
    };
    let cors = cors_headers(&config, request_origin(&headers));

    match ContentRepository::new(state.store()).list().await {
        Ok(items) => {
            tracing::debug!(count = items.len(), "Served content");
            (cors, Json(items)).into_response()
        }
        Err(e) => fetch_failed(CONTENT_FETCH_FAILED, &e),
    }
}

/// `GET /api/categories?apiKey=...`
#[instrument(skip(state, headers, query))]
pub async fn list_categories(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ApiKeyQuery>,
) -> Response {
    let config = match authorize(&state, query.api_key.as_deref(), CATEGORIES_FETCH_FAILED).await
    {
        Ok(config) => config,
        Err(response) => return response,
    };
    let cors = cors_headers(&config, request_origin(&headers));

    match CategoryRepository::new(state.store()).list().await {
        Ok(categories) => {
            tracing::debug!(count = categories.len(), "Served categories");
            (cors, Json(categories)).into_response()
        }
        Err(e) => fetch_failed(CATEGORIES_FETCH_FAILED, &e),
    }
}

/// `OPTIONS /api/content`
#[instrument(skip(state, headers))]
pub async fn content_preflight(State(state): State<AppState>, headers: HeaderMap) -> Response {
    preflight(&state, &headers, CONTENT_FETCH_FAILED).await
}

/// `OPTIONS /api/categories`
#[instrument(skip(state, headers))]
pub async fn categories_preflight(State(state): State<AppState>, headers: HeaderMap) -> Response {
    preflight(&state, &headers, CATEGORIES_FETCH_FAILED).await
}

// =============================================================================
// Helpers
// =============================================================================

/// Build the CORS response headers for `config` and the request origin.
///
/// Empty while CORS is disabled. Otherwise always carries the allowed methods
/// and headers; `Access-Control-Allow-Origin` is `*` for a wildcard policy,
/// the request origin verbatim when it is listed, and absent otherwise.
#[must_use]
pub fn cors_headers(config: &ApiConfig, origin: Option<&str>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if !config.enable_cors {
        return headers;
    }

    if let Some(allowed) = config.cors_allow_origin(origin)
        && let Ok(value) = HeaderValue::from_str(&allowed)
    {
        if allowed != WILDCARD_ORIGIN {
            // Reflected origins make the response vary per requester
            headers.insert(VARY, HeaderValue::from_static("Origin"));
        }
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, value);
    }
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, OPTIONS"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    headers
}

fn request_origin(headers: &HeaderMap) -> Option<&str> {
    headers.get(ORIGIN).and_then(|v| v.to_str().ok())
}

/// Load the policy and check the key. The `Err` side is the finished response.
async fn authorize(
    state: &AppState,
    api_key: Option<&str>,
    failure: &str,
) -> Result<ApiConfig, Response> {
    let config = ApiConfigRepository::new(state.store())
        .get()
        .await
        .map_err(|e| fetch_failed(failure, &e))?;

    if !api_key.is_some_and(|key| config.validate_key(key)) {
        tracing::info!(key_present = api_key.is_some(), "Rejected API request");
        return Err(ApiError::response(StatusCode::UNAUTHORIZED, INVALID_API_KEY));
    }
    Ok(config)
}

async fn preflight(state: &AppState, headers: &HeaderMap, failure: &str) -> Response {
    match ApiConfigRepository::new(state.store()).get().await {
        Ok(config) => (
            StatusCode::OK,
            cors_headers(&config, request_origin(headers)),
        )
            .into_response(),
        Err(e) => fetch_failed(failure, &e),
    }
}

fn fetch_failed(message: &str, error: &RepositoryError) -> Response {
    let event_id = sentry::capture_error(error);
    tracing::error!(error = %error, sentry_event_id = %event_id, "{message}");
    ApiError::response(StatusCode::INTERNAL_SERVER_ERROR, message)
}
