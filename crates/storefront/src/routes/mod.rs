//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET     /                    - All content, newest first
//! GET     /category/{name}     - Content in one category
//! GET     /content/{id}        - Content detail
//! GET     /health              - Liveness
//! GET     /health/ready        - Readiness (data directory usable)
//!
//! # Read API (key-gated, CORS per api-config.json)
//! GET     /api/content?apiKey= - All content as JSON
//! OPTIONS /api/content         - Preflight
//! GET     /api/categories?apiKey= - All categories as JSON
//! OPTIONS /api/categories      - Preflight
//! ```

pub mod api;
pub mod health;
pub mod pages;

use axum::{Router, middleware::from_fn, routing::get};

use crate::middleware::{request_id_middleware, security_headers_middleware};
use crate::state::AppState;

/// Create the page routes router.
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::home))
        .route("/category/{name}", get(pages::category))
        .route("/content/{id}", get(pages::content_detail))
        .layer(from_fn(security_headers_middleware))
}

/// Build the complete storefront router with its state.
///
/// Tracing and Sentry layers are added by the binary.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(page_routes())
        .nest("/api", api::routes())
        .fallback(pages::not_found)
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}
