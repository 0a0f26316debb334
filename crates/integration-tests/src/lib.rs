//! Integration tests for Quire.
//!
//! Both web apps run in-process against one temporary data directory, the
//! way the deployed binaries share `QUIRE_DATA_DIR`. No server or network is
//! needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p quire-integration-tests
//! ```
//!
//! # Test Files
//!
//! - `store` - repository behaviour across collections, including concurrency
//! - `read_api` - API key and CORS behaviour of the storefront read API
//! - `admin_flow` - admin writes observed through the storefront

#![allow(clippy::unwrap_used)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use quire_store::DataStore;
use tempfile::TempDir;
use tower::ServiceExt;
use url::Url;

/// A temporary data directory shared by a storefront and an admin instance.
pub struct TestContext {
    pub storefront: quire_storefront::AppState,
    pub admin: quire_admin::AppState,
    _dir: TempDir,
}

impl TestContext {
    /// Create a fresh, empty data directory.
    #[must_use]
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let storefront = quire_storefront::AppState::new(
            quire_storefront::StorefrontConfig::with_data_dir(dir.path()),
        );
        let admin = quire_admin::AppState::new(quire_admin::AdminConfig::new(
            dir.path(),
            Url::parse("http://localhost:3000").unwrap(),
        ));
        Self {
            storefront,
            admin,
            _dir: dir,
        }
    }

    /// The storefront's store handle.
    ///
    /// The admin holds its own handle to the same directory, as the two
    /// processes do in production.
    #[must_use]
    pub fn store(&self) -> &DataStore {
        self.storefront.store()
    }

    /// Send one request through the storefront router.
    pub async fn storefront(&self, request: Request<Body>) -> Response<Body> {
        send(quire_storefront::router(self.storefront.clone()), request).await
    }

    /// Send one request through the admin router.
    pub async fn admin(&self, request: Request<Body>) -> Response<Body> {
        send(quire_admin::router(self.admin.clone()), request).await
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

async fn send(router: Router, request: Request<Body>) -> Response<Body> {
    router.oneshot(request).await.unwrap()
}

/// `GET` with an optional `Origin` header.
#[must_use]
pub fn get(uri: &str, origin: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(origin) = origin {
        builder = builder.header("origin", origin);
    }
    builder.body(Body::empty()).unwrap()
}

/// `POST` an urlencoded form.
#[must_use]
pub fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Collect a response body as text.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}
