//! API usage documentation page.

use askama::Template;
use axum::{
    Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
};
use tracing::instrument;

use quire_store::ApiConfigRepository;

use crate::error::Result;
use crate::filters;
use crate::state::AppState;

use super::render;

/// Build the docs router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api-docs", get(show))
}

/// API documentation template.
#[derive(Template)]
#[template(path = "api_docs.html")]
pub struct ApiDocsTemplate {
    pub current_path: String,
    pub api_key: String,
    pub storefront_url: String,
    pub content_endpoint: String,
    pub categories_endpoint: String,
    pub enable_cors: bool,
    pub allowed_origins: Vec<String>,
}

/// Show endpoint documentation filled in with the live key and URLs.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Result<Response> {
    let config = ApiConfigRepository::new(state.store()).get().await?;
    let key = urlencoding::encode(&config.api_key);

    let template = ApiDocsTemplate {
        current_path: "/api-docs".to_string(),
        storefront_url: state.config().storefront_base_url.to_string(),
        content_endpoint: state
            .config()
            .storefront_url(&format!("api/content?apiKey={key}")),
        categories_endpoint: state
            .config()
            .storefront_url(&format!("api/categories?apiKey={key}")),
        api_key: config.api_key,
        enable_cors: config.enable_cors,
        allowed_origins: config.allowed_origins,
    };
    Ok(render(&template)?.into_response())
}
