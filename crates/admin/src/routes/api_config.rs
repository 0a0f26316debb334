//! API access settings: CORS policy and API key.

use askama::Template;
use axum::{
    Form, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tracing::instrument;
use url::Url;

use quire_core::{ApiConfig, WILDCARD_ORIGIN};
use quire_store::{ApiConfigRepository, generate_api_key};

use crate::error::Result;
use crate::filters;
use crate::state::AppState;

use super::{FlashQuery, lines, render};

/// Build the API settings router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api-config", get(show).post(save))
        .route("/api-config/key", post(rotate_key))
}

// =============================================================================
// Forms
// =============================================================================

/// Settings form. An unchecked checkbox is simply absent.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ApiConfigForm {
    pub enable_cors: Option<String>,
    pub allowed_origins: String,
}

/// Reduce an allowed-origin entry to `scheme://host[:port]`, or the wildcard.
///
/// # Errors
///
/// Returns a user-facing message naming the rejected entry.
pub fn normalize_origin(raw: &str) -> std::result::Result<String, String> {
    let raw = raw.trim();
    if raw == WILDCARD_ORIGIN {
        return Ok(WILDCARD_ORIGIN.to_string());
    }

    let url = Url::parse(raw).map_err(|_| format!("\"{raw}\" is not a valid origin"))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(format!("\"{raw}\" must be an http(s) URL with a host"));
    }
    Ok(url.origin().ascii_serialization())
}

/// Normalize every line of the textarea, dropping duplicates but keeping order.
///
/// # Errors
///
/// Returns the message for the first invalid entry.
pub fn parse_origins(text: &str) -> std::result::Result<Vec<String>, String> {
    let mut origins: Vec<String> = Vec::new();
    for line in lines(text) {
        let origin = normalize_origin(&line)?;
        if !origins.contains(&origin) {
            origins.push(origin);
        }
    }
    Ok(origins)
}

// =============================================================================
// Templates
// =============================================================================

/// API settings page template.
#[derive(Template)]
#[template(path = "api_config/index.html")]
pub struct ApiConfigTemplate {
    pub current_path: String,
    pub enable_cors: bool,
    pub allowed_origins: String,
    pub api_key: String,
    pub content_endpoint: String,
    pub categories_endpoint: String,
    pub success_message: Option<String>,
    pub error_message: Option<String>,
}

impl ApiConfigTemplate {
    fn new(state: &AppState, config: &ApiConfig, flash: &FlashQuery) -> Self {
        let key = urlencoding::encode(&config.api_key);
        Self {
            current_path: "/api-config".to_string(),
            enable_cors: config.enable_cors,
            allowed_origins: config.allowed_origins.join("\n"),
            api_key: config.api_key.clone(),
            content_endpoint: state
                .config()
                .storefront_url(&format!("api/content?apiKey={key}")),
            categories_endpoint: state
                .config()
                .storefront_url(&format!("api/categories?apiKey={key}")),
            success_message: flash.success_message(),
            error_message: flash.error_message(),
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Show the current settings.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Query(flash): Query<FlashQuery>,
) -> Result<Response> {
    let config = ApiConfigRepository::new(state.store()).get().await?;
    Ok(render(&ApiConfigTemplate::new(&state, &config, &flash))?.into_response())
}

/// Save the CORS toggle and allowed origins. The key is left unchanged.
#[instrument(skip(state))]
pub async fn save(
    State(state): State<AppState>,
    Form(form): Form<ApiConfigForm>,
) -> Result<Response> {
    let repo = ApiConfigRepository::new(state.store());
    let enable_cors = form.enable_cors.is_some();

    let origins = match parse_origins(&form.allowed_origins) {
        Ok(origins) => origins,
        Err(message) => {
            tracing::info!(%message, "Rejected allowed origins");
            let mut template = ApiConfigTemplate::new(&state, &repo.get().await?, &FlashQuery::default());
            template.enable_cors = enable_cors;
            template.allowed_origins = form.allowed_origins;
            template.error_message = Some(message);
            return Ok((StatusCode::BAD_REQUEST, render(&template)?).into_response());
        }
    };

    repo.update(move |config| {
        config.enable_cors = enable_cors;
        config.allowed_origins = origins;
    })
    .await?;
    Ok(Redirect::to("/api-config?success=config_saved").into_response())
}

/// Generate and store a new API key.
#[instrument(skip(state))]
pub async fn rotate_key(State(state): State<AppState>) -> Result<Response> {
    let key = generate_api_key();
    ApiConfigRepository::new(state.store())
        .update(move |config| config.api_key = key)
        .await?;
    tracing::info!("API key rotated");
    Ok(Redirect::to("/api-config?success=key_rotated").into_response())
}
