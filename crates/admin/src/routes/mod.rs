//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Liveness
//! GET  /health/ready               - Readiness (data directory usable)
//!
//! # Dashboard
//! GET  /                           - Overview and recent content
//! GET  /preview                    - Redirect to the storefront
//!
//! # Content
//! GET  /content                    - Content table
//! GET  /content/new                - Create form
//! POST /content                    - Create
//! GET  /content/{id}/edit          - Edit form
//! POST /content/{id}               - Update
//! POST /content/{id}/delete        - Delete
//!
//! # Categories
//! GET  /categories                 - List and add form
//! POST /categories                 - Add
//! POST /categories/{id}            - Rename
//! POST /categories/{id}/delete     - Delete
//!
//! # API access
//! GET  /api-config                 - CORS settings and key
//! POST /api-config                 - Save CORS settings
//! POST /api-config/key             - Rotate the API key
//! GET  /api-docs                   - Usage documentation
//! ```
//!
//! Forms follow post/redirect/get; outcomes are passed back to the page as
//! `?success=<code>` or `?error=<code>`.

pub mod api_config;
pub mod api_docs;
pub mod categories;
pub mod content;
pub mod dashboard;
pub mod health;

use askama::Template;
use axum::{Router, response::Html, routing::get};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Build the admin routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(dashboard::router())
        .merge(content::router())
        .merge(categories::router())
        .merge(api_config::router())
        .merge(api_docs::router())
}

/// Build the complete admin router with its state.
///
/// Tracing and Sentry layers are added by the binary.
pub fn router(state: AppState) -> Router {
    routes().with_state(state)
}

// =============================================================================
// Shared Helpers
// =============================================================================

/// `?success=` / `?error=` codes set by post/redirect/get handlers.
#[derive(Debug, Default, Deserialize)]
pub struct FlashQuery {
    pub success: Option<String>,
    pub error: Option<String>,
}

impl FlashQuery {
    /// Map the success code to a message.
    #[must_use]
    pub fn success_message(&self) -> Option<String> {
        self.success.as_deref().map(|code| {
            match code {
                "created" => "Content created.",
                "updated" => "Content updated.",
                "deleted" => "Content deleted.",
                "category_added" => "Category added.",
                "category_renamed" => "Category renamed.",
                "category_deleted" => "Category deleted.",
                "config_saved" => "API settings saved.",
                "key_rotated" => "A new API key was generated. Update any sites using the old key.",
                _ => "Done.",
            }
            .to_owned()
        })
    }

    /// Map the error code to a message.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.error.as_deref().map(|code| {
            match code {
                "blank_name" => "Please provide a category name.",
                "not_found" => "That item no longer exists.",
                _ => "Something went wrong. Please try again.",
            }
            .to_owned()
        })
    }
}

/// Render a template into an HTML response.
///
/// # Errors
///
/// Returns `AppError::Internal` if rendering fails.
pub fn render<T: Template>(template: &T) -> Result<Html<String>> {
    template
        .render()
        .map(Html)
        .map_err(|e| AppError::Internal(format!("Template error: {e}")))
}

/// Parse an id from a path segment.
///
/// # Errors
///
/// Returns `AppError::BadRequest` if the segment is not a valid id.
pub fn parse_id<T: std::str::FromStr>(raw: &str) -> Result<T> {
    raw.parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid id: {raw}")))
}

/// Split a textarea into trimmed, non-empty lines.
#[must_use]
pub fn lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}
