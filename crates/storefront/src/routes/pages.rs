//! Public page route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::instrument;

use quire_core::{Category, Content, ContentId};
use quire_store::{CategoryRepository, ContentRepository};

use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

/// Date format used on cards and detail pages.
const DATE_FORMAT: &str = "%B %-d, %Y";

// =============================================================================
// View Models
// =============================================================================

/// Category navigation link.
#[derive(Clone)]
pub struct CategoryLink {
    pub name: String,
    pub href: String,
    pub active: bool,
}

impl CategoryLink {
    fn new(category: &Category, active: Option<&str>) -> Self {
        Self {
            name: category.name.clone(),
            href: category_href(&category.name),
            active: active.is_some_and(|name| category.matches(name)),
        }
    }
}

/// Content card shown in listings.
#[derive(Clone)]
pub struct ContentCardView {
    pub href: String,
    pub title: String,
    pub subtitle: String,
    pub category: String,
    pub category_href: String,
    pub cover_image: Option<String>,
    pub published: String,
}

impl From<&Content> for ContentCardView {
    fn from(content: &Content) -> Self {
        Self {
            href: format!("/content/{}", content.id),
            title: content.title.clone(),
            subtitle: content.subtitle.clone(),
            category: content.category.clone(),
            category_href: category_href(&content.category),
            cover_image: content.cover_image().map(String::from),
            published: content.created_at.format(DATE_FORMAT).to_string(),
        }
    }
}

/// Full content view for the detail page.
pub struct ContentDetailView {
    pub title: String,
    pub subtitle: String,
    pub category: String,
    pub category_href: String,
    pub paragraphs: Vec<String>,
    pub images: Vec<String>,
    pub published: String,
    /// Present only when the item was edited after publishing.
    pub updated: Option<String>,
}

impl From<Content> for ContentDetailView {
    fn from(content: Content) -> Self {
        let published = content.created_at.format(DATE_FORMAT).to_string();
        let updated = (content.updated_at.date_naive() != content.created_at.date_naive())
            .then(|| content.updated_at.format(DATE_FORMAT).to_string());

        Self {
            category_href: category_href(&content.category),
            paragraphs: paragraphs(&content.body),
            title: content.title,
            subtitle: content.subtitle,
            category: content.category,
            images: content.image_urls,
            published,
            updated,
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Listing page template (home and category pages).
#[derive(Template, WebTemplate)]
#[template(path = "listing.html")]
pub struct ListingTemplate {
    pub title: String,
    pub heading: String,
    pub categories: Vec<CategoryLink>,
    pub items: Vec<ContentCardView>,
    pub empty_message: &'static str,
    pub canonical_url: Option<String>,
}

/// Content detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "content.html")]
pub struct ContentTemplate {
    pub categories: Vec<CategoryLink>,
    pub content: ContentDetailView,
    pub canonical_url: Option<String>,
}

/// 404 page template.
#[derive(Template, WebTemplate)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub canonical_url: Option<String>,
}

impl NotFoundTemplate {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            canonical_url: None,
        }
    }
}

impl Default for NotFoundTemplate {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Display all content, newest first.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> impl IntoResponse {
    let items = match ContentRepository::new(state.store()).list().await {
        Ok(items) => items,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load content");
            Vec::new()
        }
    };

    ListingTemplate {
        title: "Quire".to_string(),
        heading: "Latest".to_string(),
        categories: category_links(&state, None).await,
        items: items.iter().map(ContentCardView::from).collect(),
        empty_message: "No content yet.",
        canonical_url: state.config().absolute_url("/"),
    }
}

/// Display content in one category, matched case-insensitively.
#[instrument(skip(state))]
pub async fn category(State(state): State<AppState>, Path(name): Path<String>) -> impl IntoResponse {
    let items = match ContentRepository::new(state.store())
        .list_by_category(&name)
        .await
    {
        Ok(items) => items,
        Err(e) => {
            tracing::error!(error = %e, category = %name, "Failed to load content");
            Vec::new()
        }
    };

    let categories = category_links(&state, Some(&name)).await;
    // Prefer the stored spelling of the name over the URL's
    let heading = categories
        .iter()
        .find(|c| c.active)
        .map_or_else(|| name.clone(), |c| c.name.clone());

    ListingTemplate {
        title: format!("{heading} | Quire"),
        heading,
        categories,
        items: items.iter().map(ContentCardView::from).collect(),
        empty_message: "No content found in this category.",
        canonical_url: state.config().absolute_url(&category_href(&name)),
    }
}

/// Display a single content item.
#[instrument(skip(state))]
pub async fn content_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    let id: ContentId = id
        .parse()
        .map_err(|_| AppError::NotFound(format!("content {id}")))?;

    let content = ContentRepository::new(state.store())
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("content {id}")))?;

    Ok(ContentTemplate {
        categories: category_links(&state, Some(&content.category)).await,
        canonical_url: state.config().absolute_url(&format!("/content/{id}")),
        content: ContentDetailView::from(content),
    }
    .into_response())
}

/// Fallback for unknown paths.
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, NotFoundTemplate::new())
}

// =============================================================================
// Helpers
// =============================================================================

async fn category_links(state: &AppState, active: Option<&str>) -> Vec<CategoryLink> {
    match CategoryRepository::new(state.store()).list().await {
        Ok(categories) => categories
            .iter()
            .map(|c| CategoryLink::new(c, active))
            .collect(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load categories");
            Vec::new()
        }
    }
}

/// Path of a category page.
fn category_href(name: &str) -> String {
    format!("/category/{}", urlencoding::encode(&Category::slug_of(name)))
}

/// Split body text into paragraphs on blank lines.
fn paragraphs(body: &str) -> Vec<String> {
    body.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}
