//! Content management routes.

use askama::Template;
use axum::{
    Form, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tracing::instrument;

use quire_core::{Content, ContentId, ContentUpdate, NewContent};
use quire_store::{CategoryRepository, ContentRepository, RepositoryError};

use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

use super::{FlashQuery, lines, parse_id, render};

/// Build the content router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/content", get(index).post(create))
        .route("/content/new", get(new_form))
        .route("/content/{id}", post(update))
        .route("/content/{id}/edit", get(edit_form))
        .route("/content/{id}/delete", post(delete))
}

// =============================================================================
// Forms
// =============================================================================

/// Create/edit form fields. Image URLs are one per line.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContentForm {
    pub title: String,
    pub subtitle: String,
    pub category: String,
    pub content: String,
    pub image_urls: String,
}

impl ContentForm {
    /// Pre-fill the form from a stored item.
    fn from_content(content: &Content) -> Self {
        Self {
            title: content.title.clone(),
            subtitle: content.subtitle.clone(),
            category: content.category.clone(),
            content: content.body.clone(),
            image_urls: content.image_urls.join("\n"),
        }
    }

    fn into_new_content(self) -> NewContent {
        NewContent {
            image_urls: lines(&self.image_urls),
            title: self.title,
            subtitle: self.subtitle,
            category: self.category,
            content: self.content,
        }
    }

    /// The edit form always submits every field.
    fn into_update(self) -> ContentUpdate {
        ContentUpdate {
            image_urls: Some(lines(&self.image_urls)),
            title: Some(self.title),
            subtitle: Some(self.subtitle),
            category: Some(self.category),
            content: Some(self.content),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Row in the content table.
#[derive(Debug, Clone)]
pub struct ContentRowView {
    pub id: String,
    pub title: String,
    pub category: String,
    pub image_count: usize,
    pub updated_at: String,
}

impl From<&Content> for ContentRowView {
    fn from(content: &Content) -> Self {
        Self {
            id: content.id.to_string(),
            title: content.title.clone(),
            category: content.category.clone(),
            image_count: content.image_urls.len(),
            updated_at: content.updated_at.format("%b %d, %Y %H:%M").to_string(),
        }
    }
}

/// Content listing template.
#[derive(Template)]
#[template(path = "content/index.html")]
pub struct ContentIndexTemplate {
    pub current_path: String,
    pub items: Vec<ContentRowView>,
    pub success_message: Option<String>,
    pub error_message: Option<String>,
}

/// Entry in the category select box.
#[derive(Debug, Clone)]
pub struct CategoryOption {
    pub name: String,
    pub selected: bool,
}

/// Create/edit form template.
#[derive(Template)]
#[template(path = "content/form.html")]
pub struct ContentFormTemplate {
    pub current_path: String,
    pub heading: String,
    pub action: String,
    pub submit_label: String,
    pub form: ContentForm,
    pub categories: Vec<CategoryOption>,
    pub error_message: Option<String>,
}

impl ContentFormTemplate {
    fn create(form: ContentForm, categories: &[String], error: Option<String>) -> Self {
        Self {
            current_path: "/content".to_string(),
            heading: "New content".to_string(),
            action: "/content".to_string(),
            submit_label: "Create".to_string(),
            categories: select_options(categories, &form.category),
            form,
            error_message: error,
        }
    }

    fn edit(
        id: ContentId,
        form: ContentForm,
        categories: &[String],
        error: Option<String>,
    ) -> Self {
        Self {
            current_path: "/content".to_string(),
            heading: "Edit content".to_string(),
            action: format!("/content/{id}"),
            submit_label: "Save".to_string(),
            categories: select_options(categories, &form.category),
            form,
            error_message: error,
        }
    }
}

fn select_options(names: &[String], selected: &str) -> Vec<CategoryOption> {
    names
        .iter()
        .map(|name| CategoryOption {
            name: name.clone(),
            selected: name == selected,
        })
        .collect()
}

// =============================================================================
// Handlers
// =============================================================================

/// Content table, newest first.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(flash): Query<FlashQuery>,
) -> Result<Response> {
    let items = ContentRepository::new(state.store()).list().await?;

    let template = ContentIndexTemplate {
        current_path: "/content".to_string(),
        items: items.iter().map(ContentRowView::from).collect(),
        success_message: flash.success_message(),
        error_message: flash.error_message(),
    };
    Ok(render(&template)?.into_response())
}

/// Empty create form.
#[instrument(skip(state))]
pub async fn new_form(State(state): State<AppState>) -> Result<Response> {
    let categories = category_options(&state, None).await?;
    let form = ContentForm {
        category: categories.first().cloned().unwrap_or_default(),
        ..ContentForm::default()
    };
    Ok(render(&ContentFormTemplate::create(form, &categories, None))?.into_response())
}

/// Create content from the form.
#[instrument(skip(state, form))]
pub async fn create(State(state): State<AppState>, Form(form): Form<ContentForm>) -> Result<Response> {
    match ContentRepository::new(state.store())
        .add(form.clone().into_new_content())
        .await
    {
        Ok(_) => Ok(Redirect::to("/content?success=created").into_response()),
        Err(RepositoryError::Validation(e)) => {
            let categories = category_options(&state, Some(&form.category)).await?;
            let template = ContentFormTemplate::create(form, &categories, Some(e.to_string()));
            Ok((StatusCode::BAD_REQUEST, render(&template)?).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Edit form pre-filled with the stored item.
#[instrument(skip(state))]
pub async fn edit_form(State(state): State<AppState>, Path(id): Path<String>) -> Result<Response> {
    let id: ContentId = parse_id(&id)?;
    let content = ContentRepository::new(state.store())
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("content {id}")))?;

    let categories = category_options(&state, Some(&content.category)).await?;
    let template =
        ContentFormTemplate::edit(id, ContentForm::from_content(&content), &categories, None);
    Ok(render(&template)?.into_response())
}

/// Replace an item's fields with the submitted form.
#[instrument(skip(state, form))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<ContentForm>,
) -> Result<Response> {
    let id: ContentId = parse_id(&id)?;

    match ContentRepository::new(state.store())
        .update(id, form.clone().into_update())
        .await
    {
        Ok(_) => Ok(Redirect::to("/content?success=updated").into_response()),
        Err(RepositoryError::Validation(e)) => {
            let categories = category_options(&state, Some(&form.category)).await?;
            let template = ContentFormTemplate::edit(id, form, &categories, Some(e.to_string()));
            Ok((StatusCode::BAD_REQUEST, render(&template)?).into_response())
        }
        Err(RepositoryError::NotFound) => {
            Ok(Redirect::to("/content?error=not_found").into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Delete an item. Deleting a missing item still redirects with success.
#[instrument(skip(state))]
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<Response> {
    let id: ContentId = parse_id(&id)?;
    ContentRepository::new(state.store()).remove(id).await?;
    Ok(Redirect::to("/content?success=deleted").into_response())
}

/// Category names for the select box. A current value that no longer
/// matches a category is kept as an option so editing does not drop it.
async fn category_options(state: &AppState, current: Option<&str>) -> Result<Vec<String>> {
    let mut names: Vec<String> = CategoryRepository::new(state.store())
        .list()
        .await?
        .into_iter()
        .map(|c| c.name)
        .collect();

    if let Some(current) = current.map(str::trim)
        && !current.is_empty()
        && !names.iter().any(|n| n == current)
    {
        names.push(current.to_string());
    }
    Ok(names)
}
