//! Category management routes.

use askama::Template;
use axum::{
    Form, Router,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tracing::instrument;

use quire_core::{Category, CategoryId};
use quire_store::{CategoryRepository, ContentRepository, RepositoryError};

use crate::error::Result;
use crate::filters;
use crate::state::AppState;

use super::{FlashQuery, parse_id, render};

/// Build the categories router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(index).post(create))
        .route("/categories/{id}", post(rename))
        .route("/categories/{id}/delete", post(delete))
}

/// Add/rename form.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CategoryForm {
    pub name: String,
}

/// Category row with its usage count.
#[derive(Debug, Clone)]
pub struct CategoryRowView {
    pub id: String,
    pub name: String,
    pub content_count: usize,
}

/// Categories page template.
#[derive(Template)]
#[template(path = "categories/index.html")]
pub struct CategoriesTemplate {
    pub current_path: String,
    pub categories: Vec<CategoryRowView>,
    pub success_message: Option<String>,
    pub error_message: Option<String>,
}

/// List categories with the add form.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(flash): Query<FlashQuery>,
) -> Result<Response> {
    let categories = CategoryRepository::new(state.store()).list().await?;
    let content = ContentRepository::new(state.store()).list().await?;

    let rows = categories
        .iter()
        .map(|category: &Category| CategoryRowView {
            id: category.id.to_string(),
            name: category.name.clone(),
            content_count: content.iter().filter(|c| c.in_category(&category.name)).count(),
        })
        .collect();

    let template = CategoriesTemplate {
        current_path: "/categories".to_string(),
        categories: rows,
        success_message: flash.success_message(),
        error_message: flash.error_message(),
    };
    Ok(render(&template)?.into_response())
}

/// Add a category.
#[instrument(skip(state))]
pub async fn create(
    State(state): State<AppState>,
    Form(form): Form<CategoryForm>,
) -> Result<Response> {
    match CategoryRepository::new(state.store()).add(&form.name).await {
        Ok(_) => Ok(Redirect::to("/categories?success=category_added").into_response()),
        Err(RepositoryError::Validation(_)) => {
            Ok(Redirect::to("/categories?error=blank_name").into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Rename a category. Content keeps the name it was saved with.
#[instrument(skip(state))]
pub async fn rename(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<CategoryForm>,
) -> Result<Response> {
    let id: CategoryId = parse_id(&id)?;

    match CategoryRepository::new(state.store())
        .update(id, &form.name)
        .await
    {
        Ok(_) => Ok(Redirect::to("/categories?success=category_renamed").into_response()),
        Err(RepositoryError::Validation(_)) => {
            Ok(Redirect::to("/categories?error=blank_name").into_response())
        }
        Err(RepositoryError::NotFound) => {
            Ok(Redirect::to("/categories?error=not_found").into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Delete a category.
#[instrument(skip(state))]
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<Response> {
    let id: CategoryId = parse_id(&id)?;
    CategoryRepository::new(state.store()).remove(id).await?;
    Ok(Redirect::to("/categories?success=category_deleted").into_response())
}
