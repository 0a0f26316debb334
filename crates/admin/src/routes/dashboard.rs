//! Dashboard and storefront preview.

use askama::Template;
use axum::{
    Router,
    extract::State,
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use tracing::instrument;

use quire_store::{ApiConfigRepository, CategoryRepository, ContentRepository};

use crate::error::Result;
use crate::filters;
use crate::state::AppState;

use super::content::ContentRowView;
use super::render;

/// Items shown in the dashboard's recent list.
const RECENT_LIMIT: usize = 5;

/// Build the dashboard router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/preview", get(preview))
}

/// Dashboard metrics.
#[derive(Debug, Clone, Default)]
pub struct DashboardMetrics {
    pub content: usize,
    pub categories: usize,
    pub cors: &'static str,
}

/// Dashboard template.
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub current_path: String,
    pub metrics: DashboardMetrics,
    pub recent: Vec<ContentRowView>,
    pub storefront_url: String,
}

/// Dashboard overview.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Response> {
    let content = ContentRepository::new(state.store()).list().await?;
    let categories = CategoryRepository::new(state.store()).list().await?.len();
    let api = ApiConfigRepository::new(state.store()).get().await?;

    let cors = match (api.enable_cors, api.allows_any_origin()) {
        (false, _) => "Disabled",
        (true, true) => "Any origin",
        (true, false) => "Allow-list",
    };

    let template = DashboardTemplate {
        current_path: "/".to_string(),
        metrics: DashboardMetrics {
            content: content.len(),
            categories,
            cors,
        },
        recent: content
            .iter()
            .take(RECENT_LIMIT)
            .map(ContentRowView::from)
            .collect(),
        storefront_url: state.config().storefront_base_url.to_string(),
    };
    Ok(render(&template)?.into_response())
}

/// Open the public storefront.
pub async fn preview(State(state): State<AppState>) -> Redirect {
    Redirect::to(state.config().storefront_base_url.as_str())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;
    use url::Url;

    use quire_core::NewContent;

    use super::*;
    use crate::config::AdminConfig;

    fn setup() -> (AppState, tempfile::TempDir) {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = AdminConfig::new(tmp.path(), Url::parse("https://shop.example/").unwrap());
        (AppState::new(config), tmp)
    }

    #[tokio::test]
    async fn test_dashboard_lists_recent_content() {
        let (state, _tmp) = setup();
        let repo = ContentRepository::new(state.store());
        for i in 0..7 {
            repo.add(NewContent {
                title: format!("Item {i}"),
                subtitle: "Sub".to_string(),
                category: "Business".to_string(),
                content: "Body".to_string(),
                image_urls: vec!["https://img.example/x.png".to_string()],
            })
            .await
            .unwrap();
        }

        let response = crate::routes::router(state)
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(body.contains("Item 6"));
        assert!(body.contains("<span>7</span> content items"));
        assert_eq!(body.matches("/edit\"").count(), RECENT_LIMIT);
    }

    #[tokio::test]
    async fn test_preview_redirects_to_storefront() {
        let (state, _tmp) = setup();

        let response = crate::routes::router(state)
            .oneshot(Request::builder().uri("/preview").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "https://shop.example/");
    }
}
