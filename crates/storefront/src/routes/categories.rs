//! Category route handlers.

use axum::extract::{Path, State};
use serde::Serialize;
use tracing::instrument;
use urban_echo_core::Slug;

use crate::db::CategoryRepository;
use crate::error::{AppError, Result};
use crate::models::Category;
use crate::response::ApiResponse;
use crate::state::AppState;

/// `GET /api/categories` - all active categories in navigation order.
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<ApiResponse<Vec<Category>>> {
    let categories = CategoryRepository::new(state.pool()).navigation().await?;
    Ok(ApiResponse::new(categories))
}

/// Category detail payload: the category plus its breadcrumb trail.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDetail {
    pub category: Category,
    pub breadcrumb: Vec<Category>,
}

/// `GET /api/categories/{slug}` - one category with its breadcrumb trail,
/// root first.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<ApiResponse<CategoryDetail>> {
    let slug = Slug::parse(&slug)
        .map_err(|e| AppError::Validation(format!("invalid category slug: {e}")))?;

    let repo = CategoryRepository::new(state.pool());
    let category = repo
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("category {slug}")))?;

    let breadcrumb = repo.breadcrumb(&category).await?;

    Ok(ApiResponse::new(CategoryDetail {
        category,
        breadcrumb,
    }))
}
