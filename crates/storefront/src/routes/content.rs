//! Marketing-content route handlers.
//!
//! These endpoints never fail on CMS trouble: the client absorbs every fetch
//! problem into static fallback content, and `meta.source` tells the frontend
//! which one it got.

use axum::extract::{Query, State};
use serde::Deserialize;
use tracing::instrument;

use crate::cms::types::{AboutContent, HeroContent, PageConfig};
use crate::error::Result;
use crate::response::ApiResponse;
use crate::state::AppState;

/// `GET /api/content/hero` - homepage hero section.
#[instrument(skip(state))]
pub async fn hero(State(state): State<AppState>) -> Result<ApiResponse<HeroContent>> {
    let (hero, source) = state.cms().hero().await;
    Ok(ApiResponse::with_source(hero, source))
}

/// `GET /api/content/about` - about-page content.
#[instrument(skip(state))]
pub async fn about(State(state): State<AppState>) -> Result<ApiResponse<AboutContent>> {
    let (about, source) = state.cms().about().await;
    Ok(ApiResponse::with_source(about, source))
}

/// Query parameters for the page-config endpoint.
#[derive(Debug, Deserialize)]
pub struct PageConfigParams {
    pub page: Option<String>,
}

/// `GET /api/content/page-config?page=<key>` - per-page configuration.
///
/// Missing `page` defaults to the homepage; unknown keys still resolve via
/// the fallback defaults.
#[instrument(skip(state))]
pub async fn page_config(
    State(state): State<AppState>,
    Query(params): Query<PageConfigParams>,
) -> Result<ApiResponse<PageConfig>> {
    let page = params.page.as_deref().unwrap_or("home");
    let (config, source) = state.cms().page_config(page).await;
    Ok(ApiResponse::with_source(config, source))
}
