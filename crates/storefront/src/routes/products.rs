//! Product route handlers.
//!
//! All listing endpoints share the same filter surface; validation failures
//! respond 400 with `VALIDATION_ERROR` before any database work happens.

use axum::extract::{Path, Query, State};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;
use urban_echo_core::Slug;

use crate::db::ProductRepository;
use crate::db::query::{Pagination, ProductQuery, SortKey};
use crate::error::{AppError, Result};
use crate::models::Product;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Default number of new arrivals returned.
const NEW_ARRIVALS_DEFAULT: i64 = 8;

/// Maximum number of new arrivals returned.
const NEW_ARRIVALS_MAX: i64 = 50;

/// Default number of related products returned.
const RELATED_DEFAULT: i64 = 4;

/// Maximum number of related products returned.
const RELATED_MAX: i64 = 20;

/// Query parameters accepted by the listing and search endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListParams {
    pub q: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub new_arrival: bool,
    #[serde(default)]
    pub on_sale: bool,
    #[serde(default)]
    pub best_seller: bool,
    pub sort: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl ProductListParams {
    /// Validate the parameters and build the repository query.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for negative prices, an inverted price
    /// range, or a malformed category slug.
    fn into_query(self) -> Result<ProductQuery> {
        if self.min_price.is_some_and(|p| p < Decimal::ZERO)
            || self.max_price.is_some_and(|p| p < Decimal::ZERO)
        {
            return Err(AppError::Validation(
                "price bounds must not be negative".to_string(),
            ));
        }

        if let (Some(min), Some(max)) = (self.min_price, self.max_price)
            && min > max
        {
            return Err(AppError::Validation(
                "minPrice must not exceed maxPrice".to_string(),
            ));
        }

        let category = self
            .category
            .map(|raw| {
                Slug::parse(&raw)
                    .map_err(|e| AppError::Validation(format!("invalid category: {e}")))
            })
            .transpose()?;

        let text = self.q.filter(|q| !q.trim().is_empty());

        Ok(ProductQuery {
            text,
            category,
            min_price: self.min_price,
            max_price: self.max_price,
            featured: self.featured,
            new_arrival: self.new_arrival,
            on_sale: self.on_sale,
            best_seller: self.best_seller,
            sort: self.sort.as_deref().map(SortKey::parse).unwrap_or_default(),
            pagination: Pagination::clamp(self.page, self.limit),
        })
    }
}

/// `GET /api/products` - filtered, sorted, paginated product listing.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ProductListParams>,
) -> Result<ApiResponse<Vec<Product>>> {
    let query = params.into_query()?;
    let pagination = query.pagination;

    let (products, total) = ProductRepository::new(state.pool()).list(&query).await?;

    Ok(ApiResponse::paginated(products, pagination, total))
}

/// `GET /api/products/search` - same surface as the listing, but a search
/// term is required.
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<ProductListParams>,
) -> Result<ApiResponse<Vec<Product>>> {
    if params.q.as_deref().is_none_or(|q| q.trim().is_empty()) {
        return Err(AppError::Validation(
            "search query is required".to_string(),
        ));
    }

    let query = params.into_query()?;
    let pagination = query.pagination;

    let (products, total) = ProductRepository::new(state.pool()).list(&query).await?;

    Ok(ApiResponse::paginated(products, pagination, total))
}

/// Query parameters for the new-arrivals endpoint.
#[derive(Debug, Deserialize)]
pub struct NewArrivalsParams {
    pub limit: Option<i64>,
}

impl NewArrivalsParams {
    /// Requested limit clamped to [1, 50], defaulting to 8.
    fn effective_limit(&self) -> i64 {
        match self.limit {
            Some(limit) => limit.clamp(1, NEW_ARRIVALS_MAX),
            None => NEW_ARRIVALS_DEFAULT,
        }
    }
}

/// `GET /api/products/new-arrivals` - latest new arrivals, never more than
/// the requested limit.
#[instrument(skip(state))]
pub async fn new_arrivals(
    State(state): State<AppState>,
    Query(params): Query<NewArrivalsParams>,
) -> Result<ApiResponse<Vec<Product>>> {
    let products = ProductRepository::new(state.pool())
        .new_arrivals(params.effective_limit())
        .await?;

    Ok(ApiResponse::new(products))
}

/// Query parameters for the related-products endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedParams {
    pub product_id: Option<i32>,
    pub limit: Option<i64>,
}

/// `GET /api/products/related-products` - active, in-stock products from the
/// same category.
#[instrument(skip(state))]
pub async fn related(
    State(state): State<AppState>,
    Query(params): Query<RelatedParams>,
) -> Result<ApiResponse<Vec<Product>>> {
    let product_id = params
        .product_id
        .ok_or_else(|| AppError::Validation("productId is required".to_string()))?;

    let limit = params.limit.unwrap_or(RELATED_DEFAULT).clamp(1, RELATED_MAX);

    let products = ProductRepository::new(state.pool())
        .related(product_id.into(), limit)
        .await?;

    Ok(ApiResponse::new(products))
}

/// `GET /api/products/{slug}` - product detail with variants and images.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<ApiResponse<Product>> {
    let slug = Slug::parse(&slug)
        .map_err(|e| AppError::Validation(format!("invalid product slug: {e}")))?;

    let product = ProductRepository::new(state.pool())
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {slug}")))?;

    Ok(ApiResponse::new(product))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_inverted_price_range_rejected() {
        let params = ProductListParams {
            min_price: Some(Decimal::new(5000, 2)),
            max_price: Some(Decimal::new(1000, 2)),
            ..Default::default()
        };
        let err = params.into_query().unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(err.kind(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_negative_price_rejected() {
        let params = ProductListParams {
            min_price: Some(Decimal::new(-100, 2)),
            ..Default::default()
        };
        assert!(matches!(
            params.into_query(),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_equal_bounds_accepted() {
        let params = ProductListParams {
            min_price: Some(Decimal::new(1000, 2)),
            max_price: Some(Decimal::new(1000, 2)),
            ..Default::default()
        };
        assert!(params.into_query().is_ok());
    }

    #[test]
    fn test_unknown_sort_falls_back_to_newest() {
        let params = ProductListParams {
            sort: Some("nonsense-key".to_string()),
            ..Default::default()
        };
        let query = params.into_query().unwrap();
        assert_eq!(query.sort, SortKey::Newest);
    }

    #[test]
    fn test_blank_search_text_is_dropped() {
        let params = ProductListParams {
            q: Some("   ".to_string()),
            ..Default::default()
        };
        let query = params.into_query().unwrap();
        assert!(query.text.is_none());
    }

    #[test]
    fn test_new_arrivals_limit_clamped() {
        assert_eq!(NewArrivalsParams { limit: Some(1000) }.effective_limit(), 50);
        assert_eq!(NewArrivalsParams { limit: Some(0) }.effective_limit(), 1);
        assert_eq!(NewArrivalsParams { limit: Some(-5) }.effective_limit(), 1);
        assert_eq!(NewArrivalsParams { limit: Some(20) }.effective_limit(), 20);
    }

    #[test]
    fn test_new_arrivals_limit_defaults() {
        assert_eq!(NewArrivalsParams { limit: None }.effective_limit(), 8);
    }

    #[test]
    fn test_malformed_category_rejected() {
        let params = ProductListParams {
            category: Some("Not A Slug!".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            params.into_query(),
            Err(AppError::Validation(_))
        ));
    }
}
