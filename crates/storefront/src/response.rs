//! JSON response envelopes.
//!
//! Every successful response is wrapped in the same envelope:
//!
//! ```json
//! { "success": true, "data": ..., "meta": { "timestamp": "..." } }
//! ```
//!
//! List endpoints add a `pagination` block. Failures use the matching
//! envelope in [`crate::error`].

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Serialize;

use crate::cms::types::ContentSource;
use crate::db::query::Pagination;

/// Success envelope for a single payload.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationMeta>,
    pub meta: ResponseMeta,
}

/// Envelope metadata: response timestamp plus, for content endpoints,
/// whether the payload came from the live CMS or the static fallback.
#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    /// RFC 3339 timestamp of when the response was produced.
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<ContentSource>,
}

/// Pagination block for list responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: u32,
    pub limit: u32,
    pub total: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationMeta {
    /// Build the block from the clamped request window and the total row
    /// count reported by the repository.
    #[must_use]
    pub fn new(pagination: Pagination, total: i64) -> Self {
        let total_pages = pagination.total_pages(total);
        Self {
            page: pagination.page(),
            limit: pagination.limit(),
            total,
            total_pages,
            has_next: i64::from(pagination.page()) < total_pages,
            has_prev: pagination.page() > 1,
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    /// A plain success response.
    #[must_use]
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
            pagination: None,
            meta: ResponseMeta {
                timestamp: Utc::now().to_rfc3339(),
                source: None,
            },
        }
    }

    /// A success response carrying a pagination block.
    #[must_use]
    pub fn paginated(data: T, pagination: Pagination, total: i64) -> Self {
        Self {
            pagination: Some(PaginationMeta::new(pagination, total)),
            ..Self::new(data)
        }
    }

    /// A success response tagged with its content source.
    #[must_use]
    pub fn with_source(data: T, source: ContentSource) -> Self {
        let mut response = Self::new(data);
        response.meta.source = Some(source);
        response
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_shape() {
        let response = ApiResponse::new(vec!["a", "b"]);
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["success"], true);
        assert_eq!(value["data"][0], "a");
        assert!(value["meta"]["timestamp"].is_string());
        // No pagination or source unless requested
        assert!(value.get("pagination").is_none());
        assert!(value["meta"].get("source").is_none());
    }

    #[test]
    fn test_pagination_meta() {
        let window = Pagination::clamp(Some(2), Some(12));
        let meta = PaginationMeta::new(window, 30);

        assert_eq!(meta.page, 2);
        assert_eq!(meta.limit, 12);
        assert_eq!(meta.total, 30);
        assert_eq!(meta.total_pages, 3);
        assert!(meta.has_next);
        assert!(meta.has_prev);
    }

    #[test]
    fn test_pagination_meta_first_and_last_page() {
        let first = PaginationMeta::new(Pagination::clamp(Some(1), Some(10)), 25);
        assert!(first.has_next);
        assert!(!first.has_prev);

        let last = PaginationMeta::new(Pagination::clamp(Some(3), Some(10)), 25);
        assert!(!last.has_next);
        assert!(last.has_prev);
    }

    #[test]
    fn test_source_serializes_in_meta() {
        let response = ApiResponse::with_source("hero", ContentSource::Fallback);
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["meta"]["source"], "fallback");
    }

    #[test]
    fn test_paginated_envelope_uses_camel_case() {
        let response =
            ApiResponse::paginated(Vec::<String>::new(), Pagination::clamp(None, None), 0);
        let value = serde_json::to_value(&response).unwrap();
        let pagination = &value["pagination"];
        assert!(pagination.get("totalPages").is_some());
        assert!(pagination.get("hasNext").is_some());
        assert!(pagination.get("hasPrev").is_some());
    }
}
