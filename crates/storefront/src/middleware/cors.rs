//! CORS configuration for the JSON API.
//!
//! The storefront frontend is served from a different origin, so the API
//! needs an explicit CORS policy. Origins come from configuration; with no
//! configured origins the API allows any origin (local development).

use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

use crate::config::StorefrontConfig;

/// Create the CORS layer from configuration.
///
/// Configured origins that fail to parse as header values are skipped with a
/// warning rather than rejecting startup.
#[must_use]
pub fn create_cors_layer(config: &StorefrontConfig) -> CorsLayer {
    let allow_origin = config.cors_allowed_origins.as_ref().map_or(
        AllowOrigin::any(),
        |origins| {
            let values: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| {
                    HeaderValue::from_str(origin)
                        .inspect_err(|_| warn!(origin, "Skipping unparseable CORS origin"))
                        .ok()
                })
                .collect();
            AllowOrigin::list(values)
        },
    );

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
