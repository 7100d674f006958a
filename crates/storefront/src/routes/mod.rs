//! HTTP route handlers for the storefront JSON API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness check
//! GET  /health/ready                    - Readiness check (DB ping)
//!
//! # Products
//! GET  /api/products                    - Filtered/sorted/paginated listing
//! GET  /api/products/search             - Text search (requires q)
//! GET  /api/products/new-arrivals       - Latest new arrivals (limit <= 50)
//! GET  /api/products/related-products   - Same-category, in-stock products
//! GET  /api/products/{slug}             - Product detail with variants/images
//!
//! # Categories
//! GET  /api/categories                  - Navigation category list
//! GET  /api/categories/{slug}           - Category with breadcrumb trail
//!
//! # Orders
//! POST /api/orders                      - Checkout from the session cart
//! GET  /api/orders?email=..             - Order history for a customer
//! GET  /api/orders/{number}             - Order lookup by number
//!
//! # Accounts
//! GET  /api/users/{id}/wishlist         - Account wishlist (persisted)
//! POST /api/users/{id}/wishlist/add     - Save a product to the account
//! POST /api/users/{id}/wishlist/remove  - Remove a product from the account
//! GET  /api/users/{id}/addresses        - Saved addresses, default first
//!
//! # Content (CMS with static fallback)
//! GET  /api/content/hero                - Hero section
//! GET  /api/content/about               - About-page content
//! GET  /api/content/page-config         - Per-page config (?page=<key>)
//!
//! # Cart (session-backed)
//! GET  /api/cart                        - Current cart
//! POST /api/cart/add                    - Add item (merges by product+variant)
//! POST /api/cart/update                 - Set quantity (< 1 removes)
//! POST /api/cart/remove                 - Remove item
//! POST /api/cart/clear                  - Empty the cart
//!
//! # Wishlist (session-backed)
//! GET  /api/wishlist                    - Current wishlist
//! POST /api/wishlist/add                - Save a product (idempotent)
//! POST /api/wishlist/remove             - Remove a product
//!
//! # Telemetry
//! POST /api/errors                      - Client error report collector (202)
//! ```

pub mod cart;
pub mod categories;
pub mod content;
pub mod errors;
pub mod health;
pub mod orders;
pub mod products;
pub mod users;
pub mod wishlist;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::list))
        .route("/search", get(products::search))
        .route("/new-arrivals", get(products::new_arrivals))
        .route("/related-products", get(products::related))
        .route("/{slug}", get(products::show))
}

/// Create the content routes router.
pub fn content_routes() -> Router<AppState> {
    Router::new()
        .route("/hero", get(content::hero))
        .route("/about", get(content::about))
        .route("/page-config", get(content::page_config))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::show))
        .route("/add", post(wishlist::add))
        .route("/remove", post(wishlist::remove))
}

/// Create all routes for the storefront API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .nest("/api/products", product_routes())
        .route("/api/categories", get(categories::list))
        .route("/api/categories/{slug}", get(categories::show))
        .route("/api/orders", post(orders::create).get(orders::index))
        .route("/api/orders/{number}", get(orders::show))
        .route("/api/users/{id}/wishlist", get(users::wishlist))
        .route("/api/users/{id}/wishlist/add", post(users::wishlist_add))
        .route(
            "/api/users/{id}/wishlist/remove",
            post(users::wishlist_remove),
        )
        .route("/api/users/{id}/addresses", get(users::addresses))
        .nest("/api/content", content_routes())
        .nest("/api/cart", cart_routes())
        .nest("/api/wishlist", wishlist_routes())
        .route("/api/errors", post(errors::report))
}
