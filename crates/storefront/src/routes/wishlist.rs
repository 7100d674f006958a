//! Guest wishlist route handlers.
//!
//! Guest wishlists live in the session under [`USER_STORAGE_KEY`]. The
//! account-persisted wishlist is served by the `/api/users/{id}/wishlist`
//! routes instead.

use axum::Json;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use urban_echo_core::ProductId;

use crate::cart::{USER_STORAGE_KEY, WishlistState};
use crate::error::{AppError, Result};
use crate::response::ApiResponse;

/// Load the wishlist from the session, defaulting to empty.
async fn load_wishlist(session: &Session) -> Result<WishlistState> {
    Ok(session
        .get::<WishlistState>(USER_STORAGE_KEY)
        .await?
        .unwrap_or_default())
}

/// Write the wishlist back to the session.
async fn save_wishlist(session: &Session, wishlist: &WishlistState) -> Result<()> {
    session.insert(USER_STORAGE_KEY, wishlist).await?;
    Ok(())
}

/// `GET /api/wishlist` - the current wishlist.
#[instrument(skip_all)]
pub async fn show(session: Session) -> Result<ApiResponse<WishlistState>> {
    let wishlist = load_wishlist(&session).await?;
    Ok(ApiResponse::new(wishlist))
}

/// Wishlist mutation request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistRequest {
    pub product_id: i32,
}

/// `POST /api/wishlist/add` - save a product. Idempotent.
#[instrument(skip(session))]
pub async fn add(
    session: Session,
    Json(request): Json<WishlistRequest>,
) -> Result<ApiResponse<WishlistState>> {
    let mut wishlist = load_wishlist(&session).await?;
    wishlist.add(ProductId::from(request.product_id));
    save_wishlist(&session, &wishlist).await?;

    Ok(ApiResponse::new(wishlist))
}

/// `POST /api/wishlist/remove` - remove a saved product.
#[instrument(skip(session))]
pub async fn remove(
    session: Session,
    Json(request): Json<WishlistRequest>,
) -> Result<ApiResponse<WishlistState>> {
    let mut wishlist = load_wishlist(&session).await?;
    if !wishlist.remove(ProductId::from(request.product_id)) {
        return Err(AppError::Validation("product not in wishlist".to_string()));
    }
    save_wishlist(&session, &wishlist).await?;

    Ok(ApiResponse::new(wishlist))
}
