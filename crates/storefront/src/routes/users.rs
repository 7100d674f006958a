//! Account route handlers: persisted wishlist and saved addresses.
//!
//! Unlike the session wishlist, these entries are stored against the user
//! and survive across devices. Accounts are created at checkout; there is no
//! authentication layer in front of these routes yet (the frontend passes
//! the user ID it received when the account was created).

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use tracing::instrument;
use urban_echo_core::{ProductId, UserId};

use crate::db::UserRepository;
use crate::error::{AppError, Result};
use crate::models::{Address, WishlistEntry};
use crate::response::ApiResponse;
use crate::state::AppState;

/// Look up the user or fail with 404.
async fn require_user(repo: &UserRepository<'_>, id: UserId) -> Result<()> {
    repo.get_by_id(id)
        .await?
        .map(|_| ())
        .ok_or_else(|| AppError::NotFound(format!("user {id}")))
}

/// `GET /api/users/{id}/wishlist` - saved products, newest first.
#[instrument(skip(state))]
pub async fn wishlist(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<ApiResponse<Vec<WishlistEntry>>> {
    let repo = UserRepository::new(state.pool());
    let user_id = UserId::from(id);
    require_user(&repo, user_id).await?;

    let entries = repo.wishlist(user_id).await?;
    Ok(ApiResponse::new(entries))
}

/// `GET /api/users/{id}/addresses` - saved addresses, default first.
#[instrument(skip(state))]
pub async fn addresses(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<ApiResponse<Vec<Address>>> {
    let repo = UserRepository::new(state.pool());
    let user_id = UserId::from(id);
    require_user(&repo, user_id).await?;

    let addresses = repo.addresses(user_id).await?;
    Ok(ApiResponse::new(addresses))
}

/// Account wishlist mutation request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountWishlistRequest {
    pub product_id: i32,
}

/// `POST /api/users/{id}/wishlist/add` - save a product. Idempotent.
#[instrument(skip(state))]
pub async fn wishlist_add(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<AccountWishlistRequest>,
) -> Result<ApiResponse<Vec<WishlistEntry>>> {
    let repo = UserRepository::new(state.pool());
    let user_id = UserId::from(id);
    require_user(&repo, user_id).await?;

    repo.wishlist_add(user_id, ProductId::from(request.product_id))
        .await?;

    let entries = repo.wishlist(user_id).await?;
    Ok(ApiResponse::new(entries))
}

/// `POST /api/users/{id}/wishlist/remove` - remove a saved product.
#[instrument(skip(state))]
pub async fn wishlist_remove(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<AccountWishlistRequest>,
) -> Result<ApiResponse<Vec<WishlistEntry>>> {
    let repo = UserRepository::new(state.pool());
    let user_id = UserId::from(id);
    require_user(&repo, user_id).await?;

    if !repo
        .wishlist_remove(user_id, ProductId::from(request.product_id))
        .await?
    {
        return Err(AppError::Validation("product not in wishlist".to_string()));
    }

    let entries = repo.wishlist(user_id).await?;
    Ok(ApiResponse::new(entries))
}
