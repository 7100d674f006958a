//! Cart route handlers.
//!
//! The cart lives in the visitor's session under [`CART_STORAGE_KEY`]. Prices
//! are snapshotted server-side from the catalog at add time; the client never
//! supplies a price.

use axum::{
    Json,
    extract::State,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::cart::{CART_STORAGE_KEY, CartLine, CartState};
use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::response::ApiResponse;
use crate::state::AppState;
use urban_echo_core::{ProductId, VariantId};

/// Cart payload returned by every cart endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub subtotal: Decimal,
    pub total_quantity: u32,
}

impl From<CartState> for CartView {
    fn from(cart: CartState) -> Self {
        let subtotal = cart.subtotal();
        let total_quantity = cart.total_quantity();
        Self {
            lines: cart.lines,
            subtotal,
            total_quantity,
        }
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Load the cart from the session, defaulting to empty.
pub(crate) async fn load_cart(session: &Session) -> Result<CartState> {
    Ok(session
        .get::<CartState>(CART_STORAGE_KEY)
        .await?
        .unwrap_or_default())
}

/// Write the cart back to the session.
pub(crate) async fn save_cart(session: &Session, cart: &CartState) -> Result<()> {
    session.insert(CART_STORAGE_KEY, cart).await?;
    Ok(())
}

/// `GET /api/cart` - the current cart.
#[instrument(skip_all)]
pub async fn show(session: Session) -> Result<ApiResponse<CartView>> {
    let cart = load_cart(&session).await?;
    Ok(ApiResponse::new(cart.into()))
}

/// Add-to-cart request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub product_id: i32,
    pub variant_id: Option<i32>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

const fn default_quantity() -> u32 {
    1
}

/// `POST /api/cart/add` - add an item, merging with an existing line for the
/// same product and variant.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<AddItemRequest>,
) -> Result<ApiResponse<CartView>> {
    let product_id = ProductId::from(request.product_id);
    let variant_id = request.variant_id.map(VariantId::from);

    let product = ProductRepository::new(state.pool())
        .find_by_id(product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))?;

    if !product.in_stock() {
        return Err(AppError::Validation(format!(
            "{} is out of stock",
            product.name
        )));
    }

    // Variant price override wins when the variant exists and sets one
    let unit_price = match variant_id {
        Some(id) => {
            let variant = product
                .variants
                .iter()
                .find(|v| v.id == id)
                .ok_or_else(|| AppError::Validation(format!("unknown variant {id}")))?;
            variant.price.unwrap_or(product.price)
        }
        None => product.price,
    };

    let mut cart = load_cart(&session).await?;
    cart.add_item(CartLine {
        product_id,
        variant_id,
        name: product.name,
        unit_price,
        quantity: request.quantity,
    })?;
    save_cart(&session, &cart).await?;

    Ok(ApiResponse::new(cart.into()))
}

/// Update/remove request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    pub product_id: i32,
    pub variant_id: Option<i32>,
    #[serde(default)]
    pub quantity: i64,
}

/// `POST /api/cart/update` - set a line's quantity; below 1 removes it.
#[instrument(skip(session))]
pub async fn update(
    session: Session,
    Json(request): Json<UpdateItemRequest>,
) -> Result<ApiResponse<CartView>> {
    let mut cart = load_cart(&session).await?;
    cart.update_quantity(
        request.product_id.into(),
        request.variant_id.map(Into::into),
        request.quantity,
    )?;
    save_cart(&session, &cart).await?;

    Ok(ApiResponse::new(cart.into()))
}

/// `POST /api/cart/remove` - remove a line.
#[instrument(skip(session))]
pub async fn remove(
    session: Session,
    Json(request): Json<UpdateItemRequest>,
) -> Result<ApiResponse<CartView>> {
    let mut cart = load_cart(&session).await?;
    if !cart.remove_item(
        request.product_id.into(),
        request.variant_id.map(Into::into),
    ) {
        return Err(AppError::Validation("item not in cart".to_string()));
    }
    save_cart(&session, &cart).await?;

    Ok(ApiResponse::new(cart.into()))
}

/// `POST /api/cart/clear` - empty the cart.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<ApiResponse<CartView>> {
    let mut cart = load_cart(&session).await?;
    cart.clear();
    save_cart(&session, &cart).await?;
    Ok(ApiResponse::new(cart.into()))
}
