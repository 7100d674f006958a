//! Order route handlers.
//!
//! Checkout turns the session cart into a persisted order. Variant snapshots
//! (size/color/SKU/price) are resolved from the catalog at checkout time, not
//! taken from the client.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use urban_echo_core::Email;

use crate::cart::CartState;
use crate::db::{OrderRepository, ProductRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::models::{NewOrder, NewOrderLine, Order};
use crate::response::ApiResponse;
use crate::routes::cart::{load_cart, save_cart};
use crate::state::AppState;

/// Checkout request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub email: String,
    #[serde(default)]
    pub shipping: Decimal,
    #[serde(default)]
    pub tax: Decimal,
}

/// `POST /api/orders` - place an order from the session cart.
///
/// Finds or creates the user by email, snapshots each cart line against the
/// catalog, and clears the cart once the order is committed.
#[instrument(skip(state, session, request))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<CheckoutRequest>,
) -> Result<ApiResponse<Order>> {
    let email = Email::parse(&request.email)
        .map_err(|e| AppError::Validation(format!("invalid email: {e}")))?;

    if request.shipping < Decimal::ZERO || request.tax < Decimal::ZERO {
        return Err(AppError::Validation(
            "shipping and tax must not be negative".to_string(),
        ));
    }

    let cart = load_cart(&session).await?;
    if cart.is_empty() {
        return Err(AppError::Validation("cart is empty".to_string()));
    }

    let lines = snapshot_lines(&state, &cart).await?;

    let users = UserRepository::new(state.pool());
    let user = match users.get_by_email(&email).await? {
        Some(user) => user,
        None => users.create(&email, None).await?,
    };

    let order = OrderRepository::new(state.pool())
        .create(&NewOrder {
            user_id: user.id,
            lines,
            shipping: request.shipping,
            tax: request.tax,
        })
        .await?;

    save_cart(&session, &CartState::default()).await?;

    Ok(ApiResponse::new(order))
}

/// Resolve each cart line to a variant snapshot from the catalog.
async fn snapshot_lines(state: &AppState, cart: &CartState) -> Result<Vec<NewOrderLine>> {
    let products = ProductRepository::new(state.pool());
    let mut lines = Vec::with_capacity(cart.lines.len());

    for line in &cart.lines {
        let variant_id = line.variant_id.ok_or_else(|| {
            AppError::Validation(format!(
                "cart line for {} has no variant selected",
                line.name
            ))
        })?;

        let product = products
            .find_by_id(line.product_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("product {}", line.product_id)))?;

        let variant = product
            .variants
            .iter()
            .find(|v| v.id == variant_id)
            .ok_or_else(|| AppError::Validation(format!("unknown variant {variant_id}")))?;

        let quantity = i32::try_from(line.quantity)
            .map_err(|_| AppError::Validation("quantity out of range".to_string()))?;

        lines.push(NewOrderLine {
            product_id: product.id,
            variant_id,
            product_name: product.name.clone(),
            size: variant.size.clone(),
            color: variant.color.clone(),
            sku: variant.sku.clone(),
            quantity,
            unit_price: variant.price.unwrap_or(product.price),
        });
    }

    Ok(lines)
}

/// Query parameters for `GET /api/orders`.
#[derive(Debug, Deserialize)]
pub struct OrderListParams {
    pub email: String,
}

/// `GET /api/orders?email=..` - a customer's order history, newest first.
///
/// An unknown email yields an empty list, not a 404.
#[instrument(skip(state, params))]
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<OrderListParams>,
) -> Result<ApiResponse<Vec<Order>>> {
    let email = Email::parse(&params.email)
        .map_err(|e| AppError::Validation(format!("invalid email: {e}")))?;

    let Some(user) = UserRepository::new(state.pool()).get_by_email(&email).await? else {
        return Ok(ApiResponse::new(Vec::new()));
    };

    let orders = OrderRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;

    Ok(ApiResponse::new(orders))
}

/// `GET /api/orders/{number}` - look up an order by its generated number.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(number): Path<String>,
) -> Result<ApiResponse<Order>> {
    let order = OrderRepository::new(state.pool())
        .get_by_number(&number)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {number}")))?;

    Ok(ApiResponse::new(order))
}
