//! Order repository.
//!
//! Order creation is the one multi-row write in the system: the order row
//! and its line snapshots are inserted in a single transaction. Inventory is
//! NOT decremented here - order completion and stock management are separate
//! concerns.

use chrono::Utc;
use sqlx::PgPool;
use urban_echo_core::{OrderId, UserId};

use super::RepositoryError;
use crate::models::{NewOrder, Order, OrderLine, order::generate_order_number};

const ORDER_COLUMNS: &str = "id, order_number, user_id, status, payment_status, \
     subtotal, shipping, tax, total, created_at, updated_at";

const LINE_COLUMNS: &str =
    "product_id, variant_id, product_name, size, color, sku, quantity, unit_price";

/// Attempts at generating a unique order number before giving up.
const ORDER_NUMBER_ATTEMPTS: u32 = 3;

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create an order with its line snapshots.
    ///
    /// Totals are computed from the lines; the generated order number is
    /// retried on the (rare) unique-constraint collision.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if no unique order number could be
    /// generated, `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new_order: &NewOrder) -> Result<Order, RepositoryError> {
        let mut last_err = None;

        for _ in 0..ORDER_NUMBER_ATTEMPTS {
            let order_number = generate_order_number(Utc::now());
            match self.try_create(new_order, &order_number).await {
                Ok(order) => return Ok(order),
                Err(RepositoryError::Conflict(msg)) => last_err = Some(msg),
                Err(other) => return Err(other),
            }
        }

        Err(RepositoryError::Conflict(
            last_err.unwrap_or_else(|| "order number collision".to_owned()),
        ))
    }

    async fn try_create(
        &self,
        new_order: &NewOrder,
        order_number: &str,
    ) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let mut order: Order = sqlx::query_as(&format!(
            "INSERT INTO storefront.\"order\" \
                 (order_number, user_id, subtotal, shipping, tax, total) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(order_number)
        .bind(new_order.user_id)
        .bind(new_order.subtotal())
        .bind(new_order.shipping)
        .bind(new_order.tax)
        .bind(new_order.total())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("order number already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        for line in &new_order.lines {
            sqlx::query(
                "INSERT INTO storefront.order_line \
                     (order_id, product_id, variant_id, product_name, \
                      size, color, sku, quantity, unit_price) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
            )
            .bind(order.id)
            .bind(line.product_id)
            .bind(line.variant_id)
            .bind(&line.product_name)
            .bind(&line.size)
            .bind(&line.color)
            .bind(&line.sku)
            .bind(line.quantity)
            .bind(line.unit_price)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        order.lines = self.lines(order.id).await?;
        Ok(order)
    }

    /// Get an order by its order number, with lines loaded.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_by_number(&self, order_number: &str) -> Result<Option<Order>, RepositoryError> {
        let order: Option<Order> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM storefront.\"order\" WHERE order_number = $1"
        ))
        .bind(order_number)
        .fetch_optional(self.pool)
        .await?;

        let Some(mut order) = order else {
            return Ok(None);
        };

        order.lines = self.lines(order.id).await?;
        Ok(Some(order))
    }

    /// All orders for a user, newest first, with lines loaded.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let mut orders: Vec<Order> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM storefront.\"order\" \
             WHERE user_id = $1 \
             ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        for order in &mut orders {
            order.lines = self.lines(order.id).await?;
        }

        Ok(orders)
    }

    async fn lines(&self, order_id: OrderId) -> Result<Vec<OrderLine>, RepositoryError> {
        let lines = sqlx::query_as(&format!(
            "SELECT {LINE_COLUMNS} FROM storefront.order_line \
             WHERE order_id = $1 \
             ORDER BY id ASC"
        ))
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        Ok(lines)
    }
}
