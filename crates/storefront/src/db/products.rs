//! Product repository for catalog queries.
//!
//! All listing queries go through the dynamic filter in [`crate::db::query`];
//! the derived `inventory` column is summed from variants in SQL so it is
//! never stored redundantly.

use sqlx::{PgPool, Postgres, QueryBuilder};
use urban_echo_core::{ProductId, Slug};

use super::RepositoryError;
use super::query::ProductQuery;
use crate::models::{Product, ProductImage, ProductVariant};

/// Product columns for row mapping, including the computed inventory sum.
/// The product table must be aliased `p`.
const PRODUCT_COLUMNS: &str = "\
    p.id, p.name, p.slug, p.description, p.brand, p.price, p.compare_at_price, \
    p.category_slug, p.subcategory_slug, p.tags, \
    p.is_featured, p.is_new_arrival, p.is_on_sale, p.is_best_seller, p.is_active, \
    p.rating_average, p.review_count, \
    (SELECT COALESCE(SUM(v.quantity), 0)::BIGINT \
       FROM storefront.product_variant v \
      WHERE v.product_id = p.id) AS inventory, \
    p.created_at, p.updated_at";

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List products matching a query, with the total row count for
    /// pagination metadata.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if either query fails.
    pub async fn list(
        &self,
        query: &ProductQuery,
    ) -> Result<(Vec<Product>, i64), RepositoryError> {
        let mut builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new(format!("SELECT {PRODUCT_COLUMNS} FROM storefront.product p"));
        query.push_filters(&mut builder);
        query.push_order_and_window(&mut builder);

        let products = builder
            .build_query_as::<Product>()
            .fetch_all(self.pool)
            .await?;

        let mut count_builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM storefront.product p");
        query.push_filters(&mut count_builder);

        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(self.pool)
            .await?;

        Ok((products, total))
    }

    /// Get a product by slug, with variants and images loaded.
    ///
    /// Inactive products are not served.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn find_by_slug(&self, slug: &Slug) -> Result<Option<Product>, RepositoryError> {
        let row: Option<Product> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM storefront.product p \
             WHERE p.slug = $1 AND p.is_active"
        ))
        .bind(slug.as_str())
        .fetch_optional(self.pool)
        .await?;

        let Some(mut product) = row else {
            return Ok(None);
        };

        product.variants = self.variants(product.id).await?;
        product.images = self.images(product.id).await?;

        Ok(Some(product))
    }

    /// Get an active product by ID, with variants loaded.
    ///
    /// Used by the cart handlers to snapshot prices server-side.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row: Option<Product> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM storefront.product p \
             WHERE p.id = $1 AND p.is_active"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        let Some(mut product) = row else {
            return Ok(None);
        };

        product.variants = self.variants(product.id).await?;
        Ok(Some(product))
    }

    /// Most recent new arrivals (active products flagged `is_new_arrival`).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn new_arrivals(&self, limit: i64) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM storefront.product p \
             WHERE p.is_active AND p.is_new_arrival \
             ORDER BY p.created_at DESC \
             LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Products related to a given product.
    ///
    /// Same category, active, in stock, excluding the source product, newest
    /// first. A filtered query, not a similarity engine.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the source product does not
    /// exist, `RepositoryError::Database` if a query fails.
    pub async fn related(
        &self,
        product_id: ProductId,
        limit: i64,
    ) -> Result<Vec<Product>, RepositoryError> {
        let category: Option<String> =
            sqlx::query_scalar("SELECT category_slug FROM storefront.product WHERE id = $1")
                .bind(product_id)
                .fetch_optional(self.pool)
                .await?;

        let Some(category) = category else {
            return Err(RepositoryError::NotFound);
        };

        let products = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM storefront.product p \
             WHERE p.is_active \
               AND p.category_slug = $1 \
               AND p.id <> $2 \
               AND EXISTS (SELECT 1 FROM storefront.product_variant v \
                            WHERE v.product_id = p.id AND v.quantity > 0) \
             ORDER BY p.created_at DESC \
             LIMIT $3"
        ))
        .bind(category)
        .bind(product_id)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Load all variants for a product.
    async fn variants(&self, product_id: ProductId) -> Result<Vec<ProductVariant>, RepositoryError> {
        let variants = sqlx::query_as(
            "SELECT id, product_id, size, color, sku, quantity, price \
             FROM storefront.product_variant \
             WHERE product_id = $1 \
             ORDER BY id ASC",
        )
        .bind(product_id)
        .fetch_all(self.pool)
        .await?;

        Ok(variants)
    }

    /// Load all images for a product, primary first.
    async fn images(&self, product_id: ProductId) -> Result<Vec<ProductImage>, RepositoryError> {
        let images = sqlx::query_as(
            "SELECT url, alt, is_primary, display_order \
             FROM storefront.product_image \
             WHERE product_id = $1 \
             ORDER BY is_primary DESC, display_order ASC",
        )
        .bind(product_id)
        .fetch_all(self.pool)
        .await?;

        Ok(images)
    }
}
