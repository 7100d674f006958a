//! Product, variant, and image models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use urban_echo_core::{ProductId, Slug, VariantId};

/// A catalog product.
///
/// `inventory` is a derived value - the sum of variant quantities, computed
/// in SQL at read time and never stored on the product row. Listing queries
/// leave `variants` and `images` empty; the detail query fills them.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub slug: Slug,
    pub description: String,
    pub brand: Option<String>,
    pub price: Decimal,
    pub compare_at_price: Option<Decimal>,
    pub category_slug: String,
    pub subcategory_slug: Option<String>,
    pub tags: Vec<String>,
    pub is_featured: bool,
    pub is_new_arrival: bool,
    pub is_on_sale: bool,
    pub is_best_seller: bool,
    pub is_active: bool,
    pub rating_average: f64,
    pub review_count: i32,
    /// Sum of variant quantities (computed in the query, not stored).
    pub inventory: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[sqlx(skip)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<ProductVariant>,
    #[sqlx(skip)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<ProductImage>,
}

impl Product {
    /// Whether any variant has stock.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.inventory > 0
    }
}

/// A size/color/SKU/inventory combination of a product.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    pub id: VariantId,
    pub product_id: ProductId,
    pub size: String,
    pub color: String,
    pub sku: String,
    pub quantity: i32,
    /// Variant-level price override; the product price applies when absent.
    pub price: Option<Decimal>,
}

/// A product image.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    pub url: String,
    pub alt: String,
    pub is_primary: bool,
    pub display_order: i32,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_product() -> Product {
        Product {
            id: ProductId::new(1),
            name: "Classic Denim Jacket".to_string(),
            slug: Slug::parse("classic-denim-jacket").unwrap(),
            description: "A timeless layer".to_string(),
            brand: Some("Urban Echo".to_string()),
            price: Decimal::new(8999, 2),
            compare_at_price: None,
            category_slug: "men".to_string(),
            subcategory_slug: Some("jackets".to_string()),
            tags: vec!["denim".to_string()],
            is_featured: true,
            is_new_arrival: false,
            is_on_sale: false,
            is_best_seller: false,
            is_active: true,
            rating_average: 4.5,
            review_count: 12,
            inventory: 7,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            variants: Vec::new(),
            images: Vec::new(),
        }
    }

    #[test]
    fn test_in_stock() {
        let mut product = sample_product();
        assert!(product.in_stock());
        product.inventory = 0;
        assert!(!product.in_stock());
    }

    #[test]
    fn test_serializes_camel_case_without_empty_children() {
        let product = sample_product();
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["isNewArrival"], false);
        assert_eq!(json["ratingAverage"], 4.5);
        // Empty variants/images are omitted from list responses
        assert!(json.get("variants").is_none());
        assert!(json.get("images").is_none());
    }
}
