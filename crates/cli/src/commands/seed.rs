//! Seed the catalog from a YAML file.
//!
//! The file carries categories and products (with variants and images). The
//! whole file is parsed and validated before the database connection is
//! opened, so a malformed catalog never leaves a half-seeded database.

use std::collections::HashMap;
use std::path::Path;

use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use serde::Deserialize;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{error, info};
use urban_echo_core::Slug;

use super::migrate::database_url;

/// A YAML catalog: categories first, then products referencing them.
#[derive(Debug, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub categories: Vec<CategorySpec>,
    #[serde(default)]
    pub products: Vec<ProductSpec>,
}

#[derive(Debug, Deserialize)]
pub struct CategorySpec {
    pub name: String,
    pub slug: String,
    pub parent: Option<String>,
    #[serde(default)]
    pub display_order: i32,
}

#[derive(Debug, Deserialize)]
pub struct ProductSpec {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    pub brand: Option<String>,
    pub price: Decimal,
    pub compare_at_price: Option<Decimal>,
    pub category: String,
    pub subcategory: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub new_arrival: bool,
    #[serde(default)]
    pub on_sale: bool,
    #[serde(default)]
    pub best_seller: bool,
    #[serde(default)]
    pub variants: Vec<VariantSpec>,
    #[serde(default)]
    pub images: Vec<ImageSpec>,
}

#[derive(Debug, Deserialize)]
pub struct VariantSpec {
    pub size: String,
    pub color: String,
    pub sku: String,
    #[serde(default)]
    pub quantity: i32,
    pub price: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
pub struct ImageSpec {
    pub url: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default)]
    pub primary: bool,
}

/// Seed categories and products from a YAML catalog file.
///
/// # Arguments
///
/// * `file_path` - Path to the YAML catalog file
/// * `clear_existing` - If true, delete existing catalog rows first
///
/// # Errors
///
/// Returns an error if the environment is missing the database URL, the file
/// cannot be read or parsed, validation fails, or an insert fails.
pub async fn catalog(
    file_path: &str,
    clear_existing: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = database_url()?;

    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading catalog from file");

    // Read and validate YAML before connecting to the database
    let content = tokio::fs::read_to_string(path).await?;
    let catalog: Catalog = serde_yaml::from_str(&content)?;

    let errors = validate_catalog(&catalog);
    if !errors.is_empty() {
        error!("Catalog validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(format!("{} validation errors found", errors.len()).into());
    }

    info!(
        categories = catalog.categories.len(),
        products = catalog.products.len(),
        "Catalog validated"
    );

    let pool = PgPool::connect(database_url.expose_secret()).await?;
    info!("Connected to database");

    let mut tx = pool.begin().await?;

    if clear_existing {
        info!("Clearing existing catalog...");
        sqlx::query("DELETE FROM storefront.product").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM storefront.category").execute(&mut *tx).await?;
    }

    insert_categories(&mut tx, &catalog.categories).await?;
    let variant_count = insert_products(&mut tx, &catalog.products).await?;

    tx.commit().await?;

    info!("Seeding complete!");
    info!("  Categories inserted: {}", catalog.categories.len());
    info!("  Products inserted: {}", catalog.products.len());
    info!("  Variants inserted: {variant_count}");

    Ok(())
}

/// Check slugs, category references, and duplicate SKUs before touching the
/// database.
fn validate_catalog(catalog: &Catalog) -> Vec<String> {
    let mut errors = Vec::new();

    let category_slugs: Vec<&str> = catalog
        .categories
        .iter()
        .map(|c| c.slug.as_str())
        .collect();

    for category in &catalog.categories {
        if let Err(e) = Slug::parse(&category.slug) {
            errors.push(format!("category '{}': {e}", category.name));
        }
        if let Some(parent) = &category.parent
            && !category_slugs.contains(&parent.as_str())
        {
            errors.push(format!(
                "category '{}': unknown parent '{parent}'",
                category.name
            ));
        }
    }

    let mut seen_skus: Vec<&str> = Vec::new();
    for product in &catalog.products {
        if let Err(e) = Slug::parse(&product.slug) {
            errors.push(format!("product '{}': {e}", product.name));
        }
        if !category_slugs.contains(&product.category.as_str()) {
            errors.push(format!(
                "product '{}': unknown category '{}'",
                product.name, product.category
            ));
        }
        if product.price < Decimal::ZERO {
            errors.push(format!("product '{}': negative price", product.name));
        }
        for variant in &product.variants {
            if seen_skus.contains(&variant.sku.as_str()) {
                errors.push(format!(
                    "product '{}': duplicate SKU '{}'",
                    product.name, variant.sku
                ));
            }
            seen_skus.push(&variant.sku);
        }
    }

    errors
}

/// Insert categories with level and path computed from the parent chain.
async fn insert_categories(
    tx: &mut Transaction<'_, Postgres>,
    categories: &[CategorySpec],
) -> Result<(), sqlx::Error> {
    // Parent -> (level, path); filled as rows are inserted, so parents must
    // appear before their children in the file
    let mut placed: HashMap<&str, (i32, String)> = HashMap::new();

    for category in categories {
        let (level, path) = match category.parent.as_deref() {
            Some(parent) => {
                let (parent_level, parent_path) = placed
                    .get(parent)
                    .cloned()
                    .unwrap_or((0, parent.to_string()));
                (parent_level + 1, format!("{parent_path}/{}", category.slug))
            }
            None => (0, category.slug.clone()),
        };

        sqlx::query(
            "INSERT INTO storefront.category \
                 (name, slug, parent_slug, level, path, display_order) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (slug) DO UPDATE SET \
                 name = EXCLUDED.name, \
                 parent_slug = EXCLUDED.parent_slug, \
                 level = EXCLUDED.level, \
                 path = EXCLUDED.path, \
                 display_order = EXCLUDED.display_order",
        )
        .bind(&category.name)
        .bind(&category.slug)
        .bind(category.parent.as_deref())
        .bind(level)
        .bind(&path)
        .bind(category.display_order)
        .execute(&mut **tx)
        .await?;

        placed.insert(&category.slug, (level, path));
    }

    Ok(())
}

/// Insert products with their variants and images. Returns the variant count.
async fn insert_products(
    tx: &mut Transaction<'_, Postgres>,
    products: &[ProductSpec],
) -> Result<usize, sqlx::Error> {
    let mut variant_count = 0;

    for product in products {
        let product_id: i32 = sqlx::query_scalar(
            "INSERT INTO storefront.product \
                 (name, slug, description, brand, price, compare_at_price, \
                  category_slug, subcategory_slug, tags, \
                  is_featured, is_new_arrival, is_on_sale, is_best_seller) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             ON CONFLICT (slug) DO UPDATE SET \
                 name = EXCLUDED.name, \
                 description = EXCLUDED.description, \
                 price = EXCLUDED.price, \
                 updated_at = now() \
             RETURNING id",
        )
        .bind(&product.name)
        .bind(&product.slug)
        .bind(&product.description)
        .bind(product.brand.as_deref())
        .bind(product.price)
        .bind(product.compare_at_price)
        .bind(&product.category)
        .bind(product.subcategory.as_deref())
        .bind(&product.tags)
        .bind(product.featured)
        .bind(product.new_arrival)
        .bind(product.on_sale)
        .bind(product.best_seller)
        .fetch_one(&mut **tx)
        .await?;

        for variant in &product.variants {
            sqlx::query(
                "INSERT INTO storefront.product_variant \
                     (product_id, size, color, sku, quantity, price) \
                 VALUES ($1, $2, $3, $4, $5, $6) \
                 ON CONFLICT (sku) DO UPDATE SET \
                     quantity = EXCLUDED.quantity, \
                     price = EXCLUDED.price",
            )
            .bind(product_id)
            .bind(&variant.size)
            .bind(&variant.color)
            .bind(&variant.sku)
            .bind(variant.quantity)
            .bind(variant.price)
            .execute(&mut **tx)
            .await?;
            variant_count += 1;
        }

        for (order, image) in product.images.iter().enumerate() {
            sqlx::query(
                "INSERT INTO storefront.product_image \
                     (product_id, url, alt, is_primary, display_order) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(product_id)
            .bind(&image.url)
            .bind(&image.alt)
            .bind(image.primary)
            .bind(i32::try_from(order).unwrap_or(i32::MAX))
            .execute(&mut **tx)
            .await?;
        }
    }

    Ok(variant_count)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
categories:
  - name: Men
    slug: men
  - name: Jackets
    slug: jackets
    parent: men
    display_order: 2
products:
  - name: Classic Denim Jacket
    slug: classic-denim-jacket
    description: A timeless layer.
    brand: Urban Echo
    price: "89.99"
    category: men
    subcategory: jackets
    tags: [denim, outerwear]
    new_arrival: true
    variants:
      - size: M
        color: Indigo
        sku: JKT-M-IND
        quantity: 5
    images:
      - url: https://cdn.urbanecho.shop/jkt.jpg
        alt: Denim jacket
        primary: true
"#;

    #[test]
    fn test_sample_catalog_parses_and_validates() {
        let catalog: Catalog = serde_yaml::from_str(SAMPLE).unwrap();
        assert_eq!(catalog.categories.len(), 2);
        assert_eq!(catalog.products.len(), 1);
        assert_eq!(catalog.products[0].price, Decimal::new(8999, 2));
        assert!(validate_catalog(&catalog).is_empty());
    }

    #[test]
    fn test_unknown_category_reference_rejected() {
        let catalog: Catalog = serde_yaml::from_str(
            r#"
products:
  - name: Orphan
    slug: orphan
    price: "10.00"
    category: nowhere
"#,
        )
        .unwrap();
        let errors = validate_catalog(&catalog);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("unknown category"));
    }

    #[test]
    fn test_duplicate_sku_rejected() {
        let catalog: Catalog = serde_yaml::from_str(
            r#"
categories:
  - name: Men
    slug: men
products:
  - name: Tee
    slug: tee
    price: "19.99"
    category: men
    variants:
      - { size: M, color: Black, sku: TEE-1 }
      - { size: L, color: Black, sku: TEE-1 }
"#,
        )
        .unwrap();
        let errors = validate_catalog(&catalog);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("duplicate SKU"));
    }

    #[test]
    fn test_bad_slug_rejected() {
        let catalog: Catalog = serde_yaml::from_str(
            r#"
categories:
  - name: Men
    slug: "Not A Slug"
"#,
        )
        .unwrap();
        assert!(!validate_catalog(&catalog).is_empty());
    }
}
