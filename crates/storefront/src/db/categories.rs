//! Category repository for navigation and breadcrumbs.

use sqlx::PgPool;
use urban_echo_core::Slug;

use super::RepositoryError;
use crate::models::Category;

const CATEGORY_COLUMNS: &str =
    "id, name, slug, parent_slug, level, path, display_order, is_active";

/// Repository for category database operations.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Active categories in navigation order (level, then display order).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn navigation(&self) -> Result<Vec<Category>, RepositoryError> {
        let categories = sqlx::query_as(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM storefront.category \
             WHERE is_active \
             ORDER BY level ASC, display_order ASC, name ASC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(categories)
    }

    /// Get a category by its slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_slug(&self, slug: &Slug) -> Result<Option<Category>, RepositoryError> {
        let category = sqlx::query_as(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM storefront.category WHERE slug = $1"
        ))
        .bind(slug.as_str())
        .fetch_optional(self.pool)
        .await?;

        Ok(category)
    }

    /// Categories along a breadcrumb trail, root first.
    ///
    /// Resolves each segment of the materialized path to its category row;
    /// segments with no matching row are skipped.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn breadcrumb(&self, category: &Category) -> Result<Vec<Category>, RepositoryError> {
        let segments: Vec<String> = category
            .breadcrumb()
            .into_iter()
            .map(str::to_owned)
            .collect();

        let mut trail: Vec<Category> = sqlx::query_as(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM storefront.category WHERE slug = ANY($1)"
        ))
        .bind(&segments)
        .fetch_all(self.pool)
        .await?;

        // Preserve path order, not query order
        trail.sort_by_key(|c| {
            segments
                .iter()
                .position(|s| s == c.slug.as_str())
                .unwrap_or(usize::MAX)
        });

        Ok(trail)
    }
}
