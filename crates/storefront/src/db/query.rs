//! Product listing query construction.
//!
//! Translates HTTP query parameters into a SQL filter, sort specification,
//! and pagination window. This is the relational port of the original
//! MongoDB filter-object assembly: each optional parameter contributes one
//! predicate, text search is a case-insensitive OR across name, description,
//! brand, and tags, and unknown sort keys fall back to newest-first.

use rust_decimal::Decimal;
use sqlx::{Postgres, QueryBuilder};
use urban_echo_core::Slug;

/// Default page size for product listings.
pub const DEFAULT_LIMIT: u32 = 12;

/// Maximum page size for product listings.
pub const MAX_LIMIT: u32 = 100;

/// Sort keys accepted by the listing endpoints.
///
/// "relevance" is a no-op: without ranked full-text search it falls back to
/// featured-then-newest ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    PriceLow,
    PriceHigh,
    Rating,
    #[default]
    Newest,
    Oldest,
    Popularity,
    Relevance,
}

impl SortKey {
    /// Parse a sort key from its query-parameter form.
    ///
    /// Unrecognized keys default to [`SortKey::Newest`].
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "price-low" => Self::PriceLow,
            "price-high" => Self::PriceHigh,
            "rating" => Self::Rating,
            "oldest" => Self::Oldest,
            "popularity" => Self::Popularity,
            "relevance" => Self::Relevance,
            _ => Self::Newest,
        }
    }

    /// The ORDER BY clause for this key.
    ///
    /// Column references are fixed strings from this lookup table - never
    /// interpolated from user input.
    #[must_use]
    pub const fn order_by(self) -> &'static str {
        match self {
            Self::PriceLow => "p.price ASC",
            Self::PriceHigh => "p.price DESC",
            Self::Rating => "p.rating_average DESC",
            Self::Newest => "p.created_at DESC",
            Self::Oldest => "p.created_at ASC",
            Self::Popularity => "p.review_count DESC",
            Self::Relevance => "p.is_featured DESC, p.created_at DESC",
        }
    }
}

/// A clamped pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u32,
    limit: u32,
}

impl Pagination {
    /// Clamp raw page/limit values into a valid window.
    ///
    /// Page is clamped to >= 1; limit to `[1, MAX_LIMIT]`. Missing values use
    /// page 1 and [`DEFAULT_LIMIT`].
    #[must_use]
    pub fn clamp(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = u32::try_from(page.unwrap_or(1).max(1)).unwrap_or(u32::MAX);
        let limit = u32::try_from(
            limit
                .unwrap_or_else(|| i64::from(DEFAULT_LIMIT))
                .clamp(1, i64::from(MAX_LIMIT)),
        )
        .unwrap_or(MAX_LIMIT);
        Self { page, limit }
    }

    /// Current page number (1-based).
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Page size.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Row offset: `(page - 1) * limit`.
    #[must_use]
    pub const fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.limit as i64
    }

    /// Total number of pages for a given row count.
    #[must_use]
    pub const fn total_pages(&self, total: i64) -> i64 {
        if total <= 0 {
            0
        } else {
            (total + self.limit as i64 - 1) / self.limit as i64
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::clamp(None, None)
    }
}

/// A fully-parsed product listing query.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    /// Free-text search term (ILIKE OR across name/description/brand/tags).
    pub text: Option<String>,
    /// Category slug filter.
    pub category: Option<Slug>,
    /// Inclusive lower price bound.
    pub min_price: Option<Decimal>,
    /// Inclusive upper price bound.
    pub max_price: Option<Decimal>,
    /// Only featured products.
    pub featured: bool,
    /// Only new arrivals.
    pub new_arrival: bool,
    /// Only on-sale products.
    pub on_sale: bool,
    /// Only best sellers.
    pub best_seller: bool,
    /// Sort specification.
    pub sort: SortKey,
    /// Pagination window.
    pub pagination: Pagination,
}

impl ProductQuery {
    /// Append the WHERE clause for this query to a builder.
    ///
    /// Always filters to active products; every other predicate is only
    /// emitted when the corresponding parameter is present. The product table
    /// must be aliased `p`.
    pub fn push_filters(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        builder.push(" WHERE p.is_active");

        if let Some(text) = &self.text {
            let pattern = format!("%{}%", escape_like(text));
            builder.push(" AND (p.name ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR p.description ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR p.brand ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(
                " OR EXISTS (SELECT 1 FROM unnest(p.tags) AS tag WHERE tag ILIKE ",
            );
            builder.push_bind(pattern);
            builder.push("))");
        }

        if let Some(category) = &self.category {
            builder.push(" AND p.category_slug = ");
            builder.push_bind(category.as_str().to_owned());
        }

        // Price range: only emit bounds that are present
        if let Some(min) = self.min_price {
            builder.push(" AND p.price >= ");
            builder.push_bind(min);
        }
        if let Some(max) = self.max_price {
            builder.push(" AND p.price <= ");
            builder.push_bind(max);
        }

        if self.featured {
            builder.push(" AND p.is_featured");
        }
        if self.new_arrival {
            builder.push(" AND p.is_new_arrival");
        }
        if self.on_sale {
            builder.push(" AND p.is_on_sale");
        }
        if self.best_seller {
            builder.push(" AND p.is_best_seller");
        }
    }

    /// Append ORDER BY, LIMIT, and OFFSET to a builder.
    pub fn push_order_and_window(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        builder.push(" ORDER BY ");
        builder.push(self.sort.order_by());
        builder.push(" LIMIT ");
        builder.push_bind(i64::from(self.pagination.limit()));
        builder.push(" OFFSET ");
        builder.push_bind(self.pagination.offset());
    }
}

/// Escape LIKE metacharacters in user-supplied search text.
fn escape_like(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn filter_sql(query: &ProductQuery) -> String {
        let mut builder = QueryBuilder::new("SELECT p.* FROM storefront.product p");
        query.push_filters(&mut builder);
        builder.sql().to_string()
    }

    #[test]
    fn test_pagination_clamps_page_and_limit() {
        let p = Pagination::clamp(Some(-1), Some(1000));
        assert_eq!(p.page(), 1);
        assert!(p.limit() <= MAX_LIMIT);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn test_pagination_defaults() {
        let p = Pagination::clamp(None, None);
        assert_eq!(p.page(), 1);
        assert_eq!(p.limit(), DEFAULT_LIMIT);
    }

    #[test]
    fn test_pagination_offset() {
        let p = Pagination::clamp(Some(3), Some(20));
        assert_eq!(p.offset(), 40);
    }

    #[test]
    fn test_pagination_zero_limit_clamps_to_one() {
        let p = Pagination::clamp(Some(1), Some(0));
        assert_eq!(p.limit(), 1);
    }

    #[test]
    fn test_total_pages() {
        let p = Pagination::clamp(Some(1), Some(10));
        assert_eq!(p.total_pages(0), 0);
        assert_eq!(p.total_pages(10), 1);
        assert_eq!(p.total_pages(11), 2);
        assert_eq!(p.total_pages(100), 10);
    }

    #[test]
    fn test_sort_key_lookup() {
        assert_eq!(SortKey::parse("price-low"), SortKey::PriceLow);
        assert_eq!(SortKey::parse("price-high"), SortKey::PriceHigh);
        assert_eq!(SortKey::parse("rating"), SortKey::Rating);
        assert_eq!(SortKey::parse("oldest"), SortKey::Oldest);
        assert_eq!(SortKey::parse("popularity"), SortKey::Popularity);
    }

    #[test]
    fn test_sort_key_unknown_defaults_to_newest() {
        assert_eq!(SortKey::parse("nonsense-key"), SortKey::parse("newest"));
        assert_eq!(SortKey::parse("nonsense-key"), SortKey::Newest);
    }

    #[test]
    fn test_relevance_falls_back_to_featured_then_newest() {
        assert_eq!(
            SortKey::Relevance.order_by(),
            "p.is_featured DESC, p.created_at DESC"
        );
    }

    #[test]
    fn test_empty_query_filters_active_only() {
        let sql = filter_sql(&ProductQuery::default());
        assert_eq!(sql, "SELECT p.* FROM storefront.product p WHERE p.is_active");
    }

    #[test]
    fn test_text_search_ors_across_fields() {
        let query = ProductQuery {
            text: Some("denim".to_string()),
            ..Default::default()
        };
        let sql = filter_sql(&query);
        assert!(sql.contains("p.name ILIKE"));
        assert!(sql.contains("p.description ILIKE"));
        assert!(sql.contains("p.brand ILIKE"));
        assert!(sql.contains("unnest(p.tags)"));
    }

    #[test]
    fn test_price_bounds_only_when_present() {
        let query = ProductQuery {
            min_price: Some(Decimal::new(1000, 2)),
            ..Default::default()
        };
        let sql = filter_sql(&query);
        assert!(sql.contains("p.price >= "));
        assert!(!sql.contains("p.price <= "));
    }

    #[test]
    fn test_flag_filters() {
        let query = ProductQuery {
            new_arrival: true,
            ..Default::default()
        };
        let sql = filter_sql(&query);
        assert!(sql.contains("p.is_new_arrival"));
        assert!(sql.contains("p.is_active"));
        assert!(!sql.contains("p.is_on_sale"));
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("100%_cotton"), "100\\%\\_cotton");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
    }
}
