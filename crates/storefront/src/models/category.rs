//! Category model with hierarchical navigation support.

use serde::Serialize;
use urban_echo_core::{CategoryId, Slug};

/// A navigation category.
///
/// Hierarchy is expressed through `parent_slug` (self-reference), `level`
/// (0 for roots), and the materialized `path` (`men/shirts`) used for
/// breadcrumb construction.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: Slug,
    pub parent_slug: Option<String>,
    pub level: i32,
    pub path: String,
    pub display_order: i32,
    pub is_active: bool,
}

impl Category {
    /// Breadcrumb segments from the materialized path.
    ///
    /// `"men/shirts"` yields `["men", "shirts"]`; the last segment is this
    /// category's own slug.
    #[must_use]
    pub fn breadcrumb(&self) -> Vec<&str> {
        self.path.split('/').filter(|s| !s.is_empty()).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_breadcrumb_from_path() {
        let category = Category {
            id: CategoryId::new(3),
            name: "Shirts".to_string(),
            slug: Slug::parse("shirts").unwrap(),
            parent_slug: Some("men".to_string()),
            level: 1,
            path: "men/shirts".to_string(),
            display_order: 2,
            is_active: true,
        };
        assert_eq!(category.breadcrumb(), vec!["men", "shirts"]);
    }

    #[test]
    fn test_breadcrumb_root() {
        let category = Category {
            id: CategoryId::new(1),
            name: "Men".to_string(),
            slug: Slug::parse("men").unwrap(),
            parent_slug: None,
            level: 0,
            path: "men".to_string(),
            display_order: 1,
            is_active: true,
        };
        assert_eq!(category.breadcrumb(), vec!["men"]);
    }
}
