//! URL slug type for products and categories.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Slug`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum SlugError {
    /// The input string is empty.
    #[error("slug cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("slug must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains characters outside `[a-z0-9-]`.
    #[error("slug may only contain lowercase letters, digits, and hyphens")]
    InvalidCharacter,
    /// The input starts or ends with a hyphen.
    #[error("slug cannot start or end with a hyphen")]
    EdgeHyphen,
}

/// A URL-safe slug identifying a product or category.
///
/// Slugs are unique per entity type and appear in API paths
/// (`/api/products/{slug}`) and query parameters (`?category=...`).
///
/// ## Constraints
///
/// - Length: 1-128 characters
/// - Only lowercase ASCII letters, digits, and hyphens
/// - No leading or trailing hyphen
///
/// ## Examples
///
/// ```
/// use urban_echo_core::Slug;
///
/// assert!(Slug::parse("classic-denim-jacket").is_ok());
/// assert!(Slug::parse("tee-2024").is_ok());
///
/// assert!(Slug::parse("").is_err());            // empty
/// assert!(Slug::parse("Has Spaces").is_err());  // invalid characters
/// assert!(Slug::parse("-leading").is_err());    // edge hyphen
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Maximum length of a slug.
    pub const MAX_LENGTH: usize = 128;

    /// Parse a `Slug` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, longer than 128 characters,
    /// contains characters outside `[a-z0-9-]`, or has a leading or trailing
    /// hyphen.
    pub fn parse(s: &str) -> Result<Self, SlugError> {
        if s.is_empty() {
            return Err(SlugError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(SlugError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if !s
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
        {
            return Err(SlugError::InvalidCharacter);
        }

        if s.starts_with('-') || s.ends_with('-') {
            return Err(SlugError::EdgeHyphen);
        }

        Ok(Self(s.to_owned()))
    }

    /// Derive a slug from free text (e.g., a product name).
    ///
    /// Lowercases, maps runs of non-alphanumeric characters to single hyphens,
    /// and trims edge hyphens. Returns `None` if nothing slug-worthy remains.
    #[must_use]
    pub fn slugify(text: &str) -> Option<Self> {
        let mut out = String::with_capacity(text.len());
        let mut last_hyphen = true; // suppress leading hyphen

        for c in text.chars() {
            if c.is_ascii_alphanumeric() {
                out.push(c.to_ascii_lowercase());
                last_hyphen = false;
            } else if !last_hyphen {
                out.push('-');
                last_hyphen = true;
            }
        }

        while out.ends_with('-') {
            out.pop();
        }

        out.truncate(Self::MAX_LENGTH);
        Self::parse(&out).ok()
    }

    /// Returns the slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Slug` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Slug {
    type Err = SlugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Slug {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Slug {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Slug {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_slugs() {
        assert!(Slug::parse("classic-denim-jacket").is_ok());
        assert!(Slug::parse("tee").is_ok());
        assert!(Slug::parse("summer-2024-sale").is_ok());
        assert!(Slug::parse("a").is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(Slug::parse(""), Err(SlugError::Empty)));
    }

    #[test]
    fn test_parse_too_long() {
        let long = "a".repeat(129);
        assert!(matches!(Slug::parse(&long), Err(SlugError::TooLong { .. })));
    }

    #[test]
    fn test_parse_invalid_characters() {
        assert!(matches!(
            Slug::parse("Has Spaces"),
            Err(SlugError::InvalidCharacter)
        ));
        assert!(matches!(
            Slug::parse("UPPER"),
            Err(SlugError::InvalidCharacter)
        ));
        assert!(matches!(
            Slug::parse("under_score"),
            Err(SlugError::InvalidCharacter)
        ));
    }

    #[test]
    fn test_parse_edge_hyphens() {
        assert!(matches!(Slug::parse("-leading"), Err(SlugError::EdgeHyphen)));
        assert!(matches!(
            Slug::parse("trailing-"),
            Err(SlugError::EdgeHyphen)
        ));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(
            Slug::slugify("Classic Denim Jacket").unwrap().as_str(),
            "classic-denim-jacket"
        );
        assert_eq!(
            Slug::slugify("  Tee -- 2024!  ").unwrap().as_str(),
            "tee-2024"
        );
        assert!(Slug::slugify("!!!").is_none());
    }

    #[test]
    fn test_serde_roundtrip() {
        let slug = Slug::parse("classic-tee").unwrap();
        let json = serde_json::to_string(&slug).unwrap();
        assert_eq!(json, "\"classic-tee\"");

        let parsed: Slug = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, slug);
    }

    #[test]
    fn test_from_str() {
        let slug: Slug = "classic-tee".parse().unwrap();
        assert_eq!(slug.as_str(), "classic-tee");
    }
}
