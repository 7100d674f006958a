//! Content types served by the marketing-content endpoints.
//!
//! Each type deserializes from the Strapi attribute payload and serializes
//! to the public API in camelCase. The same structs carry the static
//! fallback defaults.

use serde::{Deserialize, Serialize};

/// Where a piece of content came from.
///
/// `Live` means the CMS responded 2xx with usable data; any other outcome
/// (network error, non-2xx, empty or undecodable body) is `Fallback`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentSource {
    Live,
    Fallback,
}

/// Homepage hero section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroContent {
    pub headline: String,
    pub subheadline: String,
    pub cta_text: String,
    pub cta_link: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// About-page content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutContent {
    pub title: String,
    pub paragraphs: Vec<String>,
}

/// Per-page configuration: SEO fields plus section toggles.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageConfig {
    pub page: String,
    pub title: String,
    pub seo_description: String,
    #[serde(default)]
    pub seo_keywords: Vec<String>,
    #[serde(default = "default_true")]
    pub show_hero: bool,
    #[serde(default = "default_true")]
    pub show_featured: bool,
    #[serde(default = "default_true")]
    pub show_newsletter: bool,
}

const fn default_true() -> bool {
    true
}

// =============================================================================
// Strapi response envelopes
// =============================================================================

/// Strapi single-type response: `{ "data": { "id": .., "attributes": {..} } }`.
#[derive(Debug, Deserialize)]
pub(super) struct StrapiSingle<T> {
    pub data: Option<StrapiEntry<T>>,
}

/// Strapi collection response: `{ "data": [ { "attributes": {..} }, .. ] }`.
#[derive(Debug, Deserialize)]
pub(super) struct StrapiCollection<T> {
    pub data: Vec<StrapiEntry<T>>,
}

#[derive(Debug, Deserialize)]
pub(super) struct StrapiEntry<T> {
    pub attributes: T,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_content_source_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ContentSource::Fallback).unwrap(),
            "\"fallback\""
        );
        assert_eq!(
            serde_json::to_string(&ContentSource::Live).unwrap(),
            "\"live\""
        );
    }

    #[test]
    fn test_hero_deserializes_from_strapi_envelope() {
        let body = r#"{
            "data": {
                "id": 1,
                "attributes": {
                    "headline": "Echo the Streets",
                    "subheadline": "New season drops",
                    "ctaText": "Shop now",
                    "ctaLink": "/shop"
                }
            }
        }"#;
        let parsed: StrapiSingle<HeroContent> = serde_json::from_str(body).unwrap();
        let hero = parsed.data.unwrap().attributes;
        assert_eq!(hero.headline, "Echo the Streets");
        assert!(hero.image_url.is_none());
    }

    #[test]
    fn test_page_config_section_toggles_default_on() {
        let body = r#"{
            "page": "shop",
            "title": "Shop",
            "seoDescription": "Browse the catalog"
        }"#;
        let config: PageConfig = serde_json::from_str(body).unwrap();
        assert!(config.show_hero);
        assert!(config.show_featured);
        assert!(config.show_newsletter);
        assert!(config.seo_keywords.is_empty());
    }
}
