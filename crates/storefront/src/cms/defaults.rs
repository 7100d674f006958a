//! Static fallback content.
//!
//! Served whenever the CMS is unreachable, misconfigured, or returns an
//! unusable response. Keep these in sync with the marketing team's baseline
//! copy - they are what visitors see during a CMS outage.

use super::types::{AboutContent, HeroContent, PageConfig};

/// Default hero section.
#[must_use]
pub fn fallback_hero() -> HeroContent {
    HeroContent {
        headline: "Echo Your Style".to_string(),
        subheadline: "Discover the latest in urban fashion - curated drops, everyday staples."
            .to_string(),
        cta_text: "Shop the Collection".to_string(),
        cta_link: "/shop".to_string(),
        image_url: None,
    }
}

/// Default about-page content.
#[must_use]
pub fn fallback_about() -> AboutContent {
    AboutContent {
        title: "About Urban Echo".to_string(),
        paragraphs: vec![
            "Urban Echo started as a small studio with a simple idea: street style \
             should be accessible, comfortable, and built to last."
                .to_string(),
            "Every piece in our catalog is selected for quality fabric, honest \
             pricing, and a fit that works off the rack."
                .to_string(),
        ],
    }
}

/// Default page configuration for a given page key.
///
/// Known pages get tailored SEO copy; unknown pages get a generic default
/// carrying the requested key so the caller can still render.
#[must_use]
pub fn fallback_page_config(page: &str) -> PageConfig {
    match page {
        "home" => PageConfig {
            page: "home".to_string(),
            title: "Urban Echo | Modern Urban Fashion".to_string(),
            seo_description: "Shop Urban Echo for curated streetwear, everyday staples, \
                              and seasonal drops."
                .to_string(),
            seo_keywords: vec![
                "urban fashion".to_string(),
                "streetwear".to_string(),
                "clothing".to_string(),
            ],
            show_hero: true,
            show_featured: true,
            show_newsletter: true,
        },
        "shop" => PageConfig {
            page: "shop".to_string(),
            title: "Shop All | Urban Echo".to_string(),
            seo_description: "Browse the full Urban Echo catalog - filter by category, \
                              price, and more."
                .to_string(),
            seo_keywords: vec![
                "shop".to_string(),
                "catalog".to_string(),
                "urban fashion".to_string(),
            ],
            show_hero: false,
            show_featured: false,
            show_newsletter: true,
        },
        "about" => PageConfig {
            page: "about".to_string(),
            title: "About Us | Urban Echo".to_string(),
            seo_description: "The story behind Urban Echo and the people who make it."
                .to_string(),
            seo_keywords: vec!["about".to_string(), "urban echo".to_string()],
            show_hero: false,
            show_featured: false,
            show_newsletter: true,
        },
        other => PageConfig {
            page: other.to_string(),
            title: "Urban Echo".to_string(),
            seo_description: "Urban Echo - modern urban fashion.".to_string(),
            seo_keywords: vec!["urban fashion".to_string()],
            show_hero: false,
            show_featured: false,
            show_newsletter: true,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_hero_has_copy() {
        let hero = fallback_hero();
        assert!(!hero.headline.is_empty());
        assert!(!hero.cta_link.is_empty());
    }

    #[test]
    fn test_fallback_page_config_known_pages() {
        for page in ["home", "shop", "about"] {
            let config = fallback_page_config(page);
            assert_eq!(config.page, page);
            assert!(!config.title.is_empty());
            assert!(!config.seo_description.is_empty());
            assert!(!config.seo_keywords.is_empty());
        }
    }

    #[test]
    fn test_fallback_page_config_unknown_page_keeps_key() {
        let config = fallback_page_config("lookbook");
        assert_eq!(config.page, "lookbook");
        assert!(!config.seo_description.is_empty());
    }
}
