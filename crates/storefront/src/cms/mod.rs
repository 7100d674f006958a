//! Strapi CMS client with static fallback.
//!
//! Marketing content (hero, about, page config) is fetched from Strapi over
//! plain REST with an optional bearer token. Every fetch has exactly two
//! outcomes: `Live` (2xx with usable data) or `Fallback` (anything else -
//! network error, non-2xx, empty or undecodable body). Fallback is never an
//! error to the caller; availability wins over CMS freshness.
//!
//! Live responses are cached in `moka` for 5 minutes. Fallback decisions are
//! never cached, so a recovered CMS is picked up on the next request.

pub mod defaults;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use secrecy::ExposeSecret;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::config::CmsConfig;

use defaults::{fallback_about, fallback_hero, fallback_page_config};
use types::{
    AboutContent, ContentSource, HeroContent, PageConfig, StrapiCollection, StrapiSingle,
};

/// Cache TTL for live CMS content.
const CACHE_TTL: Duration = Duration::from_secs(300); // 5 minutes

/// Request timeout for CMS fetches.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors that can occur fetching from the CMS.
///
/// These never cross a route boundary - the client converts every failure
/// into fallback content - but they are logged and captured for visibility.
#[derive(Debug, Error)]
pub enum CmsError {
    /// No CMS configured (`STRAPI_URL` unset).
    #[error("CMS not configured")]
    Disabled,

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// CMS returned a non-success status.
    #[error("CMS returned status {0}")]
    Status(reqwest::StatusCode),

    /// Response body could not be decoded.
    #[error("CMS response parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// CMS responded 2xx but with no matching content.
    #[error("CMS returned no content")]
    Empty,
}

#[derive(Clone)]
enum CacheValue {
    Hero(HeroContent),
    About(AboutContent),
    PageConfig(PageConfig),
}

/// Client for the Strapi CMS.
///
/// Cheaply cloneable via `Arc`. Constructed once at startup and shared
/// through `AppState`.
#[derive(Clone)]
pub struct CmsClient {
    inner: Arc<CmsClientInner>,
}

struct CmsClientInner {
    client: reqwest::Client,
    config: Option<CmsConfig>,
    cache: Cache<String, CacheValue>,
}

impl CmsClient {
    /// Create a new CMS client.
    ///
    /// `config` of `None` puts the client in permanent fallback mode.
    #[must_use]
    pub fn new(config: Option<CmsConfig>) -> Self {
        let cache = Cache::builder()
            .max_capacity(100)
            .time_to_live(CACHE_TTL)
            .build();

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self {
            inner: Arc::new(CmsClientInner {
                client,
                config,
                cache,
            }),
        }
    }

    /// Get the hero section, falling back to static copy on any failure.
    #[instrument(skip(self))]
    pub async fn hero(&self) -> (HeroContent, ContentSource) {
        let cache_key = "hero".to_string();

        if let Some(CacheValue::Hero(hero)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for hero content");
            return (hero, ContentSource::Live);
        }

        match self.fetch_hero().await {
            Ok(hero) => {
                self.inner
                    .cache
                    .insert(cache_key, CacheValue::Hero(hero.clone()))
                    .await;
                (hero, ContentSource::Live)
            }
            Err(err) => {
                log_fallback("hero", &err);
                (fallback_hero(), ContentSource::Fallback)
            }
        }
    }

    /// Get the about-page content, falling back to static copy on any failure.
    #[instrument(skip(self))]
    pub async fn about(&self) -> (AboutContent, ContentSource) {
        let cache_key = "about".to_string();

        if let Some(CacheValue::About(about)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for about content");
            return (about, ContentSource::Live);
        }

        match self.fetch_about().await {
            Ok(about) => {
                self.inner
                    .cache
                    .insert(cache_key, CacheValue::About(about.clone()))
                    .await;
                (about, ContentSource::Live)
            }
            Err(err) => {
                log_fallback("about", &err);
                (fallback_about(), ContentSource::Fallback)
            }
        }
    }

    /// Get the configuration for a page, falling back to defaults on any
    /// failure (including an unknown page key).
    #[instrument(skip(self), fields(page = %page))]
    pub async fn page_config(&self, page: &str) -> (PageConfig, ContentSource) {
        let cache_key = format!("page-config:{page}");

        if let Some(CacheValue::PageConfig(config)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for page config");
            return (config, ContentSource::Live);
        }

        match self.fetch_page_config(page).await {
            Ok(config) => {
                self.inner
                    .cache
                    .insert(cache_key, CacheValue::PageConfig(config.clone()))
                    .await;
                (config, ContentSource::Live)
            }
            Err(err) => {
                log_fallback("page-config", &err);
                (fallback_page_config(page), ContentSource::Fallback)
            }
        }
    }

    // =========================================================================
    // Fetch internals (single attempt, no retry)
    // =========================================================================

    async fn fetch_hero(&self) -> Result<HeroContent, CmsError> {
        let body = self.get("/api/hero-section").await?;
        let parsed: StrapiSingle<HeroContent> = serde_json::from_str(&body)?;
        parsed.data.map(|e| e.attributes).ok_or(CmsError::Empty)
    }

    async fn fetch_about(&self) -> Result<AboutContent, CmsError> {
        let body = self.get("/api/about-content").await?;
        let parsed: StrapiSingle<AboutContent> = serde_json::from_str(&body)?;
        parsed.data.map(|e| e.attributes).ok_or(CmsError::Empty)
    }

    async fn fetch_page_config(&self, page: &str) -> Result<PageConfig, CmsError> {
        let path = format!(
            "/api/page-configs?filters[page][$eq]={}",
            urlencoding::encode(page)
        );
        let body = self.get(&path).await?;
        let parsed: StrapiCollection<PageConfig> = serde_json::from_str(&body)?;
        parsed
            .data
            .into_iter()
            .next()
            .map(|e| e.attributes)
            .ok_or(CmsError::Empty)
    }

    /// One HTTP GET against the CMS. No retries, no backoff.
    async fn get(&self, path: &str) -> Result<String, CmsError> {
        let config = self.inner.config.as_ref().ok_or(CmsError::Disabled)?;

        let url = format!("{}{path}", config.base_url);
        let mut request = self.inner.client.get(&url);

        if let Some(token) = &config.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(CmsError::Status(status));
        }

        Ok(response.text().await?)
    }
}

/// Log a fallback transition. Disabled-CMS is expected and stays at debug.
fn log_fallback(kind: &str, err: &CmsError) {
    if matches!(err, CmsError::Disabled) {
        debug!(content = kind, "CMS disabled, serving fallback content");
    } else {
        warn!(content = kind, error = %err, "CMS fetch failed, serving fallback content");
        sentry::capture_error(err);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    #[tokio::test]
    async fn test_disabled_cms_serves_fallback() {
        let client = CmsClient::new(None);

        let (hero, source) = client.hero().await;
        assert_eq!(source, ContentSource::Fallback);
        assert_eq!(hero.headline, fallback_hero().headline);
    }

    #[tokio::test]
    async fn test_unreachable_cms_serves_fallback_page_config() {
        // Port 9 (discard) refuses connections immediately
        let client = CmsClient::new(Some(CmsConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            token: Some(SecretString::from("k9$Tq2@xV7!mP4&wZ8^rL3*bN6cD1eF5")),
        }));

        let (config, source) = client.page_config("shop").await;
        assert_eq!(source, ContentSource::Fallback);
        assert_eq!(config.page, "shop");
        // Default SEO fields are populated
        assert!(!config.title.is_empty());
        assert!(!config.seo_description.is_empty());
    }

    #[tokio::test]
    async fn test_fallback_is_not_cached() {
        let client = CmsClient::new(None);

        // Two calls both report fallback; nothing sticks in the cache
        let (_, first) = client.about().await;
        let (_, second) = client.about().await;
        assert_eq!(first, ContentSource::Fallback);
        assert_eq!(second, ContentSource::Fallback);
        assert_eq!(client.inner.cache.entry_count(), 0);
    }
}
