//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP and crawling behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Origin site layout settings
    #[serde(default)]
    pub site: SiteConfig,

    /// Local output settings
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::config("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::config("crawler.timeout_secs must be > 0"));
        }
        if self.crawler.max_concurrent == 0 {
            return Err(AppError::config("crawler.max_concurrent must be > 0"));
        }
        if self.site.listing_url.trim().is_empty() {
            return Err(AppError::config("site.listing_url is empty"));
        }
        if self.site.base_url.trim().is_empty() {
            return Err(AppError::config("site.base_url is empty"));
        }
        if self.site.base_url.ends_with('/') {
            return Err(AppError::config(
                "site.base_url must not have a trailing slash",
            ));
        }
        if self.output.root_dir.trim().is_empty() {
            return Err(AppError::config("output.root_dir is empty"));
        }
        Ok(())
    }
}

/// HTTP client and crawling behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Delay between requests in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,

    /// Maximum concurrent book downloads
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: defaults::request_delay(),
            max_concurrent: defaults::max_concurrent(),
        }
    }
}

/// Origin site layout: URLs, path prefixes, and gallery selectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// URL of the catalogue listing page
    #[serde(default = "defaults::listing_url")]
    pub listing_url: String,

    /// Base URL for per-book pages, no trailing slash
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Href prefix identifying per-book anchors on the listing page
    #[serde(default = "defaults::item_path_prefix")]
    pub item_path_prefix: String,

    /// CSS selector for the metadata body container on the summary page
    #[serde(default = "defaults::body_selector")]
    pub body_selector: String,

    /// CSS selector for gallery thumbnails on the scan page
    #[serde(default = "defaults::gallery_selector")]
    pub gallery_selector: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            listing_url: defaults::listing_url(),
            base_url: defaults::base_url(),
            item_path_prefix: defaults::item_path_prefix(),
            body_selector: defaults::body_selector(),
            gallery_selector: defaults::gallery_selector(),
        }
    }
}

/// Local output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Parent directory for all downloaded books
    #[serde(default = "defaults::root_dir")]
    pub root_dir: String,

    /// JSON-Lines file accumulating book metadata records
    #[serde(default = "defaults::metadata_file")]
    pub metadata_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root_dir: defaults::root_dir(),
            metadata_file: defaults::metadata_file(),
        }
    }
}

mod defaults {
    // Crawler defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; bookgrab/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn request_delay() -> u64 {
        100
    }
    pub fn max_concurrent() -> usize {
        4
    }

    // Site defaults
    pub fn listing_url() -> String {
        "http://en.childrenslibrary.org/library/lang74.html".into()
    }
    pub fn base_url() -> String {
        "http://en.childrenslibrary.org/library".into()
    }
    pub fn item_path_prefix() -> String {
        "books/".into()
    }
    pub fn body_selector() -> String {
        "div#body".into()
    }
    pub fn gallery_selector() -> String {
        r#"div[dir="rtl"] a img"#.into()
    }

    // Output defaults
    pub fn root_dir() -> String {
        "books".into()
    }
    pub fn metadata_file() -> String {
        "books_metadata.jsonl".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.crawler.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_concurrency() {
        let mut config = Config::default();
        config.crawler.max_concurrent = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_trailing_slash_base() {
        let mut config = Config::default();
        config.site.base_url = "http://en.childrenslibrary.org/library/".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn parse_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [crawler]
            max_concurrent = 2
            "#,
        )
        .unwrap();
        assert_eq!(config.crawler.max_concurrent, 2);
        assert_eq!(config.crawler.timeout_secs, 30);
        assert_eq!(config.site.item_path_prefix, "books/");
    }
}
