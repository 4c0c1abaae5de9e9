// src/services/images.rs

//! Gallery image locator.
//!
//! Discovers page-scan thumbnails on a book's scan page and rewrites each
//! one into the absolute full-resolution download URL.

use std::sync::Arc;

use reqwest::Client;
use scraper::{Html, Selector};

use crate::error::{AppError, Result};
use crate::models::{Config, ImageReference, SiteConfig};
use crate::utils::http;

/// Thumbnail filename marker for the reduced-size variant.
const THUMBNAIL_MARKER: &str = "-mini";

/// Relative prefix of in-gallery image sources.
const GALLERY_PREFIX: &str = "images/";

/// Extension of page-scan images; the check is exact, not case-insensitive.
const SCAN_EXTENSION: &str = ".jpg";

/// How an image source maps onto the origin's storage layout.
///
/// The two branches produce structurally different URLs and must stay
/// distinct: the gallery branch substitutes shard and folder segments, the
/// foreign branch concatenates verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Source under `images/`, addressed via shard letter and folder key.
    Gallery { shard: char, folder_key: String },
    /// Anything else; joined to the base URL as-is.
    Foreign,
}

impl ImageSource {
    /// Classify a cleaned source path.
    pub fn classify(src: &str) -> Self {
        let Some(rest) = src.strip_prefix(GALLERY_PREFIX) else {
            return Self::Foreign;
        };
        let segment = rest.split('/').next().unwrap_or("");
        let Some(shard) = segment.chars().next() else {
            return Self::Foreign;
        };
        let folder_key = segment.split('-').next().unwrap_or(segment).to_string();
        Self::Gallery { shard, folder_key }
    }
}

/// Resolve a cleaned image source into an absolute download URL.
pub fn resolve_image_url(base_url: &str, src: &str) -> String {
    match ImageSource::classify(src) {
        ImageSource::Gallery { shard, folder_key } => {
            format!("{base_url}/books/{shard}/{folder_key}/book/{src}")
        }
        ImageSource::Foreign => format!("{base_url}/{src}"),
    }
}

/// Service for locating gallery images on book scan pages.
pub struct ImageLocator {
    config: Arc<Config>,
    client: Client,
}

impl ImageLocator {
    /// Create a new locator sharing the application HTTP client.
    pub fn new(config: Arc<Config>, client: Client) -> Self {
        Self { config, client }
    }

    /// Fetch a scan page and collect its resolved image references.
    ///
    /// One pass per call; the caller derives 1-based sequence numbers from
    /// the returned order.
    pub async fn locate(&self, page_url: &str) -> Result<Vec<ImageReference>> {
        let document = http::fetch_html(&self.client, page_url).await?;
        collect_references(&document, &self.config.site)
    }
}

/// Collect image references from a parsed scan page.
///
/// Only images inside the right-to-left gallery container count; that
/// layout convention separates page scans from decorative images. Images
/// without a `src` are skipped, and only `.jpg` URLs are yielded.
pub fn collect_references(document: &Html, site: &SiteConfig) -> Result<Vec<ImageReference>> {
    let gallery_sel = Selector::parse(&site.gallery_selector)
        .map_err(|e| AppError::selector(&site.gallery_selector, format!("{e:?}")))?;

    let mut references = Vec::new();
    for img in document.select(&gallery_sel) {
        let Some(src) = img.value().attr("src") else {
            continue;
        };
        let cleaned = src.replace(THUMBNAIL_MARKER, "");
        let resolved = resolve_image_url(&site.base_url, &cleaned);
        if !resolved.ends_with(SCAN_EXTENSION) {
            continue;
        }
        references.push(ImageReference {
            raw_src: cleaned,
            resolved_url: resolved,
        });
    }
    Ok(references)
}
