// src/services/listing.rs

//! Catalogue listing enumerator.
//!
//! Walks the listing page's ordered list and produces one `CatalogueEntry`
//! per book anchor, in document order.

use std::sync::Arc;

use reqwest::Client;
use scraper::{Html, Selector};

use crate::models::{CatalogueEntry, Config, SiteConfig};
use crate::utils::http;

/// Anchors inside the catalogue's ordered list.
const LISTING_SELECTOR: &str = "ol li a";

/// Service for enumerating the catalogue listing page.
pub struct ListingEnumerator {
    config: Arc<Config>,
    client: Client,
}

impl ListingEnumerator {
    /// Create a new enumerator sharing the application HTTP client.
    pub fn new(config: Arc<Config>, client: Client) -> Self {
        Self { config, client }
    }

    /// Fetch the listing page and extract all catalogue entries.
    ///
    /// An unreachable page or a page with no matching list degrades to an
    /// empty result; the caller simply sees zero items.
    pub async fn enumerate(&self) -> Vec<CatalogueEntry> {
        let url = &self.config.site.listing_url;
        match http::fetch_html(&self.client, url).await {
            Ok(document) => parse_listing(&document, &self.config.site),
            Err(error) => {
                log::warn!("Failed to fetch listing page {}: {}", url, error);
                Vec::new()
            }
        }
    }
}

/// Extract catalogue entries from a parsed listing page.
///
/// Only anchors whose href starts with the per-book path prefix are
/// accepted; navigation and external links are skipped. Accepted hrefs are
/// rewritten from the landing page (`.../index.html`) to the scan page
/// (`.../book/index.html`) and made absolute.
pub fn parse_listing(document: &Html, site: &SiteConfig) -> Vec<CatalogueEntry> {
    let Ok(anchor_sel) = Selector::parse(LISTING_SELECTOR) else {
        return Vec::new();
    };

    let mut entries = Vec::new();
    for anchor in document.select(&anchor_sel) {
        let title = anchor.text().collect::<String>().trim().to_string();
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if !href.starts_with(&site.item_path_prefix) {
            continue;
        }

        let book_path = match href.strip_suffix("index.html") {
            Some(stem) => format!("{stem}book/index.html"),
            None => href.to_string(),
        };
        entries.push(CatalogueEntry {
            title,
            detail_url: format!("{}/{}", site.base_url, book_path),
        });
    }
    entries
}
