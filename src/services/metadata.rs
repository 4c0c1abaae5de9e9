// src/services/metadata.rs

//! Book metadata extractor.
//!
//! Fetches a book's summary page and fills a `BookRecord` from the labeled
//! text block in its body container. Label extraction is a best-effort scan
//! over visible text fragments, not a structured parse: the first fragment
//! containing a label wins, and a missing label just leaves the field empty.

use std::sync::Arc;

use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};

use crate::error::Result;
use crate::models::{BookRecord, CatalogueEntry, Config};
use crate::utils::http;

/// Service for extracting book metadata from summary pages.
pub struct MetadataExtractor {
    config: Arc<Config>,
    client: Client,
}

impl MetadataExtractor {
    /// Create a new extractor sharing the application HTTP client.
    pub fn new(config: Arc<Config>, client: Client) -> Self {
        Self { config, client }
    }

    /// Fetch the summary page for an entry and build its metadata record.
    ///
    /// Fetch failures surface to the caller; a page without the body
    /// container yields a sparse record with only the identity fields set.
    pub async fn extract(&self, entry: &CatalogueEntry, index: usize) -> Result<BookRecord> {
        let book_id = extract_book_id(&entry.detail_url);
        let mut record = BookRecord::sparse(index, &entry.title, book_id);

        let url = summary_url(&entry.detail_url);
        let html = http::fetch_text(&self.client, &url).await?;
        let document = Html::parse_document(&html);

        fill_from_summary(&mut record, &document, &html, &self.config.site.body_selector);
        Ok(record)
    }
}

/// Extract the stable book identifier from a scan-page URL.
///
/// Matches the path shape `books/<shard>/<id>/book/index.html` and captures
/// `<id>`; any other shape yields `None`, never an error.
pub fn extract_book_id(url: &str) -> Option<String> {
    let pattern = Regex::new(r"books/./([^/]+)/book/index\.html").ok()?;
    pattern
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|id| id.as_str().to_string())
}

/// Rewrite a scan-page URL to the book's summary (landing) page.
pub fn summary_url(detail_url: &str) -> String {
    detail_url.replace("/book/index.html", "/index.html")
}

/// Fill metadata fields from a parsed summary page.
///
/// `raw_html` is the unparsed markup, needed for the contributor scan.
/// A missing body container leaves the record sparse.
pub fn fill_from_summary(record: &mut BookRecord, document: &Html, raw_html: &str, body_selector: &str) {
    let Ok(body_sel) = Selector::parse(body_selector) else {
        return;
    };
    let Some(body) = document.select(&body_sel).next() else {
        return;
    };

    let fragments: Vec<&str> = body
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    record.language = field_value(&fragments, "Language:");
    record.book_type = field_value(&fragments, "Type:");
    record.abstract_text = field_value(&fragments, "Abstract:");
    record.publisher = field_value(&fragments, "Publisher:");
    record.published = field_value(&fragments, "Published:");
    record.published_in = field_value(&fragments, "Published in:");
    record.isbn = field_value(&fragments, "ISBN:");
    record.contributed_by = field_value(&fragments, "Contributed by:");

    let (authors, illustrators) = extract_contributors(raw_html);
    record.authors = authors;
    record.illustrators = illustrators;
}

/// Take the value for a label from the first fragment containing it.
///
/// The value is everything after the first colon of that fragment, trimmed.
fn field_value(fragments: &[&str], label: &str) -> Option<String> {
    let fragment = fragments.iter().find(|s| s.contains(label))?;
    let value = match fragment.split_once(':') {
        Some((_, rest)) => rest,
        None => fragment,
    };
    Some(value.trim().to_string())
}

/// Scan raw markup for contributor list items and classify them by role.
///
/// Each `<li>Name (Role)` item is captured as one paired unit, so a name
/// can never be matched against another item's role. Roles other than
/// `Author` and `Illustrator` are dropped. Duplicates are removed with
/// first-seen order preserved.
pub fn extract_contributors(raw_html: &str) -> (Vec<String>, Vec<String>) {
    let mut authors = Vec::new();
    let mut illustrators = Vec::new();

    let Ok(pattern) = Regex::new(r"<li>\s*([^<(]+?)\s*\(\s*([^)]*?)\s*\)") else {
        return (authors, illustrators);
    };

    for caps in pattern.captures_iter(raw_html) {
        let name = caps[1].trim().to_string();
        let role = caps[2].trim();
        let bucket = match role {
            "Author" => &mut authors,
            "Illustrator" => &mut illustrators,
            _ => continue,
        };
        if !bucket.contains(&name) {
            bucket.push(name);
        }
    }

    (authors, illustrators)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SiteConfig;

    #[test]
    fn test_extract_book_id_valid() {
        assert_eq!(
            extract_book_id(
                "http://en.childrenslibrary.org/library/books/k/khareds_00500145/book/index.html"
            ),
            Some("khareds_00500145".to_string())
        );
    }

    #[test]
    fn test_extract_book_id_no_match() {
        assert_eq!(extract_book_id("http://example.com/about.html"), None);
        assert_eq!(
            extract_book_id("http://en.childrenslibrary.org/library/books/k/index.html"),
            None
        );
    }

    #[test]
    fn test_summary_url_strips_book_segment() {
        assert_eq!(
            summary_url("http://host/library/books/k/kh_1/book/index.html"),
            "http://host/library/books/k/kh_1/index.html"
        );
    }

    const SUMMARY_HTML: &str = r#"
        <html><body><div id="body">
        <p>Language: Persian</p>
        <p>Type: Picture book</p>
        <ul>
            <li>Ali Banaei (Author)</li>
            <li>Sara Iravani (Illustrator)</li>
            <li>Ali Banaei (Author)</li>
            <li>Pars Press (Publisher)</li>
        </ul>
        <p>Abstract: A mouse finds a friend.</p>
        <p>Published: 2004</p>
        <p>Published in: Iran</p>
        <p>ISBN: 964-5557-05-0</p>
        <p>Contributed by: ICDL</p>
        </div></body></html>
    "#;

    fn extracted(html: &str) -> BookRecord {
        let document = Html::parse_document(html);
        let mut record = BookRecord::sparse(1, "Test", Some("id_1".to_string()));
        fill_from_summary(
            &mut record,
            &document,
            html,
            &SiteConfig::default().body_selector,
        );
        record
    }

    #[test]
    fn test_fill_from_summary_labels() {
        let record = extracted(SUMMARY_HTML);
        assert_eq!(record.language.as_deref(), Some("Persian"));
        assert_eq!(record.book_type.as_deref(), Some("Picture book"));
        assert_eq!(record.abstract_text.as_deref(), Some("A mouse finds a friend."));
        assert_eq!(record.published.as_deref(), Some("2004"));
        assert_eq!(record.published_in.as_deref(), Some("Iran"));
        assert_eq!(record.isbn.as_deref(), Some("964-5557-05-0"));
        assert_eq!(record.contributed_by.as_deref(), Some("ICDL"));
    }

    #[test]
    fn test_fill_from_summary_contributors() {
        let record = extracted(SUMMARY_HTML);
        // Duplicate author collapsed, publisher role dropped
        assert_eq!(record.authors, vec!["Ali Banaei"]);
        assert_eq!(record.illustrators, vec!["Sara Iravani"]);
    }

    #[test]
    fn test_fill_from_summary_missing_body_is_sparse() {
        let html = "<html><body><div id=\"other\">Language: Greek</div></body></html>";
        let record = extracted(html);
        assert_eq!(record.index, 1);
        assert_eq!(record.title, "Test");
        assert!(record.language.is_none());
        assert!(record.authors.is_empty());
        assert!(record.illustrators.is_empty());
    }

    #[test]
    fn test_field_value_first_fragment_wins() {
        let fragments = vec!["Publisher: First House", "Publisher: Second House"];
        assert_eq!(
            field_value(&fragments, "Publisher:").as_deref(),
            Some("First House")
        );
    }

    #[test]
    fn test_field_value_absent_label() {
        let fragments = vec!["Language: Persian"];
        assert_eq!(field_value(&fragments, "ISBN:"), None);
    }

    #[test]
    fn test_extract_contributors_unpaired_name_dropped() {
        // A list item with no parenthesized role never forms a pair
        let html = "<ul><li>Lonely Name</li><li>Real Author (Author)</li></ul>";
        let (authors, illustrators) = extract_contributors(html);
        assert_eq!(authors, vec!["Real Author"]);
        assert!(illustrators.is_empty());
    }

    #[test]
    fn test_extract_contributors_unknown_role_dropped() {
        let html = "<li>Jane Doe (Translator)</li><li>John Roe (Illustrator)</li>";
        let (authors, illustrators) = extract_contributors(html);
        assert!(authors.is_empty());
        assert_eq!(illustrators, vec!["John Roe"]);
    }
}
