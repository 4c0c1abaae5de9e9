//! Book data structures.

use serde::{Deserialize, Serialize};

/// A single catalogue listing entry: the book title and its deep page URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogueEntry {
    /// Book title as shown on the listing page
    pub title: String,

    /// Absolute URL of the book's scan page (`.../book/index.html`)
    pub detail_url: String,
}

/// Metadata extracted from a book's summary page.
///
/// Field names in the serialized form match the original collection format,
/// so existing `books_metadata` consumers keep working.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct BookRecord {
    /// 1-based position in catalogue enumeration order
    pub index: usize,

    /// Directory key for downloaded scans, unique per run
    pub folder_name: String,

    /// Stable identifier parsed from the detail URL path, if the URL matched
    #[serde(rename = "bookId")]
    pub book_id: Option<String>,

    /// Book title
    pub title: String,

    pub language: Option<String>,

    #[serde(rename = "type")]
    pub book_type: Option<String>,

    #[serde(rename = "author")]
    pub authors: Vec<String>,

    #[serde(rename = "illustrator")]
    pub illustrators: Vec<String>,

    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,

    pub publisher: Option<String>,

    pub published: Option<String>,

    pub published_in: Option<String>,

    #[serde(rename = "ISBN")]
    pub isbn: Option<String>,

    pub contributed_by: Option<String>,
}

impl BookRecord {
    /// Create a record with only the identity fields populated.
    ///
    /// Used directly when the summary page has no body container; the
    /// extractor fills the remaining fields when it can.
    pub fn sparse(index: usize, title: &str, book_id: Option<String>) -> Self {
        Self {
            index,
            folder_name: folder_name(index, title, book_id.as_deref()),
            book_id,
            title: title.to_string(),
            ..Self::default()
        }
    }
}

/// Build the per-book directory name: `b{index:03}_{title}_{id}`.
///
/// Path separators in the title are replaced so the name stays a single
/// directory component. Books whose URL did not yield an id get the
/// literal `unknown` so the name stays well-formed.
pub fn folder_name(index: usize, title: &str, book_id: Option<&str>) -> String {
    let title: String = title
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    format!("b{:03}_{}_{}", index, title, book_id.unwrap_or("unknown"))
}

/// An image discovered on a book's scan page.
///
/// Transient: lives only between discovery and download, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    /// The `src` attribute as found in the markup, `-mini` already stripped
    pub raw_src: String,

    /// Absolute download URL after shard/folder resolution
    pub resolved_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_name() {
        assert_eq!(
            folder_name(7, "The Little Prince", Some("prince_00500145")),
            "b007_The Little Prince_prince_00500145"
        );
    }

    #[test]
    fn test_folder_name_without_id() {
        assert_eq!(folder_name(12, "Untitled", None), "b012_Untitled_unknown");
    }

    #[test]
    fn test_folder_name_title_stays_single_component() {
        assert_eq!(
            folder_name(4, "Cats / Dogs", Some("cats_001")),
            "b004_Cats _ Dogs_cats_001"
        );
        assert_eq!(
            folder_name(5, r"Back\slash", None),
            "b005_Back_slash_unknown"
        );
    }

    #[test]
    fn test_sparse_record_defaults() {
        let record = BookRecord::sparse(3, "Khareds", Some("khareds_00500145".to_string()));
        assert_eq!(record.index, 3);
        assert_eq!(record.folder_name, "b003_Khareds_khareds_00500145");
        assert!(record.language.is_none());
        assert!(record.authors.is_empty());
        assert!(record.illustrators.is_empty());
    }

    #[test]
    fn test_record_serialized_field_names() {
        let record = BookRecord::sparse(1, "T", Some("id1".to_string()));
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("bookId").is_some());
        assert!(json.get("type").is_some());
        assert!(json.get("ISBN").is_some());
        assert!(json.get("author").is_some());
        assert!(json.get("illustrator").is_some());
        assert!(json.get("abstract").is_some());
    }
}
