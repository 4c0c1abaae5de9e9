//! Crawl run summary counters.

/// Summary counters for a crawl run.
#[derive(Debug, Default)]
pub struct CrawlOutcome {
    /// Catalogue entries processed successfully
    pub books: usize,
    /// Catalogue entries that failed entirely
    pub book_failures: usize,
    /// Images downloaded
    pub images: usize,
    /// Images that failed to download or were missing on the origin
    pub image_failures: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_outcome_is_zeroed() {
        let outcome = CrawlOutcome::default();
        assert_eq!(outcome.books, 0);
        assert_eq!(outcome.book_failures, 0);
        assert_eq!(outcome.images, 0);
        assert_eq!(outcome.image_failures, 0);
    }
}
