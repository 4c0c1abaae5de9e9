// src/pipeline/crawl.rs

//! Book crawling pipeline.
//!
//! Enumerates the catalogue, then pushes every entry through metadata
//! extraction, record persistence, and image download. Entries have no
//! cross-dependencies, so they run through a bounded worker pool; a failure
//! in one entry never stops the rest.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use reqwest::Client;

use crate::error::Result;
use crate::models::{CatalogueEntry, Config, CrawlOutcome};
use crate::services::{ImageLocator, ListingEnumerator, MetadataExtractor};
use crate::storage::LocalStorage;
use crate::utils::http;

/// Run the full scrape: listing → metadata → images.
///
/// `limit` caps the number of catalogue entries processed, for smoke runs.
pub async fn run_crawler(
    config: Arc<Config>,
    storage: &LocalStorage,
    client: &Client,
    limit: Option<usize>,
) -> Result<CrawlOutcome> {
    let enumerator = ListingEnumerator::new(Arc::clone(&config), client.clone());
    let mut entries = enumerator.enumerate().await;
    if let Some(limit) = limit {
        entries.truncate(limit);
    }

    if entries.is_empty() {
        log::warn!("Catalogue listing yielded no entries");
        return Ok(CrawlOutcome::default());
    }
    log::info!("Enumerated {} catalogue entries", entries.len());

    let extractor = MetadataExtractor::new(Arc::clone(&config), client.clone());
    let locator = ImageLocator::new(Arc::clone(&config), client.clone());

    let delay = Duration::from_millis(config.crawler.request_delay_ms);
    let concurrency = config.crawler.max_concurrent.max(1);

    let jobs: Vec<(usize, CatalogueEntry)> = entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| (i + 1, entry))
        .collect();

    let mut outcome = CrawlOutcome::default();
    let mut book_stream = stream::iter(jobs)
        .map(|(index, entry)| {
            let extractor = &extractor;
            let locator = &locator;
            async move {
                let result = process_book(extractor, locator, storage, client, &entry, index).await;
                (entry, result)
            }
        })
        .buffered(concurrency);

    while let Some((entry, result)) = book_stream.next().await {
        match result {
            Ok((downloaded, failed)) => {
                outcome.books += 1;
                outcome.images += downloaded;
                outcome.image_failures += failed;
            }
            Err(error) => {
                outcome.book_failures += 1;
                log::warn!(
                    "Failed to process book {} ({}): {}",
                    entry.title,
                    entry.detail_url,
                    error
                );
            }
        }

        if delay.as_millis() > 0 {
            tokio::time::sleep(delay).await;
        }
    }

    log::info!(
        "Crawl finished: {} books ({} failed), {} images ({} failed)",
        outcome.books,
        outcome.book_failures,
        outcome.images,
        outcome.image_failures
    );
    Ok(outcome)
}

/// Process one catalogue entry end to end.
///
/// Returns (images downloaded, images failed). Per-image failures are
/// logged and skipped; only metadata-stage failures abort the entry.
async fn process_book(
    extractor: &MetadataExtractor,
    locator: &ImageLocator,
    storage: &LocalStorage,
    client: &Client,
    entry: &CatalogueEntry,
    index: usize,
) -> Result<(usize, usize)> {
    log::info!("Processing book: {}", entry.title);

    let record = extractor.extract(entry, index).await?;
    storage.append_record(&record).await?;

    let references = locator.locate(&entry.detail_url).await?;
    let book_id = record.book_id.as_deref().unwrap_or("unknown");

    let mut downloaded = 0;
    let mut failed = 0;
    for (seq, reference) in references.iter().enumerate() {
        let file_name = format!("{}_{:04}.jpg", book_id, seq + 1);
        match http::fetch_bytes(client, &reference.resolved_url).await {
            Ok(bytes) => {
                storage
                    .write_image(&record.folder_name, &file_name, &bytes)
                    .await?;
                log::debug!(
                    "Downloaded {} as {} in {}",
                    reference.resolved_url,
                    file_name,
                    record.folder_name
                );
                downloaded += 1;
            }
            Err(error) => {
                failed += 1;
                log::warn!("Failed to download {}: {}", reference.resolved_url, error);
            }
        }
    }

    Ok((downloaded, failed))
}
