//! Pipeline entry point for scraper operations.
//!
//! - `run_crawler`: Enumerate the catalogue and process every book

pub mod crawl;

pub use crawl::run_crawler;
