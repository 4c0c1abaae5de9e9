// src/models/mod.rs

//! Domain models for the scraper application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod book;
mod config;
mod crawler;

// Re-export all public types
pub use book::{BookRecord, CatalogueEntry, ImageReference};
pub use config::{Config, CrawlerConfig, OutputConfig, SiteConfig};
pub use crawler::CrawlOutcome;
