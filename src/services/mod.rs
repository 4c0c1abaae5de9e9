//! Service layer for the scraper application.
//!
//! This module contains the business logic for:
//! - Catalogue enumeration (`ListingEnumerator`)
//! - Metadata extraction (`MetadataExtractor`)
//! - Image discovery and URL resolution (`ImageLocator`)

mod images;
mod listing;
mod metadata;

pub use images::{ImageLocator, ImageSource};
pub use listing::ListingEnumerator;
pub use metadata::MetadataExtractor;
