//! Storage for downloaded scans and the metadata record log.
//!
//! ## Directory Structure
//!
//! ```text
//! {storage_dir}/
//! ├── config.toml              # Scraper configuration
//! ├── books_metadata.jsonl     # Append-only record log, one JSON object per line
//! └── books/                   # One directory per book
//!     └── b001_Title_bookid/
//!         ├── bookid_0001.jpg
//!         └── bookid_0002.jpg
//! ```
//!
//! The record log is append-only JSON Lines rather than a rewritten JSON
//! array, so an interrupted run can never corrupt previously written
//! records and concurrent workers only contend on the append itself.

pub mod local;

pub use local::LocalStorage;
