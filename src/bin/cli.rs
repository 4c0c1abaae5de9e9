//! bookgrab CLI
//!
//! Local execution entry point for the children's-library scraper.

use std::path::PathBuf;
use std::sync::Arc;

use bookgrab::{
    error::Result,
    models::Config,
    pipeline,
    storage::LocalStorage,
    utils::http,
};
use clap::{Parser, Subcommand};

/// bookgrab - Children's Library Book Scraper
#[derive(Parser, Debug)]
#[command(
    name = "bookgrab",
    version,
    about = "Scrapes catalogue metadata and page scans from the children's library"
)]
struct Cli {
    /// Path to storage directory containing config and output
    #[arg(short, long, default_value = "storage")]
    storage_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl the catalogue: metadata plus page scans for every book
    Crawl {
        /// Only process the first N catalogue entries
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Validate the configuration file
    Validate,

    /// Show current storage state
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    log::info!("bookgrab starting...");

    let config_path = cli.storage_dir.join("config.toml");
    let config = Config::load_or_default(&config_path);
    let config = Arc::new(config);

    let storage = LocalStorage::new(&cli.storage_dir, &config.output);

    match cli.command {
        Command::Crawl { limit } => {
            config.validate()?;

            let client = http::create_client(&config.crawler)?;
            let outcome = pipeline::run_crawler(Arc::clone(&config), &storage, &client, limit).await?;

            log::info!(
                "Done: {} books saved to {}",
                outcome.books,
                cli.storage_dir.display()
            );
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("Config OK");
        }

        Command::Info => {
            log::info!("Storage directory: {}", cli.storage_dir.display());
            log::info!("Listing URL: {}", config.site.listing_url);

            let records = storage.load_records().await?;
            if records.is_empty() {
                log::info!("No records in {}", storage.metadata_path().display());
            } else {
                log::info!(
                    "{} records in {}",
                    records.len(),
                    storage.metadata_path().display()
                );
                if let Some(last) = records.last() {
                    log::info!("Last record: #{} {}", last.index, last.title);
                }
            }
        }
    }

    Ok(())
}
