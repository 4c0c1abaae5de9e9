// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use scraper::Html;

use crate::error::{AppError, Result};
use crate::models::CrawlerConfig;

/// Create a configured asynchronous HTTP client.
pub fn create_client(config: &CrawlerConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Fetch a page and parse it as HTML, checking the response status.
pub async fn fetch_html(client: &reqwest::Client, url: &str) -> Result<Html> {
    let text = fetch_text(client, url).await?;
    Ok(Html::parse_document(&text))
}

/// Fetch a page body as text, checking the response status.
pub async fn fetch_text(client: &reqwest::Client, url: &str) -> Result<String> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(AppError::status(url, status.as_u16()));
    }
    Ok(response.text().await?)
}

/// Fetch a binary payload.
///
/// A 404 maps to `NotFound`; any other non-success status is a transient
/// `Status` error.
pub async fn fetch_bytes(client: &reqwest::Client, url: &str) -> Result<Vec<u8>> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(AppError::NotFound {
            url: url.to_string(),
        });
    }
    if !status.is_success() {
        return Err(AppError::status(url, status.as_u16()));
    }
    Ok(response.bytes().await?.to_vec())
}
