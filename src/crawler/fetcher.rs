//! HTTP fetcher implementation
//!
//! This module handles all network retrieval for the crawler:
//! - Building the shared HTTP client with a fixed timeout
//! - GET requests for article pages
//! - Error classification (timeout, connection, HTTP status)
//!
//! Failures are reported to the caller and never retried here; the fetcher
//! worker logs them and moves on.

use crate::crawler::parser::parse_article;
use crate::record::ArticleRecord;
use crate::url::{source_website, ArticleFilter};
use reqwest::Client;
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Transport-level failures while fetching a page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}: {message}")]
    Connect { url: String, message: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },
}

impl FetchError {
    pub fn url(&self) -> &str {
        match self {
            Self::InvalidUrl { url, .. }
            | Self::Timeout { url }
            | Self::Connect { url, .. }
            | Self::Status { url, .. }
            | Self::Http { url, .. } => url,
        }
    }
}

/// A successfully fetched article and the article links found on it
#[derive(Debug, Clone)]
pub struct ExtractedPage {
    pub record: ArticleRecord,
    pub links: HashSet<String>,
}

/// Builds the HTTP client shared by all fetcher workers
///
/// The client uses default headers and the default redirect policy; only the
/// request timeout is fixed.
pub fn build_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder().timeout(timeout).gzip(true).brotli(true).build()
}

/// Fetches `url` and extracts an article record plus follow-up links
///
/// # Errors
///
/// | Condition | Result |
/// |-----------|--------|
/// | Request exceeds the client timeout | `FetchError::Timeout` |
/// | Connection refused / DNS / TLS failure | `FetchError::Connect` |
/// | Non-2xx status | `FetchError::Status` |
/// | Body cannot be read | `FetchError::Http` (or `Timeout`) |
///
/// Extraction itself never fails: missing fields fall back to sentinels.
pub async fn fetch_and_extract(
    client: &Client,
    filter: &ArticleFilter,
    url: &str,
) -> Result<ExtractedPage, FetchError> {
    let parsed_url = Url::parse(url).map_err(|source| FetchError::InvalidUrl {
        url: url.to_string(),
        source,
    })?;

    let response = client
        .get(parsed_url.clone())
        .send()
        .await
        .map_err(|e| classify_error(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.text().await.map_err(|e| classify_error(url, e))?;

    let parsed = parse_article(&body, &parsed_url, filter);

    Ok(ExtractedPage {
        record: ArticleRecord {
            url: url.to_string(),
            title: parsed.title,
            content: parsed.content,
            created_at: parsed.created_at,
            source_website: source_website(&parsed_url),
        },
        links: parsed.links,
    })
}

fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        FetchError::Connect {
            url: url.to_string(),
            message: error.to_string(),
        }
    } else {
        FetchError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}
