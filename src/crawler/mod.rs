//! Crawler module: the producer side of the pipeline
//!
//! This module contains:
//! - HTTP fetching with error classification
//! - HTML field extraction and article link discovery
//! - The per-worker URL frontier
//! - The fetcher worker loop

mod fetcher;
mod frontier;
mod parser;
mod worker;

pub use fetcher::{build_http_client, fetch_and_extract, ExtractedPage, FetchError};
pub use frontier::Frontier;
pub use parser::{
    extract_content, extract_created_at, extract_links, extract_title, normalize_timestamp,
    parse_article, ParsedArticle, CONTENT_NOT_FOUND, TITLE_NOT_FOUND,
};
pub use worker::{FetcherSettings, FetcherSummary, FetcherWorker, IterationOutcome};
