//! Storage module: the consumer side of the pipeline
//!
//! This module handles:
//! - The per-writer deduplicating record store and its JSON snapshot
//! - The writer worker loop that drains the shared queue into a store

mod store;
mod writer;

pub use store::DedupStore;
pub use writer::{WriterSettings, WriterSummary, WriterWorker};

use thiserror::Error;

/// File name of a writer's snapshot inside its output directory
pub const SNAPSHOT_FILE: &str = "articles.json";

/// Errors that can occur while loading or flushing a snapshot
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(serde_json::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
