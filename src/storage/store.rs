//! Deduplicating record store backed by a JSON snapshot
//!
//! A store is owned by exactly one writer worker. It keeps accepted records in
//! arrival order together with an index of their URLs. Insertion is
//! first-write-wins: a record whose URL is already present is discarded and
//! the stored one is left untouched.
//!
//! The durable form is a single pretty-printed JSON array rewritten in full on
//! every flush.

use crate::record::ArticleRecord;
use crate::storage::{StorageError, StorageResult, SNAPSHOT_FILE};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct DedupStore {
    path: PathBuf,
    records: Vec<ArticleRecord>,
    urls: HashSet<String>,
}

impl DedupStore {
    /// Opens the store for `dir`, creating the directory if needed and
    /// seeding the store from an existing snapshot
    ///
    /// A snapshot that is not valid UTF-8 JSON is logged and ignored; the next
    /// flush replaces it.
    pub fn open(dir: &Path) -> StorageResult<Self> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(SNAPSHOT_FILE);

        let mut store = Self {
            path,
            records: Vec::new(),
            urls: HashSet::new(),
        };

        if store.path.exists() {
            let content = std::fs::read(&store.path)?;
            match serde_json::from_slice::<Vec<ArticleRecord>>(&content) {
                Ok(records) => {
                    for record in records {
                        store.insert(record);
                    }
                    tracing::info!(
                        "Loaded {} records from {}",
                        store.len(),
                        store.path.display()
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        "Ignoring unreadable snapshot {}: {}",
                        store.path.display(),
                        e
                    );
                }
            }
        }

        Ok(store)
    }

    /// Accepts `record` unless its URL is already stored
    ///
    /// Returns true if the record was accepted.
    pub fn insert(&mut self, record: ArticleRecord) -> bool {
        if self.urls.contains(&record.url) {
            return false;
        }
        self.urls.insert(record.url.clone());
        self.records.push(record);
        true
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    pub fn get(&self, url: &str) -> Option<&ArticleRecord> {
        if !self.contains(url) {
            return None;
        }
        self.records.iter().find(|r| r.url == url)
    }

    pub fn records(&self) -> &[ArticleRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrites the snapshot file with every stored record
    pub async fn flush(&self) -> StorageResult<()> {
        let json = serde_json::to_string_pretty(&self.records)
            .map_err(StorageError::Serialization)?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, json).await?;

        Ok(())
    }
}
