//! Writer worker: the consumer side of the pipeline
//!
//! Each writer owns one [`DedupStore`] and loops until told to stop: it waits
//! (with a timeout) for a record on the shared queue, accepts it unless its
//! URL is already stored, and flushes the whole store every `batch_size`
//! accepted records. When stopping it drains whatever the fetchers left in
//! the queue and flushes one final time, so no accepted record is lost on a
//! clean shutdown.

use crate::pipeline::RecordQueue;
use crate::record::ArticleRecord;
use crate::state::{advance, WorkerState};
use crate::storage::DedupStore;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Timing and batching parameters for a writer worker
#[derive(Debug, Clone, Copy)]
pub struct WriterSettings {
    /// Pause between iterations
    pub interval: Duration,

    /// How long a read waits on an empty queue
    pub read_timeout: Duration,

    /// Accepted records between flushes
    pub batch_size: usize,
}

/// Counters reported by a writer when it stops
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriterSummary {
    pub name: String,
    pub received: u64,
    pub accepted: u64,
    pub duplicates: u64,
    pub flushes: u64,
    pub failed_flushes: u64,
    pub stored: u64,
}

pub struct WriterWorker {
    name: String,
    store: DedupStore,
    queue: RecordQueue,
    settings: WriterSettings,
    state: WorkerState,
    summary: WriterSummary,
    accepted_total: Option<Arc<AtomicU64>>,
}

impl WriterWorker {
    pub fn new(
        name: impl Into<String>,
        store: DedupStore,
        queue: RecordQueue,
        settings: WriterSettings,
    ) -> Self {
        let name = name.into();
        Self {
            summary: WriterSummary {
                name: name.clone(),
                ..Default::default()
            },
            name,
            store,
            queue,
            settings,
            state: WorkerState::Idle,
            accepted_total: None,
        }
    }

    /// Reports every accepted record to a counter shared across writers
    pub fn with_accepted_counter(mut self, counter: Arc<AtomicU64>) -> Self {
        self.accepted_total = Some(counter);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    pub fn store(&self) -> &DedupStore {
        &self.store
    }

    pub fn summary(&self) -> &WriterSummary {
        &self.summary
    }

    /// Offers one record to the store, flushing when a batch completes
    ///
    /// Returns true if the record was accepted.
    pub async fn handle(&mut self, record: ArticleRecord) -> bool {
        self.summary.received += 1;

        let title = record.title.clone();
        if !self.store.insert(record) {
            self.summary.duplicates += 1;
            return false;
        }

        self.summary.accepted += 1;
        if let Some(counter) = &self.accepted_total {
            counter.fetch_add(1, Ordering::Relaxed);
        }
        tracing::info!("{} saved article: {}", self.name, title);

        if self.summary.accepted % self.settings.batch_size.max(1) as u64 == 0 {
            self.flush().await;
        }
        true
    }

    /// Waits up to the read timeout for one record and handles it
    ///
    /// Returns false if the queue stayed empty.
    pub async fn run_once(&mut self) -> bool {
        match self.queue.pop(self.settings.read_timeout).await {
            Some(record) => {
                self.handle(record).await;
                true
            }
            None => false,
        }
    }

    /// Writes the full store to disk; failures are logged and retried on the
    /// next flush
    pub async fn flush(&mut self) {
        match self.store.flush().await {
            Ok(()) => {
                self.summary.flushes += 1;
                tracing::info!(
                    "{} saved {} articles to {}",
                    self.name,
                    self.store.len(),
                    self.store.path().display()
                );
            }
            Err(e) => {
                self.summary.failed_flushes += 1;
                tracing::error!(
                    "{} failed to save articles to {}: {}",
                    self.name,
                    self.store.path().display(),
                    e
                );
            }
        }
    }

    /// Loops until `stop` is cancelled, then drains the queue, flushes, and
    /// returns the worker's counters
    pub async fn run(mut self, stop: CancellationToken) -> WriterSummary {
        advance(&self.name, &mut self.state, WorkerState::Running);
        tracing::info!("{} started", self.name);

        while !stop.is_cancelled() {
            let received = tokio::select! {
                received = self.queue.pop(self.settings.read_timeout) => received,
                _ = stop.cancelled() => None,
            };

            if let Some(record) = received {
                self.handle(record).await;
            }

            tokio::select! {
                _ = tokio::time::sleep(self.settings.interval) => {}
                _ = stop.cancelled() => {}
            }
        }

        advance(&self.name, &mut self.state, WorkerState::Stopping);

        let mut drained = 0;
        while let Some(record) = self.queue.try_pop() {
            self.handle(record).await;
            drained += 1;
        }
        if drained > 0 {
            tracing::debug!("{} drained {} queued records", self.name, drained);
        }

        self.flush().await;

        advance(&self.name, &mut self.state, WorkerState::Stopped);
        self.summary.stored = self.store.len() as u64;
        tracing::info!("{} stopped", self.name);

        self.summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SNAPSHOT_FILE;
    use tempfile::TempDir;

    fn record(url: &str, content: &str) -> ArticleRecord {
        ArticleRecord {
            url: url.to_string(),
            title: format!("Title {}", url),
            content: content.to_string(),
            created_at: "2024-01-01T12:00:00".to_string(),
            source_website: "x".to_string(),
        }
    }

    fn settings() -> WriterSettings {
        WriterSettings {
            interval: Duration::from_millis(1),
            read_timeout: Duration::from_millis(20),
            batch_size: 10,
        }
    }

    fn writer(dir: &TempDir, queue: RecordQueue) -> WriterWorker {
        let store = DedupStore::open(dir.path()).unwrap();
        WriterWorker::new("consumer-test", store, queue, settings())
    }

    fn records_on_disk(dir: &TempDir) -> Option<Vec<ArticleRecord>> {
        let content = std::fs::read_to_string(dir.path().join(SNAPSHOT_FILE)).ok()?;
        serde_json::from_str(&content).ok()
    }

    #[tokio::test]
    async fn test_duplicate_submission_keeps_first() {
        let dir = TempDir::new().unwrap();
        let mut writer = writer(&dir, RecordQueue::new(1));

        assert!(writer.handle(record("https://x/a", "first")).await);
        assert!(!writer.handle(record("https://x/a", "second")).await);

        assert_eq!(writer.store().len(), 1);
        assert_eq!(writer.store().get("https://x/a").unwrap().content, "first");
        assert_eq!(writer.summary().duplicates, 1);
    }

    #[tokio::test]
    async fn test_flush_exactly_at_batch_boundary() {
        let dir = TempDir::new().unwrap();
        let mut writer = writer(&dir, RecordQueue::new(1));

        for i in 1..=9 {
            writer.handle(record(&format!("https://x/{}", i), "c")).await;
        }
        assert_eq!(writer.summary().flushes, 0);
        assert!(records_on_disk(&dir).is_none());

        writer.handle(record("https://x/10", "c")).await;
        assert_eq!(writer.summary().flushes, 1);
        assert_eq!(records_on_disk(&dir).unwrap().len(), 10);

        // Duplicates do not advance the batch count
        writer.handle(record("https://x/10", "c")).await;
        for i in 11..=19 {
            writer.handle(record(&format!("https://x/{}", i), "c")).await;
        }
        assert_eq!(writer.summary().flushes, 1);

        writer.handle(record("https://x/20", "c")).await;
        assert_eq!(writer.summary().flushes, 2);
    }

    #[tokio::test]
    async fn test_reloaded_records_do_not_shift_batches() {
        let dir = TempDir::new().unwrap();
        {
            let mut first = writer(&dir, RecordQueue::new(1));
            for i in 0..3 {
                first.handle(record(&format!("https://x/old{}", i), "c")).await;
            }
            first.flush().await;
        }

        let mut writer = writer(&dir, RecordQueue::new(1));
        assert_eq!(writer.store().len(), 3);
        for i in 1..=7 {
            writer.handle(record(&format!("https://x/{}", i), "c")).await;
        }
        assert_eq!(writer.summary().flushes, 0);
    }

    #[tokio::test]
    async fn test_run_once_times_out_on_empty_queue() {
        let dir = TempDir::new().unwrap();
        let mut writer = writer(&dir, RecordQueue::new(1));
        assert!(!writer.run_once().await);
        assert_eq!(writer.summary().received, 0);
    }

    #[tokio::test]
    async fn test_final_flush_on_stop() {
        let dir = TempDir::new().unwrap();
        let queue = RecordQueue::new(10);
        let worker = writer(&dir, queue.clone());

        let stop = CancellationToken::new();
        let handle = tokio::spawn(worker.run(stop.clone()));

        for i in 0..3 {
            queue
                .push(record(&format!("https://x/{}", i), "c"), Duration::from_secs(1))
                .await
                .unwrap();
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
        stop.cancel();
        let summary = handle.await.unwrap();

        assert_eq!(summary.accepted, 3);
        assert_eq!(summary.flushes, 1);
        assert_eq!(summary.stored, 3);
        assert_eq!(records_on_disk(&dir).unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_stop_drains_queued_records() {
        let dir = TempDir::new().unwrap();
        let queue = RecordQueue::new(10);
        for i in 0..5 {
            queue
                .push(record(&format!("https://x/{}", i), "c"), Duration::from_secs(1))
                .await
                .unwrap();
        }

        let stop = CancellationToken::new();
        stop.cancel();
        let summary = writer(&dir, queue.clone()).run(stop).await;

        assert!(queue.is_empty());
        assert_eq!(summary.accepted, 5);
        assert_eq!(summary.flushes, 1);
        assert_eq!(records_on_disk(&dir).unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_final_flush_happens_once_even_on_batch_boundary() {
        let dir = TempDir::new().unwrap();
        let queue = RecordQueue::new(10);
        for i in 0..10 {
            queue
                .push(record(&format!("https://x/{}", i), "c"), Duration::from_secs(1))
                .await
                .unwrap();
        }

        let stop = CancellationToken::new();
        stop.cancel();
        let summary = writer(&dir, queue).run(stop).await;

        // One batch flush at 10 plus the unconditional shutdown flush
        assert_eq!(summary.flushes, 2);
    }

    #[tokio::test]
    async fn test_failed_flush_is_logged_and_state_kept() {
        let dir = TempDir::new().unwrap();
        let mut writer = writer(&dir, RecordQueue::new(1));
        writer.handle(record("https://x/a", "c")).await;

        // Replace the output directory with a file so the write fails
        std::fs::remove_dir_all(dir.path()).unwrap();
        std::fs::write(dir.path(), "blocker").unwrap();

        writer.flush().await;
        assert_eq!(writer.summary().failed_flushes, 1);
        assert_eq!(writer.store().len(), 1);

        std::fs::remove_file(dir.path()).unwrap();
        writer.flush().await;
        assert_eq!(writer.summary().flushes, 1);
        assert_eq!(records_on_disk(&dir).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_accepted_counter_shared() {
        let dir_a = TempDir::new().unwrap();
        let dir_b = TempDir::new().unwrap();
        let counter = Arc::new(AtomicU64::new(0));

        let mut a = writer(&dir_a, RecordQueue::new(1)).with_accepted_counter(counter.clone());
        let mut b = writer(&dir_b, RecordQueue::new(1)).with_accepted_counter(counter.clone());

        a.handle(record("https://x/1", "c")).await;
        b.handle(record("https://x/1", "c")).await;
        b.handle(record("https://x/1", "c")).await;

        assert_eq!(counter.load(Ordering::Relaxed), 2);
    }
}
