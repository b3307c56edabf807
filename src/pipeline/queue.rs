//! The bounded queue shared by every fetcher and writer
//!
//! This is the only synchronization point of the pipeline. It is a
//! multi-producer multi-consumer FIFO with a fixed capacity; both directions
//! support a bounded wait so that neither side can block forever.

use crate::record::ArticleRecord;
use flume::{Receiver, Sender};
use std::time::Duration;
use thiserror::Error;

/// Errors returned when pushing onto the queue
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("Queue still full after {0:?}")]
    Timeout(Duration),

    #[error("Queue disconnected")]
    Disconnected,
}

/// Fixed-capacity FIFO of records
///
/// Cloning yields another handle onto the same queue.
#[derive(Debug, Clone)]
pub struct RecordQueue {
    tx: Sender<ArticleRecord>,
    rx: Receiver<ArticleRecord>,
    capacity: usize,
}

impl RecordQueue {
    /// Creates a queue holding at most `capacity` records
    ///
    /// `capacity` must be at least 1; the pipeline validates this before
    /// building the queue.
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = flume::bounded(capacity);
        Self { tx, rx, capacity }
    }

    /// Enqueues a record, waiting at most `timeout` for room
    ///
    /// On timeout the record is dropped and `QueueError::Timeout` returned.
    pub async fn push(&self, record: ArticleRecord, timeout: Duration) -> Result<(), QueueError> {
        match tokio::time::timeout(timeout, self.tx.send_async(record)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(_)) => Err(QueueError::Disconnected),
            Err(_) => Err(QueueError::Timeout(timeout)),
        }
    }

    /// Dequeues the oldest record, waiting at most `timeout` for one
    ///
    /// Returns `None` if the queue stayed empty for the whole wait.
    pub async fn pop(&self, timeout: Duration) -> Option<ArticleRecord> {
        match tokio::time::timeout(timeout, self.rx.recv_async()).await {
            Ok(Ok(record)) => Some(record),
            Ok(Err(_)) | Err(_) => None,
        }
    }

    /// Dequeues a record only if one is immediately available
    pub fn try_pop(&self) -> Option<ArticleRecord> {
        self.rx.try_recv().ok()
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.rx.is_full()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
