//! Fetcher worker: the producer side of the pipeline
//!
//! A fetcher owns one [`Frontier`] and loops until told to stop:
//! 1. Pop the next URL (refilling from the seeds when empty)
//! 2. Skip it if this worker already crawled it
//! 3. Fetch and extract; on failure log and move on
//! 4. Fold newly discovered links into the frontier
//! 5. Push the record onto the shared queue, dropping it if the queue stays full
//! 6. Sleep the produce interval
//!
//! The stop signal is checked once per iteration; a fetch in progress is
//! always allowed to finish.

use crate::crawler::fetcher::fetch_and_extract;
use crate::crawler::frontier::Frontier;
use crate::pipeline::RecordQueue;
use crate::state::{advance, WorkerState};
use crate::url::ArticleFilter;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Timing parameters for a fetcher worker
#[derive(Debug, Clone, Copy)]
pub struct FetcherSettings {
    /// Pause between iterations
    pub interval: Duration,

    /// How long to wait for queue capacity before dropping a record
    pub put_timeout: Duration,
}

/// What a single fetcher iteration did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterationOutcome {
    /// No URL available (empty seed list)
    Idle,
    /// URL already crawled by this worker
    Skipped,
    /// Fetch failed; URL stays unvisited
    Failed,
    /// Record pushed onto the queue; URL marked visited
    Produced,
    /// Queue stayed full; record dropped and URL left unvisited
    Dropped,
}

/// Counters reported by a fetcher when it stops
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetcherSummary {
    pub name: String,
    pub iterations: u64,
    pub skipped: u64,
    pub fetched: u64,
    pub failed: u64,
    pub produced: u64,
    pub dropped: u64,
}

pub struct FetcherWorker {
    name: String,
    frontier: Frontier,
    client: Client,
    filter: Arc<ArticleFilter>,
    queue: RecordQueue,
    settings: FetcherSettings,
    state: WorkerState,
    summary: FetcherSummary,
}

impl FetcherWorker {
    pub fn new(
        name: impl Into<String>,
        seeds: Vec<String>,
        client: Client,
        filter: Arc<ArticleFilter>,
        queue: RecordQueue,
        settings: FetcherSettings,
    ) -> Self {
        let name = name.into();
        Self {
            summary: FetcherSummary {
                name: name.clone(),
                ..Default::default()
            },
            name,
            frontier: Frontier::new(seeds),
            client,
            filter,
            queue,
            settings,
            state: WorkerState::Idle,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    pub fn summary(&self) -> &FetcherSummary {
        &self.summary
    }

    /// Runs one crawl iteration, without the trailing sleep
    pub async fn run_once(&mut self) -> IterationOutcome {
        self.summary.iterations += 1;

        let Some(url) = self.frontier.next_url() else {
            return IterationOutcome::Idle;
        };

        if self.frontier.is_visited(&url) {
            tracing::debug!("{} skipping visited {}", self.name, url);
            self.summary.skipped += 1;
            return IterationOutcome::Skipped;
        }

        let page = match fetch_and_extract(&self.client, &self.filter, &url).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("{} failed to crawl {}: {}", self.name, url, e);
                self.summary.failed += 1;
                return IterationOutcome::Failed;
            }
        };
        self.summary.fetched += 1;

        let added = self.frontier.extend(page.links);
        tracing::debug!(
            "{} discovered {} new links on {} ({} pending)",
            self.name,
            added,
            url,
            self.frontier.pending_len()
        );

        let title = page.record.title.clone();
        match self.queue.push(page.record, self.settings.put_timeout).await {
            Ok(()) => {
                self.frontier.mark_visited(url);
                self.summary.produced += 1;
                tracing::info!("{} produced article: {}", self.name, title);
                IterationOutcome::Produced
            }
            Err(e) => {
                tracing::warn!("{} dropped record for {}: {}", self.name, url, e);
                self.summary.dropped += 1;
                IterationOutcome::Dropped
            }
        }
    }

    /// Loops until `stop` is cancelled, then returns the worker's counters
    pub async fn run(mut self, stop: CancellationToken) -> FetcherSummary {
        advance(&self.name, &mut self.state, WorkerState::Running);
        tracing::info!("{} started", self.name);

        while !stop.is_cancelled() {
            self.run_once().await;

            tokio::select! {
                _ = tokio::time::sleep(self.settings.interval) => {}
                _ = stop.cancelled() => {}
            }
        }

        advance(&self.name, &mut self.state, WorkerState::Stopping);
        tracing::info!(
            "{} stopping: {} produced, {} failed, {} dropped, {} visited",
            self.name,
            self.summary.produced,
            self.summary.failed,
            self.summary.dropped,
            self.frontier.visited_len()
        );
        advance(&self.name, &mut self.state, WorkerState::Stopped);
        tracing::info!("{} stopped", self.name);

        self.summary
    }
}
