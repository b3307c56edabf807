//! Pipeline controller - worker lifecycle orchestration
//!
//! The controller owns the shared queue and every worker. It:
//! - Builds the queue, the HTTP client and all fetcher/writer workers
//! - Spawns each worker as its own task
//! - Shuts down in order: fetchers first, then writers, so writers keep
//!   draining while fetchers wind down and only flush after every producer
//!   has stopped

use crate::config::{validate, Config, LimitsConfig};
use crate::crawler::{build_http_client, FetcherSettings, FetcherSummary, FetcherWorker};
use crate::pipeline::{PipelineReport, RecordQueue};
use crate::storage::{DedupStore, StorageError, WriterSettings, WriterSummary, WriterWorker};
use crate::url::ArticleFilter;
use crate::ConfigError;
use std::future::Future;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

/// How often `run_until` checks the run-time and record caps
const LIMIT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Errors raised while setting up or starting the pipeline
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("At least one producer is required, got {0}")]
    NoProducers(usize),

    #[error("At least one consumer is required, got {0}")]
    NoConsumers(usize),

    #[error("Pipeline already started")]
    AlreadyStarted,

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to open output store: {0}")]
    Storage(#[from] StorageError),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// The fetcher → queue → writer pipeline
pub struct Pipeline {
    queue: RecordQueue,
    limits: LimitsConfig,
    fetchers: Vec<FetcherWorker>,
    writers: Vec<WriterWorker>,
    fetcher_handles: Vec<JoinHandle<FetcherSummary>>,
    writer_handles: Vec<JoinHandle<WriterSummary>>,
    fetcher_stop: CancellationToken,
    writer_stop: CancellationToken,
    accepted: Arc<AtomicU64>,
    started_at: Option<Instant>,
}

impl Pipeline {
    /// Builds the queue and every worker from `config`
    ///
    /// # Errors
    ///
    /// * `PipelineError::NoProducers` - `producer.count` is zero
    /// * `PipelineError::NoConsumers` - `consumer.count` is zero
    /// * `PipelineError::Config` - any other invalid setting
    /// * `PipelineError::Storage` - an output directory cannot be opened
    pub fn new(config: Config) -> Result<Self, PipelineError> {
        tracing::info!("Pipeline setup started");

        if config.producer.count < 1 {
            tracing::error!("Not enough producers: {}", config.producer.count);
            return Err(PipelineError::NoProducers(config.producer.count));
        }
        if config.consumer.count < 1 {
            return Err(PipelineError::NoConsumers(config.consumer.count));
        }
        validate(&config)?;

        let queue = RecordQueue::new(config.queue.max_size);
        let filter = Arc::new(ArticleFilter::from_entries(&config.sites)?);
        let client = build_http_client(config.producer.fetch_timeout())?;
        let accepted = Arc::new(AtomicU64::new(0));

        let fetcher_settings = FetcherSettings {
            interval: config.producer.interval(),
            put_timeout: config.producer.put_timeout(),
        };
        let fetchers = (1..=config.producer.count)
            .map(|i| {
                let worker = FetcherWorker::new(
                    format!("producer-{}", i),
                    config.producer.start_urls.clone(),
                    client.clone(),
                    filter.clone(),
                    queue.clone(),
                    fetcher_settings,
                );
                tracing::debug!("Initialized {}", worker.name());
                worker
            })
            .collect();

        let writer_settings = WriterSettings {
            interval: config.consumer.interval(),
            read_timeout: config.consumer.read_timeout(),
            batch_size: config.consumer.batch_size,
        };
        let output_dir = Path::new(&config.consumer.output_dir);
        let writers = (1..=config.consumer.count)
            .map(|i| {
                let name = format!("consumer-{}", i);
                let store = DedupStore::open(&output_dir.join(&name))?;
                let worker = WriterWorker::new(name, store, queue.clone(), writer_settings)
                    .with_accepted_counter(accepted.clone());
                tracing::debug!("Initialized {}", worker.name());
                Ok(worker)
            })
            .collect::<Result<Vec<_>, StorageError>>()?;

        tracing::info!(
            "Pipeline setup completed: {} producers, {} consumers, queue capacity {}",
            config.producer.count,
            config.consumer.count,
            config.queue.max_size
        );

        Ok(Self {
            queue,
            limits: config.limits,
            fetchers,
            writers,
            fetcher_handles: Vec::new(),
            writer_handles: Vec::new(),
            fetcher_stop: CancellationToken::new(),
            writer_stop: CancellationToken::new(),
            accepted,
            started_at: None,
        })
    }

    pub fn queue(&self) -> &RecordQueue {
        &self.queue
    }

    /// Records accepted across all writers so far in this run
    pub fn accepted_count(&self) -> u64 {
        self.accepted.load(Ordering::Relaxed)
    }

    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    /// Spawns every worker on the runtime
    pub fn start(&mut self) -> Result<(), PipelineError> {
        if self.is_started() {
            return Err(PipelineError::AlreadyStarted);
        }

        tracing::info!("Starting producers and consumers");
        self.started_at = Some(Instant::now());

        for worker in self.fetchers.drain(..) {
            let span = tracing::info_span!("fetcher", name = %worker.name());
            let stop = self.fetcher_stop.clone();
            self.fetcher_handles
                .push(tokio::spawn(worker.run(stop).instrument(span)));
        }

        for worker in self.writers.drain(..) {
            let span = tracing::info_span!("writer", name = %worker.name());
            let stop = self.writer_stop.clone();
            self.writer_handles
                .push(tokio::spawn(worker.run(stop).instrument(span)));
        }

        Ok(())
    }

    /// Stops every worker and returns the collected counters
    ///
    /// Fetchers are signalled and joined first; writers are signalled only
    /// afterwards, then drain the queue, flush, and are joined.
    pub async fn stop(&mut self) -> PipelineReport {
        tracing::info!("Stopping producers and consumers");
        let mut report = PipelineReport::default();

        self.fetcher_stop.cancel();
        for handle in self.fetcher_handles.drain(..) {
            match handle.await {
                Ok(summary) => report.fetchers.push(summary),
                Err(e) => tracing::error!("Fetcher task failed: {}", e),
            }
        }
        tracing::debug!("All producers stopped; {} records queued", self.queue.len());

        self.writer_stop.cancel();
        for handle in self.writer_handles.drain(..) {
            match handle.await {
                Ok(summary) => report.writers.push(summary),
                Err(e) => tracing::error!("Writer task failed: {}", e),
            }
        }

        report.elapsed = self
            .started_at
            .map(|started| started.elapsed())
            .unwrap_or_default();
        tracing::info!("All producers and consumers have been stopped");

        report
    }

    /// Starts the pipeline and runs it until `shutdown` resolves or a
    /// configured cap is reached, then performs the ordered shutdown
    pub async fn run_until<F>(mut self, shutdown: F) -> Result<PipelineReport, PipelineError>
    where
        F: Future<Output = ()>,
    {
        self.start()?;
        let started = Instant::now();
        let max_runtime = self.limits.max_runtime();
        let max_records = self.limits.max_records;

        tokio::pin!(shutdown);
        let mut ticker = tokio::time::interval(LIMIT_POLL_INTERVAL);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Shutdown requested");
                    break;
                }
                _ = ticker.tick() => {
                    if let Some(limit) = max_runtime {
                        if started.elapsed() >= limit {
                            tracing::info!("Run time limit of {:?} reached", limit);
                            break;
                        }
                    }
                    if let Some(limit) = max_records {
                        if self.accepted_count() >= limit {
                            tracing::info!("Record limit of {} reached", limit);
                            break;
                        }
                    }
                }
            }
        }

        Ok(self.stop().await)
    }

    /// Runs until Ctrl-C (or a configured cap)
    pub async fn run(self) -> Result<PipelineReport, PipelineError> {
        tracing::info!("Pipeline running. Press Ctrl+C to stop.");
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
    }
}
