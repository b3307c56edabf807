use serde::Deserialize;
use std::time::Duration;

/// Default HTTP timeout for a single page fetch, in seconds
pub const DEFAULT_FETCH_TIMEOUT_SECS: f64 = 10.0;

/// Default time a fetcher waits for room in the queue, in seconds
pub const DEFAULT_PUT_TIMEOUT_SECS: f64 = 1.0;

/// Default time a writer waits for a record before polling again, in seconds
pub const DEFAULT_READ_TIMEOUT_SECS: f64 = 10.0;

/// Default number of accepted records between snapshot flushes
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Main configuration structure for Article Harvester
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub producer: ProducerConfig,
    pub consumer: ConsumerConfig,
    pub queue: QueueConfig,
    #[serde(default)]
    pub logging: Option<LoggingConfig>,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub sites: Vec<SiteEntry>,
}

/// Fetcher pool configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ProducerConfig {
    /// Number of fetcher workers
    pub count: usize,

    /// Pause between fetcher iterations (seconds)
    pub produce_interval: f64,

    /// Seed URLs every fetcher starts from and returns to
    pub start_urls: Vec<String>,

    /// HTTP timeout per fetch (seconds)
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout: f64,

    /// How long to wait for queue capacity before dropping a record (seconds)
    #[serde(default = "default_put_timeout")]
    pub put_timeout: f64,
}

/// Writer pool configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ConsumerConfig {
    /// Number of writer workers
    pub count: usize,

    /// Pause between writer iterations (seconds)
    pub consume_interval: f64,

    /// Base directory for the JSON snapshots
    pub output_dir: String,

    /// How long a writer blocks on an empty queue (seconds)
    #[serde(default = "default_read_timeout")]
    pub read_timeout: f64,

    /// Accepted records between flushes
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

/// Shared queue configuration
#[derive(Debug, Clone, Deserialize)]
pub struct QueueConfig {
    /// Capacity of the bounded queue
    pub max_size: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive, e.g. "info" or "article_harvester=debug"
    #[serde(default)]
    pub level: Option<String>,

    /// Write logs to this file instead of stderr
    #[serde(default)]
    pub file: Option<String>,
}

/// Optional caps that end a run without an interrupt
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LimitsConfig {
    /// Stop after this many seconds
    #[serde(default)]
    pub max_runtime: Option<f64>,

    /// Stop once this many records have been accepted across all writers
    #[serde(default)]
    pub max_records: Option<u64>,
}

/// An allowed site and the path pattern identifying its article pages
#[derive(Debug, Clone, Deserialize)]
pub struct SiteEntry {
    /// Site domain; subdomains are accepted as well
    pub domain: String,

    /// Regular expression matched against the URL path
    pub pattern: String,
}

impl ProducerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs_f64(self.produce_interval)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.fetch_timeout)
    }

    pub fn put_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.put_timeout)
    }
}

impl ConsumerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs_f64(self.consume_interval)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.read_timeout)
    }
}

impl LimitsConfig {
    pub fn max_runtime(&self) -> Option<Duration> {
        self.max_runtime.map(Duration::from_secs_f64)
    }
}

fn default_fetch_timeout() -> f64 {
    DEFAULT_FETCH_TIMEOUT_SECS
}

fn default_put_timeout() -> f64 {
    DEFAULT_PUT_TIMEOUT_SECS
}

fn default_read_timeout() -> f64 {
    DEFAULT_READ_TIMEOUT_SECS
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}
