//! Configuration module for Article Harvester
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use article_harvester::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvester.toml")).unwrap();
//! println!("Fetchers: {}", config.producer.count);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, ConsumerConfig, LimitsConfig, LoggingConfig, ProducerConfig, QueueConfig, SiteEntry,
    DEFAULT_BATCH_SIZE, DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_PUT_TIMEOUT_SECS,
    DEFAULT_READ_TIMEOUT_SECS,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
