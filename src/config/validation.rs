use crate::config::types::{
    Config, ConsumerConfig, LimitsConfig, ProducerConfig, QueueConfig, SiteEntry,
};
use crate::ConfigError;
use regex::Regex;
use std::time::Duration;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_producer_config(&config.producer)?;
    validate_consumer_config(&config.consumer)?;
    validate_queue_config(&config.queue)?;
    validate_limits(&config.limits)?;
    validate_sites(&config.sites)?;
    Ok(())
}

/// Validates fetcher pool configuration
fn validate_producer_config(config: &ProducerConfig) -> Result<(), ConfigError> {
    if config.count < 1 {
        return Err(ConfigError::Validation(format!(
            "producer count must be >= 1, got {}",
            config.count
        )));
    }

    validate_seconds("produce_interval", config.produce_interval)?;
    validate_seconds("fetch_timeout", config.fetch_timeout)?;
    validate_seconds("put_timeout", config.put_timeout)?;

    if config.start_urls.is_empty() {
        return Err(ConfigError::Validation(
            "start_urls must contain at least one URL".to_string(),
        ));
    }

    for seed in &config.start_urls {
        let url = Url::parse(seed).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid start URL '{}': {}", seed, e))
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::Validation(format!(
                "Start URL '{}' must use HTTP or HTTPS",
                seed
            )));
        }
    }

    Ok(())
}

/// Validates writer pool configuration
fn validate_consumer_config(config: &ConsumerConfig) -> Result<(), ConfigError> {
    if config.count < 1 {
        return Err(ConfigError::Validation(format!(
            "consumer count must be >= 1, got {}",
            config.count
        )));
    }

    validate_seconds("consume_interval", config.consume_interval)?;
    validate_seconds("read_timeout", config.read_timeout)?;

    if config.output_dir.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output_dir cannot be empty".to_string(),
        ));
    }

    if config.batch_size < 1 {
        return Err(ConfigError::Validation(
            "batch_size must be >= 1".to_string(),
        ));
    }

    Ok(())
}

fn validate_queue_config(config: &QueueConfig) -> Result<(), ConfigError> {
    if config.max_size < 1 {
        return Err(ConfigError::Validation(format!(
            "queue max_size must be >= 1, got {}",
            config.max_size
        )));
    }
    Ok(())
}

fn validate_limits(config: &LimitsConfig) -> Result<(), ConfigError> {
    if let Some(max_runtime) = config.max_runtime {
        validate_seconds("max_runtime", max_runtime)?;
    }
    if config.max_records == Some(0) {
        return Err(ConfigError::Validation(
            "max_records must be >= 1 when set".to_string(),
        ));
    }
    Ok(())
}

/// Validates the site table entries
fn validate_sites(sites: &[SiteEntry]) -> Result<(), ConfigError> {
    for entry in sites {
        validate_domain_string(&entry.domain)?;

        if entry.pattern.is_empty() {
            return Err(ConfigError::InvalidPattern(format!(
                "Article pattern for '{}' cannot be empty",
                entry.domain
            )));
        }

        Regex::new(&entry.pattern).map_err(|e| {
            ConfigError::InvalidPattern(format!(
                "Article pattern '{}' for '{}': {}",
                entry.pattern, entry.domain, e
            ))
        })?;
    }
    Ok(())
}

/// Durations must be finite, strictly positive and representable as a `Duration`
fn validate_seconds(name: &str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::Validation(format!(
            "{} must be a positive number of seconds, got {}",
            name, value
        )));
    }
    if Duration::try_from_secs_f64(value).is_err() {
        return Err(ConfigError::Validation(format!(
            "{} is too large: {} seconds",
            name, value
        )));
    }
    Ok(())
}

/// Validates a site domain string
fn validate_domain_string(domain: &str) -> Result<(), ConfigError> {
    if domain.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Domain cannot be empty".to_string(),
        ));
    }

    if !domain
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' contains invalid characters",
            domain
        )));
    }

    if domain.starts_with('.')
        || domain.ends_with('.')
        || domain.starts_with('-')
        || domain.ends_with('-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' cannot start or end with '.' or '-'",
            domain
        )));
    }

    if domain.contains("..") {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' cannot contain consecutive dots",
            domain
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' must contain at least one dot (e.g., 'novinky.cz')",
            domain
        )));
    }

    Ok(())
}
