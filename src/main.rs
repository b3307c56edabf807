//! Article Harvester main entry point
//!
//! This is the command-line interface for the Article Harvester pipeline.

use article_harvester::config::{load_config_with_hash, validate, Config, LoggingConfig};
use article_harvester::pipeline::{print_report, Pipeline};
use article_harvester::url::ArticleFilter;
use clap::Parser;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Article Harvester: a concurrent news article ingestion pipeline
///
/// Fetcher workers crawl article pages from the configured sites and push
/// extracted records into a bounded queue; writer workers deduplicate the
/// records by URL and persist them as JSON snapshots.
#[derive(Parser, Debug)]
#[command(name = "article-harvester")]
#[command(version = "1.0.0")]
#[command(about = "A concurrent news article harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG", default_value = "harvester.toml")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be harvested without fetching anything
    #[arg(long)]
    dry_run: bool,

    /// Stop after this many seconds (overrides the config file)
    #[arg(long, value_name = "SECONDS")]
    max_runtime: Option<f64>,

    /// Stop once this many records have been accepted (overrides the config file)
    #[arg(long, value_name = "COUNT")]
    max_records: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Configuration is loaded before logging so the [logging] table can
    // choose the log file; load errors go straight to stderr
    let (mut config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Failed to load configuration from {}: {}", cli.config.display(), e);
            return Err(e.into());
        }
    };

    setup_logging(cli.verbose, cli.quiet, config.logging.as_ref())?;
    tracing::info!(
        "Configuration loaded from {} (hash: {})",
        cli.config.display(),
        config_hash
    );

    if let Some(max_runtime) = cli.max_runtime {
        config.limits.max_runtime = Some(max_runtime);
    }
    if let Some(max_records) = cli.max_records {
        config.limits.max_records = Some(max_records);
    }
    validate(&config)?;

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else {
        handle_run(config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Command-line flags take precedence over the `[logging]` level; a
/// configured log file replaces stderr as the destination.
fn setup_logging(
    verbose: u8,
    quiet: bool,
    logging: Option<&LoggingConfig>,
) -> Result<(), Box<dyn std::error::Error>> {
    let configured_level = logging.and_then(|l| l.level.as_deref());

    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match (verbose, configured_level) {
            (0, Some(level)) => EnvFilter::try_new(level)?,
            (0, None) => EnvFilter::new("article_harvester=info,warn"),
            (1, _) => EnvFilter::new("article_harvester=debug,info"),
            (2, _) => EnvFilter::new("article_harvester=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false);

    match logging.and_then(|l| l.file.as_deref()) {
        Some(path) => {
            if let Some(parent) = Path::new(path).parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => builder.init(),
    }

    Ok(())
}

/// Handles the --dry-run mode: validates config and shows what would run
fn handle_dry_run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let filter = ArticleFilter::from_entries(&config.sites)?;

    println!("=== Article Harvester Dry Run ===\n");

    println!("Producers:");
    println!("  Count: {}", config.producer.count);
    println!("  Interval: {}s", config.producer.produce_interval);
    println!("  Fetch timeout: {}s", config.producer.fetch_timeout);
    println!("  Put timeout: {}s", config.producer.put_timeout);
    println!("  Start URLs ({}):", config.producer.start_urls.len());
    for url in &config.producer.start_urls {
        println!("    * {}", url);
    }

    println!("\nConsumers:");
    println!("  Count: {}", config.consumer.count);
    println!("  Interval: {}s", config.consumer.consume_interval);
    println!("  Read timeout: {}s", config.consumer.read_timeout);
    println!("  Batch size: {}", config.consumer.batch_size);
    println!("  Output directory: {}", config.consumer.output_dir);

    println!("\nQueue:");
    println!("  Max size: {}", config.queue.max_size);

    println!("\nAllowed Sites ({}):", filter.sites().len());
    for site in filter.sites() {
        println!("  - {} ({})", site.domain(), site.pattern());
    }

    println!("\nLimits:");
    match config.limits.max_runtime {
        Some(secs) => println!("  Max runtime: {}s", secs),
        None => println!("  Max runtime: none"),
    }
    match config.limits.max_records {
        Some(count) => println!("  Max records: {}", count),
        None => println!("  Max records: none"),
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would start {} fetchers and {} writers",
        config.producer.count, config.consumer.count
    );

    Ok(())
}

/// Handles the main harvest run
async fn handle_run(config: Config) -> article_harvester::Result<()> {
    tracing::info!(
        "Producers: {}, Consumers: {}, Queue size: {}",
        config.producer.count,
        config.consumer.count,
        config.queue.max_size
    );

    let pipeline = Pipeline::new(config)?;

    match pipeline.run().await {
        Ok(report) => {
            tracing::info!("Harvest completed successfully");
            print_report(&report);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            Err(e.into())
        }
    }
}
