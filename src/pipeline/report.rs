//! End-of-run statistics
//!
//! Every worker returns its counters when it stops; the pipeline collects
//! them into a [`PipelineReport`] that `main` prints after shutdown.

use crate::crawler::FetcherSummary;
use crate::storage::WriterSummary;
use std::time::Duration;

/// Aggregated counters of a finished run
#[derive(Debug, Clone, Default)]
pub struct PipelineReport {
    pub fetchers: Vec<FetcherSummary>,
    pub writers: Vec<WriterSummary>,
    pub elapsed: Duration,
}

impl PipelineReport {
    pub fn pages_fetched(&self) -> u64 {
        self.fetchers.iter().map(|f| f.fetched).sum()
    }

    pub fn fetch_failures(&self) -> u64 {
        self.fetchers.iter().map(|f| f.failed).sum()
    }

    pub fn records_produced(&self) -> u64 {
        self.fetchers.iter().map(|f| f.produced).sum()
    }

    pub fn records_dropped(&self) -> u64 {
        self.fetchers.iter().map(|f| f.dropped).sum()
    }

    pub fn records_accepted(&self) -> u64 {
        self.writers.iter().map(|w| w.accepted).sum()
    }

    pub fn duplicates_rejected(&self) -> u64 {
        self.writers.iter().map(|w| w.duplicates).sum()
    }

    pub fn failed_flushes(&self) -> u64 {
        self.writers.iter().map(|w| w.failed_flushes).sum()
    }
}

/// Prints the report to stdout in a formatted manner
pub fn print_report(report: &PipelineReport) {
    println!("=== Harvest Statistics ===\n");

    println!("Overview:");
    println!("  Run time: {:.1}s", report.elapsed.as_secs_f64());
    println!("  Pages fetched: {}", report.pages_fetched());
    println!("  Fetch failures: {}", report.fetch_failures());
    println!("  Records produced: {}", report.records_produced());
    println!("  Records dropped (queue full): {}", report.records_dropped());
    println!("  Records accepted: {}", report.records_accepted());
    println!("  Duplicates rejected: {}", report.duplicates_rejected());
    println!();

    println!("Fetchers:");
    for f in &report.fetchers {
        println!(
            "  {}: {} iterations, {} fetched, {} failed, {} produced, {} dropped, {} skipped",
            f.name, f.iterations, f.fetched, f.failed, f.produced, f.dropped, f.skipped
        );
    }
    println!();

    println!("Writers:");
    for w in &report.writers {
        println!(
            "  {}: {} received, {} accepted, {} duplicates, {} stored, {} flushes ({} failed)",
            w.name, w.received, w.accepted, w.duplicates, w.stored, w.flushes, w.failed_flushes
        );
    }

    if report.failed_flushes() > 0 {
        println!(
            "\n⚠ {} snapshot flushes failed; check the log for details",
            report.failed_flushes()
        );
    }
}
