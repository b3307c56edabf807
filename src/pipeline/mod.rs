//! Pipeline module: the bounded queue and the controller that ties the
//! fetcher and writer pools together
//!
//! This module contains:
//! - The bounded multi-producer/multi-consumer record queue
//! - The controller that builds, starts and stops every worker
//! - The end-of-run report

mod controller;
mod queue;
mod report;

pub use controller::{Pipeline, PipelineError};
pub use queue::{QueueError, RecordQueue};
pub use report::{print_report, PipelineReport};
