//! State module for tracking worker lifecycles
//!
//! Fetcher and writer workers are explicit state machines; `WorkerState`
//! records where each one is between start and shutdown.

mod worker_state;

pub(crate) use worker_state::advance;
pub use worker_state::WorkerState;
