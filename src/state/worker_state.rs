/// Lifecycle state definitions shared by fetcher and writer workers
use std::fmt;

/// Represents where a worker is in its lifecycle
///
/// Every worker moves strictly forward through
/// `Idle → Running → Stopping → Stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkerState {
    /// Constructed but not yet started
    Idle,

    /// Looping over its work
    Running,

    /// Stop signal observed; finishing the current iteration and cleaning up
    Stopping,

    /// Finished; performs no further queue, network or disk activity
    Stopped,
}

impl WorkerState {
    /// Returns true if the worker will not do any more work
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Stopped)
    }

    /// Returns true if `next` is the legal successor of this state
    pub fn can_transition_to(&self, next: WorkerState) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Running)
                | (Self::Running, Self::Stopping)
                | (Self::Stopping, Self::Stopped)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Stopping => "stopping",
            Self::Stopped => "stopped",
        }
    }
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Moves `state` to `next`, logging the transition
///
/// Illegal transitions are logged and ignored so that a worker never moves
/// backwards.
pub(crate) fn advance(worker: &str, state: &mut WorkerState, next: WorkerState) {
    if state.can_transition_to(next) {
        tracing::debug!("{}: {} -> {}", worker, state, next);
        *state = next;
    } else {
        tracing::warn!(
            "{}: ignoring invalid state transition {} -> {}",
            worker,
            state,
            next
        );
    }
}
