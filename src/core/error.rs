//! Error types for scheduler operations.

use std::fmt;

use thiserror::Error;

/// Errors produced by scheduler components.
///
/// Push and pop never fail while the queue is open; these variants cover
/// construction, configuration and server setup.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Configuration rejected by validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Queue storage could not be reserved.
    #[error("failed to allocate queue storage for {capacity} requests")]
    Allocation {
        /// Requested queue capacity.
        capacity: usize,
    },
    /// A worker thread could not be started.
    #[error("failed to spawn worker thread: {0}")]
    WorkerSpawn(String),
    /// Listener or socket setup failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Returned by [`SchedulingQueue::push`](crate::core::SchedulingQueue::push)
/// once the queue has been closed. Carries the rejected value back to the caller.
#[derive(PartialEq, Eq)]
pub struct Closed<T>(pub T);

impl<T> Closed<T> {
    /// Recover the value that could not be enqueued.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for Closed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Closed(..)")
    }
}

impl<T> fmt::Display for Closed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("scheduling queue is closed")
    }
}

impl<T> std::error::Error for Closed<T> {}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
