//! Scheduling queue and worker pool settings.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::SchedulingPolicy;

/// Default queue capacity.
pub const DEFAULT_QUEUE_CAPACITY: usize = 16;
/// Default number of worker threads.
pub const DEFAULT_WORKER_COUNT: usize = 4;

/// Queue and worker pool configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, clap::Args)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Scheduling policy (fifo or sff)
    #[arg(long, value_enum, ignore_case = true, default_value_t = SchedulingPolicy::Fifo, env = "SFS_POLICY")]
    pub policy: SchedulingPolicy,

    /// Number of worker threads
    #[arg(short = 't', long = "threads", default_value_t = DEFAULT_WORKER_COUNT, env = "SFS_THREADS")]
    pub worker_count: usize,

    /// Maximum number of queued requests
    #[arg(short = 'q', long = "queue-size", default_value_t = DEFAULT_QUEUE_CAPACITY, env = "SFS_QUEUE_SIZE")]
    pub queue_capacity: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            policy: SchedulingPolicy::Fifo,
            worker_count: DEFAULT_WORKER_COUNT,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl SchedulerConfig {
    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first offending field.
    pub fn validate(&self) -> Result<(), String> {
        if self.worker_count == 0 {
            return Err("worker_count must be greater than 0".into());
        }
        if self.queue_capacity == 0 {
            return Err("queue_capacity must be greater than 0".into());
        }
        Ok(())
    }

    /// Clamp zero counts up to 1, warning about each adjustment.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if self.worker_count == 0 {
            warn!("worker count must be at least 1; using 1");
            self.worker_count = 1;
        }
        if self.queue_capacity == 0 {
            warn!("queue size must be at least 1; using 1");
            self.queue_capacity = 1;
        }
        self
    }

    /// Builder-style policy setter.
    #[must_use]
    pub const fn with_policy(mut self, policy: SchedulingPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Builder-style worker count setter.
    #[must_use]
    pub const fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    /// Builder-style queue capacity setter.
    #[must_use]
    pub const fn with_queue_capacity(mut self, queue_capacity: usize) -> Self {
        self.queue_capacity = queue_capacity;
        self
    }
}
