//! Dequeue disciplines.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Order in which the scheduling queue hands out requests.
///
/// Fixed when the queue is built and shared by every caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SchedulingPolicy {
    /// Oldest admitted request first.
    #[default]
    Fifo,
    /// Smallest resource first; earlier sequence wins among equal sizes.
    #[serde(alias = "sff")]
    #[value(alias = "sff")]
    SmallestFirst,
}

impl SchedulingPolicy {
    /// Short label used in startup logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Fifo => "FIFO",
            Self::SmallestFirst => "SFF",
        }
    }
}

impl fmt::Display for SchedulingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
