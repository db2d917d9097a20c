//! Configuration models for the scheduler and the server process.

pub mod scheduler;
pub mod server;

pub use scheduler::SchedulerConfig;
pub use server::{EventFormat, ServerConfig};
