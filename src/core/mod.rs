//! Core scheduling abstractions: request record, queue, producer, worker pool.

pub mod error;
pub mod events;
pub mod policy;
pub mod producer;
pub mod queue;
pub mod request;
pub mod sequencer;
pub mod worker_pool;

pub use error::{AppResult, Closed, SchedulerError};
pub use events::{
    format_arrival_time, EventSink, InMemoryEventSink, JsonLinesEventSink, SchedulerEvent,
    TracingEventSink,
};
pub use policy::SchedulingPolicy;
pub use producer::Producer;
pub use queue::SchedulingQueue;
pub use request::{Request, ResourceSize, Sequence};
pub use sequencer::Sequencer;
pub use worker_pool::{Dispatcher, PoolStats, WorkerPool};
