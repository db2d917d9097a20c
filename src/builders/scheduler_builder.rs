//! Wire a queue, producer and worker pool together from configuration.

use std::sync::Arc;

use crate::config::{EventFormat, SchedulerConfig};
use crate::core::{
    Dispatcher, EventSink, JsonLinesEventSink, Producer, SchedulerError, SchedulingQueue,
    Sequencer, TracingEventSink, WorkerPool,
};

/// The assembled admission and scheduling layer.
pub struct Scheduler<C: Send + 'static> {
    /// Shared scheduling queue.
    pub queue: Arc<SchedulingQueue<C>>,
    /// Admission entry point; clone it for additional acceptors.
    pub producer: Producer<C>,
    /// Running worker pool.
    pub pool: WorkerPool<C>,
}

/// Build a queue, a producer and a started worker pool.
///
/// # Errors
///
/// - `SchedulerError::InvalidConfig` if the configuration does not validate
/// - `SchedulerError::Allocation` if queue storage cannot be reserved
/// - `SchedulerError::WorkerSpawn` if a worker thread cannot be started
pub fn build_scheduler<C, D>(
    cfg: &SchedulerConfig,
    dispatcher: D,
    sink: Arc<dyn EventSink>,
) -> Result<Scheduler<C>, SchedulerError>
where
    C: Send + 'static,
    D: Dispatcher<C>,
{
    cfg.validate()
        .map_err(|e| SchedulerError::InvalidConfig(format!("scheduler config invalid: {e}")))?;

    let queue = Arc::new(SchedulingQueue::new(cfg.queue_capacity, cfg.policy)?);
    let producer = Producer::new(Arc::clone(&queue), Arc::new(Sequencer::new()), Arc::clone(&sink));
    let pool = WorkerPool::new(cfg.worker_count, Arc::clone(&queue), dispatcher, sink)?;

    Ok(Scheduler {
        queue,
        producer,
        pool,
    })
}

/// Event sink for the configured output format.
#[must_use]
pub fn build_event_sink(format: EventFormat) -> Arc<dyn EventSink> {
    match format {
        EventFormat::Text => Arc::new(TracingEventSink),
        EventFormat::Json => Arc::new(JsonLinesEventSink::new(std::io::stdout())),
    }
}
