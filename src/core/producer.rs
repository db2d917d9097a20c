//! Admission path: stamp a connection into a request and enqueue it.

use std::sync::Arc;

use tracing::debug;

use crate::core::error::Closed;
use crate::core::events::{EventSink, SchedulerEvent};
use crate::core::queue::SchedulingQueue;
use crate::core::request::{Request, ResourceSize, Sequence};
use crate::core::sequencer::Sequencer;

/// Converts accepted connections into queued requests.
///
/// Cheap to clone; every clone shares the same sequencer, so several
/// acceptor threads can admit concurrently while sequences stay unique and
/// arrival events stay in sequence order.
pub struct Producer<C> {
    queue: Arc<SchedulingQueue<C>>,
    sequencer: Arc<Sequencer>,
    sink: Arc<dyn EventSink>,
}

impl<C> Clone for Producer<C> {
    fn clone(&self) -> Self {
        Self {
            queue: Arc::clone(&self.queue),
            sequencer: Arc::clone(&self.sequencer),
            sink: Arc::clone(&self.sink),
        }
    }
}

impl<C> Producer<C> {
    /// Create a producer feeding `queue`.
    pub fn new(
        queue: Arc<SchedulingQueue<C>>,
        sequencer: Arc<Sequencer>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            queue,
            sequencer,
            sink,
        }
    }

    /// Admit a connection whose path and size were resolved by the caller.
    ///
    /// Parks while the queue is full. Returns the assigned sequence.
    ///
    /// # Errors
    ///
    /// Returns the stamped request inside [`Closed`] if the queue was closed.
    pub fn admit(
        &self,
        connection: C,
        path: String,
        size: ResourceSize,
    ) -> Result<Sequence, Closed<Request<C>>> {
        let request = self
            .sequencer
            .stamp_with(path, size, connection, |request| {
                self.sink.record(SchedulerEvent::arrival(request));
            });
        let sequence = request.sequence();

        self.queue.push(request)?;
        debug!(sequence, "Request admitted");
        Ok(sequence)
    }

    /// Queue this producer feeds.
    #[must_use]
    pub const fn queue(&self) -> &Arc<SchedulingQueue<C>> {
        &self.queue
    }
}
