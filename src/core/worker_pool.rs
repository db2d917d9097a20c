//! Fixed-size pool of worker threads draining the scheduling queue.
//!
//! Each worker loops: pop a request, record a pickup event while the queue
//! lock is still held, hand the request to the [`Dispatcher`]. Workers are
//! interchangeable; any worker may take any request.
//!
//! # Shutdown
//!
//! [`WorkerPool::shutdown`] closes the queue, which wakes idle workers. They
//! finish whatever is still queued, observe the closed-and-empty queue and
//! exit; `shutdown` joins every one of them before returning.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use crate::core::error::SchedulerError;
use crate::core::events::{EventSink, SchedulerEvent};
use crate::core::queue::SchedulingQueue;
use crate::core::request::Request;

/// Receives every request a worker picks up.
///
/// The dispatcher owns the request (and its connection) from then on;
/// dropping it closes the connection.
pub trait Dispatcher<C>: Send + Sync + 'static {
    /// Handle one request on worker `worker_id`.
    fn dispatch(&self, worker_id: usize, request: Request<C>);
}

impl<C, F> Dispatcher<C> for F
where
    F: Fn(usize, Request<C>) + Send + Sync + 'static,
{
    fn dispatch(&self, worker_id: usize, request: Request<C>) {
        self(worker_id, request);
    }
}

/// Statistics about pool activity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Number of worker threads.
    pub worker_count: usize,
    /// Requests popped from the queue.
    pub picked_requests: u64,
    /// Requests whose dispatch returned normally.
    pub completed_requests: u64,
    /// Requests whose dispatch panicked.
    pub failed_requests: u64,
    /// Requests waiting in the queue.
    pub queued_requests: usize,
}

/// Internal counters for pool statistics (thread-safe).
#[derive(Debug, Default)]
struct PoolCounters {
    picked: AtomicU64,
    completed: AtomicU64,
    failed: AtomicU64,
}

/// Worker pool bound to one scheduling queue.
pub struct WorkerPool<C: Send + 'static> {
    queue: Arc<SchedulingQueue<C>>,
    counters: Arc<PoolCounters>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    worker_count: usize,
    shutdown: AtomicBool,
}

impl<C: Send + 'static> WorkerPool<C> {
    /// Spawn `worker_count` threads draining `queue` into `dispatcher`.
    ///
    /// # Errors
    ///
    /// - `SchedulerError::InvalidConfig` if `worker_count` is zero
    /// - `SchedulerError::WorkerSpawn` if a thread cannot be started; workers
    ///   already running are stopped and joined first
    pub fn new<D>(
        worker_count: usize,
        queue: Arc<SchedulingQueue<C>>,
        dispatcher: D,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, SchedulerError>
    where
        D: Dispatcher<C>,
    {
        if worker_count == 0 {
            return Err(SchedulerError::InvalidConfig(
                "worker_count must be greater than 0".into(),
            ));
        }

        let dispatcher = Arc::new(dispatcher);
        let counters = Arc::new(PoolCounters::default());
        let mut workers = Vec::with_capacity(worker_count);

        for worker_id in 0..worker_count {
            let spawned = spawn_worker(
                worker_id,
                Arc::clone(&queue),
                Arc::clone(&dispatcher),
                Arc::clone(&sink),
                Arc::clone(&counters),
            );
            match spawned {
                Ok(handle) => workers.push(handle),
                Err(e) => {
                    error!(worker_id, error = %e, "Failed to spawn worker thread");
                    queue.close();
                    for handle in workers {
                        let _ = handle.join();
                    }
                    return Err(SchedulerError::WorkerSpawn(e.to_string()));
                }
            }
        }

        info!(
            worker_count,
            capacity = queue.capacity(),
            policy = %queue.policy(),
            "WorkerPool started"
        );

        Ok(Self {
            queue,
            counters,
            workers: Mutex::new(workers),
            worker_count,
            shutdown: AtomicBool::new(false),
        })
    }

    /// Number of worker threads.
    #[must_use]
    pub const fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Queue the workers drain.
    #[must_use]
    pub const fn queue(&self) -> &Arc<SchedulingQueue<C>> {
        &self.queue
    }

    /// Get current pool statistics.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            worker_count: self.worker_count,
            picked_requests: self.counters.picked.load(Ordering::Relaxed),
            completed_requests: self.counters.completed.load(Ordering::Relaxed),
            failed_requests: self.counters.failed.load(Ordering::Relaxed),
            queued_requests: self.queue.len(),
        }
    }

    /// Close the queue, let workers drain it, and join them all.
    ///
    /// Idempotent; later calls return immediately.
    pub fn shutdown(&self) {
        if self.shutdown.swap(true, Ordering::AcqRel) {
            return;
        }

        info!(pending = self.queue.len(), "Shutting down worker pool");
        self.queue.close();

        let mut workers = self.workers.lock();
        for (worker_id, worker) in workers.drain(..).enumerate() {
            if worker.join().is_err() {
                warn!(worker_id, "Worker panicked");
            } else {
                debug!(worker_id, "Worker joined");
            }
        }

        info!(worker_count = self.worker_count, "Worker pool shut down complete");
    }
}

impl<C: Send + 'static> Drop for WorkerPool<C> {
    fn drop(&mut self) {
        // Close without joining; explicit shutdown() is the graceful path.
        if !self.shutdown.swap(true, Ordering::AcqRel) {
            self.queue.close();
            debug!("WorkerPool dropped without explicit shutdown - workers will be detached");
        }
    }
}

fn spawn_worker<C, D>(
    worker_id: usize,
    queue: Arc<SchedulingQueue<C>>,
    dispatcher: Arc<D>,
    sink: Arc<dyn EventSink>,
    counters: Arc<PoolCounters>,
) -> std::io::Result<JoinHandle<()>>
where
    C: Send + 'static,
    D: Dispatcher<C>,
{
    thread::Builder::new()
        .name(format!("sfs-worker-{worker_id}"))
        .spawn(move || {
            debug!(worker_id, "Worker thread started");

            // Pickups are recorded under the queue lock so the sink sees pop order.
            while let Some(request) = queue.pop_with(|request| {
                counters.picked.fetch_add(1, Ordering::Relaxed);
                sink.record(SchedulerEvent::pickup(worker_id, request));
            }) {
                let sequence = request.sequence();

                let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                    dispatcher.dispatch(worker_id, request);
                }));
                match outcome {
                    Ok(()) => {
                        counters.completed.fetch_add(1, Ordering::Relaxed);
                    }
                    Err(_) => {
                        counters.failed.fetch_add(1, Ordering::Relaxed);
                        error!(worker_id, sequence, "Dispatcher panicked");
                    }
                }
            }

            debug!(worker_id, "Queue closed and drained, worker exiting");
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{InMemoryEventSink, ResourceSize, SchedulingPolicy, Sequencer};

    #[test]
    fn test_zero_workers_rejected() {
        let queue = Arc::new(SchedulingQueue::<()>::new(1, SchedulingPolicy::Fifo).unwrap());
        let result = WorkerPool::new(
            0,
            queue,
            |_: usize, _: Request<()>| {},
            Arc::new(InMemoryEventSink::new(1)),
        );
        assert!(matches!(result, Err(SchedulerError::InvalidConfig(_))));
    }

    #[test]
    fn test_panicking_dispatch_keeps_worker_alive() {
        let queue = Arc::new(SchedulingQueue::new(4, SchedulingPolicy::Fifo).unwrap());
        let seq = Sequencer::new();
        let pool = WorkerPool::new(
            1,
            Arc::clone(&queue),
            |_: usize, request: Request<()>| {
                assert!(request.sequence() != 0, "boom");
            },
            Arc::new(InMemoryEventSink::new(8)),
        )
        .unwrap();

        for _ in 0..3 {
            queue.push(seq.stamp(String::new(), ResourceSize::Missing, ())).unwrap();
        }
        pool.shutdown();

        let stats = pool.stats();
        assert_eq!(stats.picked_requests, 3);
        assert_eq!(stats.failed_requests, 1);
        assert_eq!(stats.completed_requests, 2);
        assert_eq!(stats.queued_requests, 0);
    }
}
