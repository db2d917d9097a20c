//! Bounded, policy-driven scheduling queue.
//!
//! Requests live in a fixed-capacity circular buffer guarded by one
//! `parking_lot::Mutex`. Two condition variables gate the "not empty" and
//! "not full" transitions:
//!
//! - `push` parks while the buffer is full (backpressure)
//! - `pop` parks while the buffer is empty
//!
//! Under [`SchedulingPolicy::SmallestFirst`] the pop path scans the held
//! requests, swaps the winner into the head slot and then dequeues the head
//! exactly like FIFO, so cursor arithmetic never changes between policies.
//!
//! Closing the queue wakes every parked caller. Pushes are refused from then
//! on, while pops keep draining what is left and return `None` once empty.

use parking_lot::{Condvar, Mutex};
use tracing::debug;

use crate::core::error::{Closed, SchedulerError};
use crate::core::policy::SchedulingPolicy;
use crate::core::request::{Request, ResourceSize, Sequence};

/// Buffer and cursors, only touched with the lock held.
struct QueueState<C> {
    slots: Vec<Option<Request<C>>>,
    head: usize,
    tail: usize,
    len: usize,
    closed: bool,
}

impl<C> QueueState<C> {
    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn put_tail(&mut self, request: Request<C>) {
        let tail = self.tail;
        debug_assert!(self.slots[tail].is_none(), "tail slot occupied");
        self.slots[tail] = Some(request);
        self.tail = (tail + 1) % self.capacity();
        self.len += 1;
    }

    fn take_head(&mut self) -> Option<Request<C>> {
        let request = self.slots[self.head].take();
        debug_assert!(request.is_some(), "head slot empty while len > 0");
        self.head = (self.head + 1) % self.capacity();
        self.len -= 1;
        request
    }

    /// Swap the smallest held request (size, then sequence) into the head slot.
    fn promote_smallest(&mut self) {
        let capacity = self.capacity();
        let mut best_slot = self.head;
        let mut best_key: Option<(ResourceSize, Sequence)> = None;

        for offset in 0..self.len {
            let slot = (self.head + offset) % capacity;
            if let Some(request) = &self.slots[slot] {
                let key = request.size_key();
                if best_key.is_none_or(|best| key < best) {
                    best_slot = slot;
                    best_key = Some(key);
                }
            }
        }

        if best_slot != self.head {
            self.slots.swap(self.head, best_slot);
        }
    }

    fn held(&self) -> impl Iterator<Item = &Request<C>> {
        let capacity = self.capacity();
        (0..self.len).filter_map(move |offset| self.slots[(self.head + offset) % capacity].as_ref())
    }
}

/// Thread-safe bounded container with blocking push/pop.
///
/// One instance is shared (behind an `Arc`) by the producers and the worker
/// pool. Capacity and policy never change after construction.
pub struct SchedulingQueue<C> {
    capacity: usize,
    policy: SchedulingPolicy,
    state: Mutex<QueueState<C>>,
    not_empty: Condvar,
    not_full: Condvar,
}

impl<C> SchedulingQueue<C> {
    /// Build an empty queue.
    ///
    /// # Errors
    ///
    /// - `SchedulerError::InvalidConfig` if `capacity` is zero
    /// - `SchedulerError::Allocation` if the slot storage cannot be reserved
    pub fn new(capacity: usize, policy: SchedulingPolicy) -> Result<Self, SchedulerError> {
        if capacity == 0 {
            return Err(SchedulerError::InvalidConfig(
                "queue capacity must be greater than 0".into(),
            ));
        }

        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|_| SchedulerError::Allocation { capacity })?;
        slots.resize_with(capacity, || None);

        debug!(capacity, policy = %policy, "Scheduling queue initialized");

        Ok(Self {
            capacity,
            policy,
            state: Mutex::new(QueueState {
                slots,
                head: 0,
                tail: 0,
                len: 0,
                closed: false,
            }),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
        })
    }

    /// Store a request at the tail, parking while the queue is full.
    ///
    /// # Errors
    ///
    /// Returns the request inside [`Closed`] if the queue was closed before
    /// a slot became available.
    pub fn push(&self, request: Request<C>) -> Result<(), Closed<Request<C>>> {
        let mut state = self.state.lock();
        while state.len == self.capacity && !state.closed {
            self.not_full.wait(&mut state);
        }
        if state.closed {
            return Err(Closed(request));
        }

        state.put_tail(request);
        self.not_empty.notify_one();
        Ok(())
    }

    /// Remove the next request according to the policy, parking while empty.
    ///
    /// Returns `None` only once the queue is closed and fully drained.
    pub fn pop(&self) -> Option<Request<C>> {
        self.pop_with(|_| {})
    }

    /// Like [`pop`](Self::pop), running `on_popped` before the lock is
    /// released. Callbacks therefore observe requests in pop order.
    pub fn pop_with<F>(&self, on_popped: F) -> Option<Request<C>>
    where
        F: FnOnce(&Request<C>),
    {
        let mut state = self.state.lock();
        while state.len == 0 && !state.closed {
            self.not_empty.wait(&mut state);
        }
        if state.len == 0 {
            return None;
        }

        if self.policy == SchedulingPolicy::SmallestFirst {
            state.promote_smallest();
        }
        let request = state.take_head()?;
        on_popped(&request);
        self.not_full.notify_one();
        Some(request)
    }

    /// Refuse further pushes and wake every parked caller.
    ///
    /// Idempotent. Requests already held remain available to `pop`.
    pub fn close(&self) {
        let mut state = self.state.lock();
        if state.closed {
            return;
        }
        state.closed = true;
        debug!(pending = state.len, "Scheduling queue closed");
        self.not_empty.notify_all();
        self.not_full.notify_all();
    }

    /// Whether [`close`](Self::close) has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Number of held requests.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().len
    }

    /// Whether no request is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fixed capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Active dequeue policy.
    #[must_use]
    pub const fn policy(&self) -> SchedulingPolicy {
        self.policy
    }

    /// Snapshot of held `(sequence, size)` pairs, head slot first.
    #[must_use]
    pub fn pending(&self) -> Vec<(Sequence, ResourceSize)> {
        self.state
            .lock()
            .held()
            .map(|request| (request.sequence(), request.size()))
            .collect()
    }
}
