//! Serialized sequence and arrival-time stamping.

use chrono::Utc;
use parking_lot::Mutex;

use crate::core::request::{Request, ResourceSize, Sequence};

/// Hands out strictly increasing sequence numbers.
///
/// The counter has its own lock, independent of queue storage. Everything a
/// caller runs through [`Sequencer::stamp_with`] happens inside the same
/// critical section, so per-request side effects observe sequence order.
#[derive(Debug, Default)]
pub struct Sequencer {
    next: Mutex<Sequence>,
}

impl Sequencer {
    /// Start counting at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next: Mutex::new(0),
        }
    }

    /// Build a request with the next sequence and the current time.
    pub fn stamp<C>(&self, path: String, size: ResourceSize, connection: C) -> Request<C> {
        self.stamp_with(path, size, connection, |_| {})
    }

    /// Like [`stamp`](Self::stamp), running `on_stamped` before the counter
    /// lock is released.
    pub fn stamp_with<C, F>(
        &self,
        path: String,
        size: ResourceSize,
        connection: C,
        on_stamped: F,
    ) -> Request<C>
    where
        F: FnOnce(&Request<C>),
    {
        let mut next = self.next.lock();
        let sequence = *next;
        *next += 1;
        let request = Request::new(sequence, Utc::now(), path, size, connection);
        on_stamped(&request);
        request
    }
}
