//! Arrival and pickup events exposed to observers.
//!
//! The producer records one `Arrival` per admitted request while holding the
//! sequencer lock, so arrivals are strictly ordered by sequence. Workers
//! record one `Pickup` right after each pop.

use std::collections::VecDeque;
use std::io::Write;

use chrono::{DateTime, Local, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{info, warn};

use crate::core::request::{Request, ResourceSize, Sequence};

/// Observable scheduler event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SchedulerEvent {
    /// A request was admitted.
    Arrival {
        /// Admission sequence.
        sequence: Sequence,
        /// Requested path.
        path: String,
        /// Admission time.
        arrival_time: DateTime<Utc>,
    },
    /// A worker took a request off the queue.
    Pickup {
        /// Index of the worker within the pool.
        worker_id: usize,
        /// Admission sequence.
        sequence: Sequence,
        /// Resolved size, `-1` when missing.
        size: ResourceSize,
    },
}

impl SchedulerEvent {
    /// Arrival event for a freshly stamped request.
    pub fn arrival<C>(request: &Request<C>) -> Self {
        Self::Arrival {
            sequence: request.sequence(),
            path: request.path().to_owned(),
            arrival_time: request.arrival_time(),
        }
    }

    /// Pickup event for a request just popped by `worker_id`.
    pub fn pickup<C>(worker_id: usize, request: &Request<C>) -> Self {
        Self::Pickup {
            worker_id,
            sequence: request.sequence(),
            size: request.size(),
        }
    }

    /// Sequence of the request the event refers to.
    #[must_use]
    pub const fn sequence(&self) -> Sequence {
        match self {
            Self::Arrival { sequence, .. } | Self::Pickup { sequence, .. } => *sequence,
        }
    }
}

/// Format a timestamp as local time with millisecond precision.
pub fn format_arrival_time(time: DateTime<Utc>) -> String {
    time.with_timezone(&Local)
        .format("%Y-%m-%dT%H:%M:%S%.3f")
        .to_string()
}

/// Destination for scheduler events.
pub trait EventSink: Send + Sync {
    /// Record an event.
    fn record(&self, event: SchedulerEvent);
}

/// Console-style sink that logs through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn record(&self, event: SchedulerEvent) {
        match event {
            SchedulerEvent::Arrival {
                sequence,
                path,
                arrival_time,
            } => {
                info!(
                    sequence,
                    "REQUEST seq={sequence} path=\"{path}\" time={}",
                    format_arrival_time(arrival_time)
                );
            }
            SchedulerEvent::Pickup {
                worker_id,
                sequence,
                size,
            } => {
                info!(
                    worker_id,
                    sequence,
                    "WORKER {worker_id} picked request with seq={sequence} size={size}"
                );
            }
        }
    }
}

/// Writes one JSON object per event to the wrapped writer.
pub struct JsonLinesEventSink<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLinesEventSink<W> {
    /// Wrap a writer.
    pub const fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Unwrap the writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W: Write + Send> EventSink for JsonLinesEventSink<W> {
    fn record(&self, event: SchedulerEvent) {
        let mut writer = self.writer.lock();
        let written = serde_json::to_writer(&mut *writer, &event)
            .map_err(std::io::Error::from)
            .and_then(|()| writer.write_all(b"\n"))
            .and_then(|()| writer.flush());
        if let Err(e) = written {
            warn!(error = %e, sequence = event.sequence(), "Failed to write scheduler event");
        }
    }
}

/// Bounded in-memory history, oldest evicted first.
pub struct InMemoryEventSink {
    events: Mutex<VecDeque<SchedulerEvent>>,
    max_events: usize,
}

impl InMemoryEventSink {
    /// Create a sink keeping at most `max_events` entries.
    #[must_use]
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Mutex::new(VecDeque::with_capacity(max_events.min(4096))),
            max_events,
        }
    }

    /// Snapshot of stored events in record order.
    #[must_use]
    pub fn events(&self) -> Vec<SchedulerEvent> {
        self.events.lock().iter().cloned().collect()
    }

    /// Stored arrival events.
    #[must_use]
    pub fn arrivals(&self) -> Vec<SchedulerEvent> {
        self.filtered(|e| matches!(e, SchedulerEvent::Arrival { .. }))
    }

    /// Stored pickup events.
    #[must_use]
    pub fn pickups(&self) -> Vec<SchedulerEvent> {
        self.filtered(|e| matches!(e, SchedulerEvent::Pickup { .. }))
    }

    fn filtered(&self, keep: impl Fn(&SchedulerEvent) -> bool) -> Vec<SchedulerEvent> {
        self.events.lock().iter().filter(|e| keep(e)).cloned().collect()
    }
}

impl EventSink for InMemoryEventSink {
    fn record(&self, event: SchedulerEvent) {
        let mut events = self.events.lock();
        if self.max_events == 0 {
            return;
        }
        if events.len() >= self.max_events {
            events.pop_front();
        }
        events.push_back(event);
    }
}
