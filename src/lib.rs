//! # Scheduled File Server
//!
//! A multi-threaded static file server whose interesting part is the
//! admission and scheduling layer between connection acceptance and request
//! processing.
//!
//! ## Architecture
//!
//! ```text
//! acceptor ──► Producer ──push──► SchedulingQueue ──pop──► WorkerPool ──► Dispatcher
//!              (sequence,          (bounded, FIFO or         (fixed N        (file or 404)
//!               arrival time)       smallest-first)           threads)
//! ```
//!
//! - **Request**: immutable record of one admitted connection (sequence,
//!   arrival time, path, resolved size, connection handle)
//! - **SchedulingQueue**: fixed-capacity circular buffer behind one mutex and
//!   two condition variables; `push` parks while full, `pop` parks while empty
//! - **Policies**: `Fifo`, or `SmallestFirst` with earliest-sequence tie-break
//! - **Producer**: assigns strictly increasing sequences under a single lock
//!   and records arrival events in sequence order
//! - **WorkerPool**: interchangeable workers that record a pickup event and
//!   hand each request to a [`core::Dispatcher`]
//!
//! ## Embedding the scheduler
//!
//! ```rust
//! use std::sync::Arc;
//! use sched_file_server::builders::build_scheduler;
//! use sched_file_server::config::SchedulerConfig;
//! use sched_file_server::core::{InMemoryEventSink, Request, ResourceSize, SchedulingPolicy};
//!
//! let cfg = SchedulerConfig::default()
//!     .with_policy(SchedulingPolicy::SmallestFirst)
//!     .with_worker_count(2);
//! let sink = Arc::new(InMemoryEventSink::new(64));
//! let scheduler = build_scheduler(
//!     &cfg,
//!     |_worker: usize, req: Request<u32>| drop(req.into_connection()),
//!     sink.clone(),
//! )
//! .unwrap();
//!
//! scheduler.producer.admit(1, "/big.bin".into(), ResourceSize::Bytes(4096)).unwrap();
//! scheduler.pool.shutdown();
//! assert_eq!(sink.pickups().len(), 1);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core scheduling abstractions: request, queue, producer, worker pool.
pub mod core;
/// Configuration models for the scheduler and the server process.
pub mod config;
/// Builders to construct scheduler components from configuration.
pub mod builders;
/// HTTP request framing, file resolution and response framing.
pub mod http;
/// TCP acceptor and file-serving dispatcher.
pub mod server;
/// Shared utilities.
pub mod util;
