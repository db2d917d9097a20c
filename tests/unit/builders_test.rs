//! Tests for builder modules

use std::sync::Arc;

use sched_file_server::builders::{build_event_sink, build_scheduler};
use sched_file_server::config::{EventFormat, SchedulerConfig};
use sched_file_server::core::{
    EventSink, InMemoryEventSink, Request, ResourceSize, SchedulerError, SchedulerEvent,
    SchedulingPolicy,
};

#[test]
fn test_build_scheduler_wires_components() {
    let cfg = SchedulerConfig::default()
        .with_policy(SchedulingPolicy::SmallestFirst)
        .with_worker_count(3)
        .with_queue_capacity(5);

    let scheduler = build_scheduler(
        &cfg,
        |_: usize, _: Request<()>| {},
        Arc::new(InMemoryEventSink::new(8)),
    )
    .expect("Failed to build scheduler");

    assert_eq!(scheduler.queue.capacity(), 5);
    assert_eq!(scheduler.queue.policy(), SchedulingPolicy::SmallestFirst);
    assert_eq!(scheduler.pool.worker_count(), 3);
    assert!(Arc::ptr_eq(scheduler.producer.queue(), &scheduler.queue));

    scheduler
        .producer
        .admit((), "/x".into(), ResourceSize::Bytes(1))
        .unwrap();
    scheduler.pool.shutdown();
    assert_eq!(scheduler.pool.stats().completed_requests, 1);
}

#[test]
fn test_build_scheduler_rejects_invalid_config() {
    let cfg = SchedulerConfig::default().with_worker_count(0);
    let result = build_scheduler(
        &cfg,
        |_: usize, _: Request<()>| {},
        Arc::new(InMemoryEventSink::new(1)),
    );
    assert!(matches!(result, Err(SchedulerError::InvalidConfig(_))));
}

#[test]
fn test_build_event_sink_formats() {
    // Both sinks accept events without panicking.
    let event = SchedulerEvent::Pickup {
        worker_id: 0,
        sequence: 0,
        size: ResourceSize::Missing,
    };
    build_event_sink(EventFormat::Text).record(event.clone());
    build_event_sink(EventFormat::Json).record(event);
}
