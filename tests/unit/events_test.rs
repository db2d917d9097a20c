//! Tests for scheduler events and sinks

use chrono::{TimeZone, Utc};
use sched_file_server::core::{
    format_arrival_time, EventSink, InMemoryEventSink, JsonLinesEventSink, ResourceSize,
    SchedulerEvent,
};

fn pickup(sequence: u64) -> SchedulerEvent {
    SchedulerEvent::Pickup {
        worker_id: 1,
        sequence,
        size: ResourceSize::Bytes(sequence * 10),
    }
}

#[test]
fn test_in_memory_sink_evicts_oldest() {
    let sink = InMemoryEventSink::new(3);
    for seq in 0..5 {
        sink.record(pickup(seq));
    }
    let kept: Vec<u64> = sink.events().iter().map(SchedulerEvent::sequence).collect();
    assert_eq!(kept, vec![2, 3, 4]);
    assert!(sink.arrivals().is_empty());
}

#[test]
fn test_in_memory_sink_zero_capacity_keeps_nothing() {
    let sink = InMemoryEventSink::new(0);
    sink.record(pickup(0));
    assert!(sink.events().is_empty());
}

#[test]
fn test_json_lines_arrival() {
    let sink = JsonLinesEventSink::new(Vec::new());
    let arrival_time = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
    sink.record(SchedulerEvent::Arrival {
        sequence: 7,
        path: "/index.html".into(),
        arrival_time,
    });
    sink.record(pickup(7));

    let output = String::from_utf8(sink.into_inner()).unwrap();
    let lines: Vec<serde_json::Value> = output
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["event"], "arrival");
    assert_eq!(lines[0]["sequence"], 7);
    assert_eq!(lines[0]["path"], "/index.html");
    assert_eq!(lines[1]["event"], "pickup");
    assert_eq!(lines[1]["size"], 70);
}

#[test]
fn test_arrival_time_has_millisecond_precision() {
    let time = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
    let formatted = format_arrival_time(time);
    // YYYY-MM-DDTHH:MM:SS.mmm
    assert_eq!(formatted.len(), 23);
    assert!(formatted.ends_with(".123"));
    assert_eq!(&formatted[10..11], "T");
}
