//! Tests for error types

use sched_file_server::core::{Closed, SchedulerError};

#[test]
fn test_invalid_config_error() {
    let err = SchedulerError::InvalidConfig("worker_count must be greater than 0".to_string());
    assert_eq!(
        format!("{err}"),
        "invalid configuration: worker_count must be greater than 0"
    );
}

#[test]
fn test_allocation_error() {
    let err = SchedulerError::Allocation { capacity: 64 };
    assert_eq!(format!("{err}"), "failed to allocate queue storage for 64 requests");
}

#[test]
fn test_io_error_conversion() {
    let io = std::io::Error::new(std::io::ErrorKind::AddrInUse, "port taken");
    let err: SchedulerError = io.into();
    assert!(matches!(err, SchedulerError::Io(_)));
    assert_eq!(format!("{err}"), "io error: port taken");
}

#[test]
fn test_closed_returns_value() {
    let closed = Closed(String::from("payload"));
    assert_eq!(format!("{closed}"), "scheduling queue is closed");
    assert_eq!(format!("{closed:?}"), "Closed(..)");
    assert_eq!(closed.into_inner(), "payload");
}

#[test]
fn test_errors_convert_into_anyhow() {
    fn fails() -> sched_file_server::core::AppResult<()> {
        Err(SchedulerError::WorkerSpawn("resource temporarily unavailable".into()))?;
        Ok(())
    }
    let err = fails().unwrap_err();
    assert!(err.to_string().starts_with("failed to spawn worker thread"));
}
