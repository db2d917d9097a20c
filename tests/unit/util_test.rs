//! Tests for utility functions

use sched_file_server::util::init_tracing;

#[test]
fn test_init_tracing_is_repeatable() {
    init_tracing();
    init_tracing();
    tracing::info!("tracing initialized twice without panicking");
}

#[test]
fn test_init_tracing_with_custom_fallback() {
    sched_file_server::util::init_tracing_with("debug");
    assert_eq!(sched_file_server::util::DEFAULT_LOG_FILTER, "info");
}
