//! Tests for configuration validation and loading

use std::path::PathBuf;

use clap::Parser;
use sched_file_server::config::{EventFormat, SchedulerConfig, ServerConfig};
use sched_file_server::core::SchedulingPolicy;

#[test]
fn test_scheduler_config_validation() {
    assert!(SchedulerConfig::default().validate().is_ok());

    let no_workers = SchedulerConfig::default().with_worker_count(0);
    assert!(no_workers.validate().unwrap_err().contains("worker_count"));

    let no_queue = SchedulerConfig::default().with_queue_capacity(0);
    assert!(no_queue.validate().unwrap_err().contains("queue_capacity"));
}

#[test]
fn test_cli_defaults() {
    let cfg = ServerConfig::try_parse_from(["sched-file-server"]).unwrap();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.root, PathBuf::from("."));
    assert_eq!(cfg.scheduler, SchedulerConfig::default());
    assert_eq!(cfg.event_format, EventFormat::Text);
    assert_eq!(cfg.config, None);
}

#[test]
fn test_cli_policy_is_case_insensitive() {
    let cfg = ServerConfig::try_parse_from(["sched-file-server", "--policy", "SFF"]).unwrap();
    assert_eq!(cfg.scheduler.policy, SchedulingPolicy::SmallestFirst);
}

#[test]
fn test_cli_zero_counts_are_clamped() {
    let cfg = ServerConfig::try_parse_from(["sched-file-server", "-t", "0", "-q", "0"])
        .unwrap()
        .normalized();
    assert_eq!(cfg.scheduler.worker_count, 1);
    assert_eq!(cfg.scheduler.queue_capacity, 1);
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_json_config_partial() {
    let cfg = ServerConfig::from_json_str(
        r#"{ "port": 9090, "policy": "sff", "worker_count": 2, "event_format": "json" }"#,
    )
    .unwrap();
    assert_eq!(cfg.port, 9090);
    assert_eq!(cfg.scheduler.policy, SchedulingPolicy::SmallestFirst);
    assert_eq!(cfg.scheduler.worker_count, 2);
    assert_eq!(cfg.scheduler.queue_capacity, 16);
    assert_eq!(cfg.event_format, EventFormat::Json);
    assert_eq!(cfg.host, "0.0.0.0");
}

#[test]
fn test_json_config_rejects_invalid() {
    let err = ServerConfig::from_json_str(r#"{ "queue_capacity": 0 }"#).unwrap_err();
    assert!(err.contains("queue_capacity"));

    let err = ServerConfig::from_json_str(r#"{ "policy": "lifo" }"#).unwrap_err();
    assert!(err.starts_with("parse error"));
}

#[test]
fn test_json_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("server.json");
    std::fs::write(&path, r#"{ "host": "127.0.0.1", "root": "/srv/www" }"#).unwrap();

    let cfg = ServerConfig::from_json_file(&path).unwrap();
    assert_eq!(cfg.address(), "127.0.0.1:8080");
    assert_eq!(cfg.root, PathBuf::from("/srv/www"));

    let missing = ServerConfig::from_json_file(&dir.path().join("absent.json"));
    assert!(missing.unwrap_err().starts_with("cannot read"));
}
