//! Tests for request framing, path resolution and responses

use std::io::Cursor;
use std::path::Path;

use sched_file_server::core::ResourceSize;
use sched_file_server::http::request::MAX_PATH_LEN;
use sched_file_server::http::{mime_type, read_request_path, write_file_response, FileResolver};

#[test]
fn test_read_request_path_from_stream() {
    let mut input = Cursor::new(b"GET /docs/a.txt HTTP/1.1\r\nHost: x\r\n\r\n".to_vec());
    assert_eq!(read_request_path(&mut input), "/docs/a.txt");

    let mut post = Cursor::new(b"POST /a HTTP/1.0\r\n\r\n".to_vec());
    assert_eq!(read_request_path(&mut post), "");
}

#[test]
fn test_long_path_is_truncated() {
    let long = "a".repeat(MAX_PATH_LEN + 200);
    let mut input = Cursor::new(format!("GET /{long} HTTP/1.0\r\n\r\n").into_bytes());
    assert_eq!(read_request_path(&mut input).len(), MAX_PATH_LEN);
}

#[test]
fn test_resolver_sizes() {
    let root = tempfile::tempdir().unwrap();
    std::fs::write(root.path().join("index.html"), "12345").unwrap();
    std::fs::write(root.path().join("empty.txt"), "").unwrap();

    let resolver = FileResolver::new(root.path());
    assert_eq!(resolver.resolve("/"), ResourceSize::Bytes(5));
    assert_eq!(resolver.resolve("/empty.txt"), ResourceSize::Bytes(0));
    assert_eq!(resolver.resolve("/nope"), ResourceSize::Missing);
    assert_eq!(resolver.resolve(""), ResourceSize::Missing);
    assert_eq!(resolver.resolve("/../index.html"), ResourceSize::Missing);
}

#[test]
fn test_mime_types() {
    assert_eq!(mime_type(Path::new("a.html")), "text/html");
    assert_eq!(mime_type(Path::new("a.HTML")), "application/octet-stream");
    assert_eq!(mime_type(Path::new("a.htm")), "text/html");
    assert_eq!(mime_type(Path::new("readme.txt")), "text/plain");
    assert_eq!(mime_type(Path::new("archive.tar.gz")), "application/octet-stream");
    assert_eq!(mime_type(Path::new("Makefile")), "application/octet-stream");
}

#[test]
fn test_file_response_streams_body() {
    let body = vec![b'x'; 10_000];
    let mut out = Vec::new();
    let sent = write_file_response(&mut out, &mut body.as_slice(), 10_000, "text/plain").unwrap();
    assert_eq!(sent, 10_000);

    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("HTTP/1.0 200 OK\r\nContent-Length: 10000\r\n"));
    assert!(text.ends_with(&"x".repeat(10_000)));
}
