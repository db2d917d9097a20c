//! Minimal HTTP/1.0 plumbing around the scheduler.
//!
//! - `request`: heuristic request-head framing and request-line parsing
//! - `resolve`: mapping request paths onto the served directory
//! - `response`: status lines, headers and body streaming

pub mod request;
pub mod resolve;
pub mod response;

pub use request::{parse_request_path, read_request_head, read_request_path};
pub use resolve::FileResolver;
pub use response::{mime_type, write_file_response, write_not_found};
