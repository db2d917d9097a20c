//! Request-head framing and request-line parsing.
//!
//! Framing is heuristic: bytes are read until the blank line ending the
//! headers, end of stream, a read error (including a timeout) or
//! [`MAX_REQUEST_HEAD`] bytes. Only the request line matters:
//!
//! ```text
//! GET /index.html HTTP/1.0\r\n
//! ```
//!
//! Anything that is not a well-formed `GET` yields an empty path, which is a
//! valid admission state rather than an error.

use std::io::{ErrorKind, Read};

use tracing::debug;

/// Upper bound on bytes read while framing a request.
pub const MAX_REQUEST_HEAD: usize = 4096;
/// Longest accepted request path, in bytes.
pub const MAX_PATH_LEN: usize = 1023;

const HEAD_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Read the request head from `reader`.
///
/// Never fails: I/O errors end framing and whatever was read is returned.
pub fn read_request_head<R: Read>(reader: &mut R) -> Vec<u8> {
    let mut head = Vec::with_capacity(512);
    let mut chunk = [0u8; 1024];

    while head.len() < MAX_REQUEST_HEAD {
        let want = chunk.len().min(MAX_REQUEST_HEAD - head.len());
        match reader.read(&mut chunk[..want]) {
            Ok(0) => break,
            Ok(n) => {
                head.extend_from_slice(&chunk[..n]);
                if contains(&head, HEAD_TERMINATOR) {
                    break;
                }
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => {
                debug!(error = %e, read = head.len(), "Stopped reading request head");
                break;
            }
        }
    }

    head
}

/// Extract the path of a `GET` request line; empty on any parse failure.
#[must_use]
pub fn parse_request_path(head: &[u8]) -> String {
    let line_end = head
        .iter()
        .position(|&b| b == b'\n')
        .unwrap_or(head.len());
    let Ok(line) = std::str::from_utf8(&head[..line_end]) else {
        return String::new();
    };

    let mut parts = line.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("GET"), Some(path)) => truncate_path(path).to_owned(),
        _ => String::new(),
    }
}

/// Read and parse in one step.
pub fn read_request_path<R: Read>(reader: &mut R) -> String {
    parse_request_path(&read_request_head(reader))
}

fn truncate_path(path: &str) -> &str {
    if path.len() <= MAX_PATH_LEN {
        return path;
    }
    let mut end = MAX_PATH_LEN;
    while !path.is_char_boundary(end) {
        end -= 1;
    }
    &path[..end]
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}
