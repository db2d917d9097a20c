//! HTTP/1.0 response framing.

use std::io::{self, Read, Write};
use std::path::Path;

/// Chunk size used when streaming file bodies.
pub const FILE_CHUNK_SIZE: usize = 8192;

const NOT_FOUND_BODY: &str = "404 Not Found\n";

/// Content type inferred from the file extension.
#[must_use]
pub fn mime_type(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("html" | "htm") => "text/html",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

/// Send a plain-text 404.
///
/// # Errors
///
/// Propagates write failures.
pub fn write_not_found<W: Write>(out: &mut W) -> io::Result<()> {
    write!(
        out,
        "HTTP/1.0 404 Not Found\r\nContent-Length: {}\r\nContent-Type: text/plain\r\n\r\n{NOT_FOUND_BODY}",
        NOT_FOUND_BODY.len()
    )?;
    out.flush()
}

/// Send a 200 with `content_length` taken from admission and stream `body`.
///
/// Returns the number of body bytes written.
///
/// # Errors
///
/// Propagates read and write failures.
pub fn write_file_response<W: Write, R: Read>(
    out: &mut W,
    body: &mut R,
    content_length: u64,
    content_type: &str,
) -> io::Result<u64> {
    write!(
        out,
        "HTTP/1.0 200 OK\r\nContent-Length: {content_length}\r\nContent-Type: {content_type}\r\n\r\n"
    )?;

    let mut buf = [0u8; FILE_CHUNK_SIZE];
    let mut sent = 0u64;
    loop {
        let n = match body.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        out.write_all(&buf[..n])?;
        sent += n as u64;
    }
    out.flush()?;
    Ok(sent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_types() {
        assert_eq!(mime_type(Path::new("a/index.html")), "text/html");
        assert_eq!(mime_type(Path::new("page.htm")), "text/html");
        assert_eq!(mime_type(Path::new("notes.txt")), "text/plain");
        assert_eq!(mime_type(Path::new("image.png")), "application/octet-stream");
        assert_eq!(mime_type(Path::new("README")), "application/octet-stream");
    }

    #[test]
    fn test_not_found_response() {
        let mut out = Vec::new();
        write_not_found(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "HTTP/1.0 404 Not Found\r\nContent-Length: 14\r\nContent-Type: text/plain\r\n\r\n404 Not Found\n"
        );
    }

    #[test]
    fn test_file_response_streams_body() {
        let body = vec![b'z'; FILE_CHUNK_SIZE * 2 + 10];
        let mut out = Vec::new();
        let sent = write_file_response(&mut out, &mut body.as_slice(), body.len() as u64, "text/plain")
            .unwrap();
        assert_eq!(sent, body.len() as u64);

        let header = format!(
            "HTTP/1.0 200 OK\r\nContent-Length: {}\r\nContent-Type: text/plain\r\n\r\n",
            body.len()
        );
        assert!(out.starts_with(header.as_bytes()));
        assert_eq!(out.len(), header.len() + body.len());
    }
}
