//! Worker-side request handling: turn a request into a file response.

use std::fs::File;
use std::io::Read;
use std::net::TcpStream;
use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use crate::core::{Dispatcher, Request, ResourceSize};
use crate::http::{mime_type, write_file_response, write_not_found, FileResolver};

/// Serves files from a [`FileResolver`] over the request's connection.
///
/// - empty path: connection closed without a response
/// - missing resource, or a file that can no longer be opened: 404
/// - otherwise: 200 with the size resolved at admission
#[derive(Debug, Clone)]
pub struct FileDispatcher {
    resolver: Arc<FileResolver>,
}

impl FileDispatcher {
    /// Serve from `resolver`'s root.
    pub const fn new(resolver: Arc<FileResolver>) -> Self {
        Self { resolver }
    }
}

impl Dispatcher<TcpStream> for FileDispatcher {
    fn dispatch(&self, worker_id: usize, request: Request<TcpStream>) {
        let sequence = request.sequence();
        let waited_ms = (Utc::now() - request.arrival_time()).num_milliseconds();

        if request.path().is_empty() {
            debug!(worker_id, sequence, "Empty request path, closing connection");
            return;
        }

        let location = self.resolver.locate(request.path());
        let size = request.size();
        let mut stream = request.into_connection();

        let result = match (size, location) {
            (ResourceSize::Bytes(len), Some(location)) => match File::open(&location) {
                Ok(file) => write_file_response(
                    &mut stream,
                    &mut file.take(len),
                    len,
                    mime_type(&location),
                )
                .map(|sent| debug!(worker_id, sequence, sent, waited_ms, "File sent")),
                Err(e) => {
                    debug!(worker_id, sequence, error = %e, "Admitted file no longer opens");
                    write_not_found(&mut stream)
                }
            },
            _ => write_not_found(&mut stream)
                .map(|()| debug!(worker_id, sequence, waited_ms, "Not found sent")),
        };

        if let Err(e) = result {
            debug!(worker_id, sequence, error = %e, "Response aborted");
        }
    }
}
