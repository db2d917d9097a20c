//! TCP acceptor feeding the scheduler, plus the file dispatcher.
//!
//! The acceptor hands each connection to a short-lived admission thread that
//! frames the request, resolves path and size, and admits it. A slow client
//! only stalls its own admission; sequence assignment stays serialized in the
//! producer. Workers then serve the file. [`ServerHandle::shutdown`] stops
//! accepting, closes the queue and lets [`Server::run`] join the drained
//! workers.

pub mod dispatcher;

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::builders::{build_event_sink, build_scheduler, Scheduler};
use crate::config::ServerConfig;
use crate::core::{EventSink, PoolStats, Producer, SchedulerError, SchedulingQueue};
use crate::http::{read_request_path, FileResolver};

pub use dispatcher::FileDispatcher;

/// Bound static file server.
pub struct Server {
    listener: TcpListener,
    local_addr: SocketAddr,
    admission: Admission,
    scheduler: Scheduler<TcpStream>,
    stop: Arc<AtomicBool>,
}

impl Server {
    /// Bind the listener and start the worker pool.
    ///
    /// # Errors
    ///
    /// Configuration, bind, allocation or thread spawn failures.
    pub fn bind(config: ServerConfig) -> Result<Self, SchedulerError> {
        let sink = build_event_sink(config.event_format);
        Self::bind_with_sink(config, sink)
    }

    /// Like [`bind`](Self::bind) with an explicit event sink.
    ///
    /// # Errors
    ///
    /// Configuration, bind, allocation or thread spawn failures.
    pub fn bind_with_sink(
        config: ServerConfig,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, SchedulerError> {
        config.validate().map_err(SchedulerError::InvalidConfig)?;

        let listener = TcpListener::bind(config.address())?;
        let local_addr = listener.local_addr()?;
        let resolver = Arc::new(FileResolver::new(config.root.clone()));
        let scheduler = build_scheduler(
            &config.scheduler,
            FileDispatcher::new(Arc::clone(&resolver)),
            sink,
        )?;

        info!(
            addr = %local_addr,
            root = %resolver.root().display(),
            "Server listening on port {} with policy {} with {} threads and queue size {}",
            local_addr.port(),
            config.scheduler.policy,
            config.scheduler.worker_count,
            config.scheduler.queue_capacity
        );

        let admission = Admission {
            resolver,
            producer: scheduler.producer.clone(),
            read_timeout: config.read_timeout(),
        };

        Ok(Self {
            listener,
            local_addr,
            admission,
            scheduler,
            stop: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Address the listener is bound to.
    #[must_use]
    pub const fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Handle for stopping the server from another thread.
    #[must_use]
    pub fn handle(&self) -> ServerHandle {
        ServerHandle {
            stop: Arc::clone(&self.stop),
            queue: Arc::clone(&self.scheduler.queue),
            wake_addr: wake_address(self.local_addr),
        }
    }

    /// Current worker pool statistics.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        self.scheduler.pool.stats()
    }

    /// Accept connections until shut down, then join the workers.
    ///
    /// Returns the final pool statistics.
    pub fn run(self) -> PoolStats {
        for stream in self.listener.incoming() {
            if self.stop.load(Ordering::Acquire) {
                break;
            }
            match stream {
                Ok(stream) => self.spawn_admission(stream),
                Err(e) => warn!(error = %e, "Failed to accept connection"),
            }
        }

        info!("Acceptor stopped");
        self.scheduler.pool.shutdown();
        self.scheduler.pool.stats()
    }

    fn spawn_admission(&self, stream: TcpStream) {
        let admission = self.admission.clone();
        let spawned = thread::Builder::new()
            .name("sfs-admit".into())
            .spawn(move || admission.admit(stream));
        // Detached: a refused admission only drops its own connection.
        if let Err(e) = spawned {
            warn!(error = %e, "Failed to spawn admission thread, dropping connection");
        }
    }
}

/// Frames, resolves and admits one connection.
#[derive(Clone)]
struct Admission {
    resolver: Arc<FileResolver>,
    producer: Producer<TcpStream>,
    read_timeout: Option<Duration>,
}

impl Admission {
    fn admit(&self, mut stream: TcpStream) {
        if let Err(e) = stream.set_read_timeout(self.read_timeout) {
            debug!(error = %e, "Could not set read timeout");
        }

        let path = read_request_path(&mut stream);
        let size = self.resolver.resolve(&path);

        if let Err(closed) = self.producer.admit(stream, path, size) {
            debug!(
                sequence = closed.into_inner().sequence(),
                "Queue closed, dropping connection"
            );
        }
    }
}

/// Stops a running [`Server`].
#[derive(Clone)]
pub struct ServerHandle {
    stop: Arc<AtomicBool>,
    queue: Arc<SchedulingQueue<TcpStream>>,
    wake_addr: SocketAddr,
}

impl ServerHandle {
    /// Stop accepting, close the queue and wake the acceptor.
    ///
    /// Queued requests are still served; `Server::run` returns once every
    /// worker has exited.
    pub fn shutdown(&self) {
        if self.stop.swap(true, Ordering::AcqRel) {
            return;
        }
        info!("Server shutdown requested");
        self.queue.close();
        // Unblock the acceptor parked in accept().
        if let Err(e) = TcpStream::connect_timeout(&self.wake_addr, Duration::from_secs(1)) {
            debug!(error = %e, "Wake-up connection failed");
        }
    }

    /// Whether shutdown has been requested.
    #[must_use]
    pub fn is_stopping(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }
}

fn wake_address(local: SocketAddr) -> SocketAddr {
    let ip = match local.ip() {
        IpAddr::V4(ip) if ip.is_unspecified() => IpAddr::V4(Ipv4Addr::LOCALHOST),
        IpAddr::V6(ip) if ip.is_unspecified() => IpAddr::V6(Ipv6Addr::LOCALHOST),
        ip => ip,
    };
    SocketAddr::new(ip, local.port())
}
