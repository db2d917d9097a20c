//! Server process configuration.
//!
//! Values come from CLI flags, environment variables (a `.env` file is
//! honoured by the binary), or a JSON file passed with `--config`.
//!
//! ```bash
//! sched-file-server --port 8080 --root ./public --policy sff -t 8 -q 32
//! SFS_POLICY=sff SFS_THREADS=8 sched-file-server
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::config::SchedulerConfig;

/// How scheduler events are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum EventFormat {
    /// Human readable lines through `tracing`.
    #[default]
    Text,
    /// One JSON object per line on stdout.
    Json,
}

/// Static file server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Parser, Serialize, Deserialize)]
#[command(name = "sched-file-server")]
#[command(about = "Multi-threaded static file server with FIFO / smallest-file-first scheduling")]
#[command(version)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0", env = "SFS_HOST")]
    pub host: String,

    /// Port to listen on (0 picks a free port)
    #[arg(short, long, default_value_t = 8080, env = "SFS_PORT")]
    pub port: u16,

    /// Directory files are served from
    #[arg(short, long, default_value = ".", env = "SFS_ROOT")]
    pub root: PathBuf,

    /// Socket read timeout while framing a request, in milliseconds (0 disables)
    #[arg(long = "read-timeout-ms", default_value_t = 5000, env = "SFS_READ_TIMEOUT_MS")]
    pub read_timeout_ms: u64,

    /// Scheduler event output format
    #[arg(long = "event-format", value_enum, default_value_t = EventFormat::Text, env = "SFS_EVENT_FORMAT")]
    pub event_format: EventFormat,

    /// Queue and worker settings
    #[command(flatten)]
    #[serde(flatten)]
    pub scheduler: SchedulerConfig,

    /// Load configuration from a JSON file instead of flags
    #[arg(long, env = "SFS_CONFIG")]
    #[serde(skip)]
    pub config: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            root: PathBuf::from("."),
            read_timeout_ms: 5000,
            event_format: EventFormat::Text,
            scheduler: SchedulerConfig::default(),
            config: None,
        }
    }
}

impl ServerConfig {
    /// Full bind address (`host:port`).
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Read timeout for request framing, `None` when disabled.
    #[must_use]
    pub const fn read_timeout(&self) -> Option<Duration> {
        if self.read_timeout_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.read_timeout_ms))
        }
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first offending field.
    pub fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("host must not be empty".into());
        }
        self.scheduler.validate()
    }

    /// Clamp out-of-range scheduler values instead of rejecting them.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.scheduler = self.scheduler.normalized();
        self
    }

    /// Parse configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// Returns a message on parse or validation failure.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and parse a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns a message on I/O, parse or validation failure.
    pub fn from_json_file(path: &Path) -> Result<Self, String> {
        let input = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
        Self::from_json_str(&input)
    }
}
