//! # Scheduled File Server - Entry Point
//!
//! Parses configuration, builds the server and runs the accept loop. Any
//! construction failure is fatal: the process logs a diagnostic and exits
//! with status 1.

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use sched_file_server::config::ServerConfig;
use sched_file_server::core::AppResult;
use sched_file_server::server::Server;
use sched_file_server::util::init_tracing;

fn main() {
    // A missing .env is fine.
    let _ = dotenvy::dotenv();
    init_tracing();

    if let Err(e) = run() {
        error!("Fatal error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> AppResult<()> {
    let cli = ServerConfig::parse();
    let config = match &cli.config {
        Some(path) => ServerConfig::from_json_file(path).map_err(anyhow::Error::msg)?,
        None => cli.normalized(),
    };

    let server = Server::bind(config).context("failed to start server")?;
    let stats = server.run();
    info!(
        picked = stats.picked_requests,
        completed = stats.completed_requests,
        failed = stats.failed_requests,
        "Server stopped"
    );
    Ok(())
}
