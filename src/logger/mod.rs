//! Logger module
//!
//! Provides logging utilities for the server including:
//! - A shareable, append-only log sink (stderr, file or memory)
//! - Request audit and status reply line formats
//! - Server lifecycle, error and warning logging

pub mod format;
pub mod writer;

pub use writer::LogWriter;

use crate::config::Config;
use std::net::SocketAddr;

/// Initialize the process-wide logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(config.logging.log_file.as_deref())
}

fn write_line(message: &str) {
    writer::shared().write_line(message);
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    write_line("======================================");
    write_line(&format!("Server listening on: http://{addr}"));
    if let Some(workers) = config.server.workers {
        write_line(&format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.log_file {
        write_line(&format!("Log file: {path}"));
    }
    for route in &config.static_routes {
        write_line(&format!("Static route: {} -> {}", route.prefix, route.dir));
    }
    write_line("======================================");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_line(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_line(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_line(&format!("[WARN] {message}"));
}

pub fn log_shutdown() {
    write_line("[Shutdown] Stop signal received, no longer accepting connections");
}
