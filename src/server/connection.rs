// Connection handling module
// Serves one accepted TCP connection with the router

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;

use crate::handler;
use crate::logger;
use crate::routing::Router;

/// Per-connection settings taken from configuration
#[derive(Debug, Clone, Copy)]
pub struct ConnectionSettings {
    /// Keep HTTP/1.1 connections open between requests
    pub keep_alive: bool,
    /// Upper bound on the whole connection lifetime
    pub timeout: Duration,
    /// Largest request body accepted, in bytes
    pub max_body_size: u64,
}

/// Serve a connection in its own task
///
/// This function:
/// 1. Wraps the TCP stream in `TokioIo`
/// 2. Configures HTTP/1.1 keep-alive
/// 3. Serves every request on the connection through `router`
/// 4. Drops the connection when `settings.timeout` elapses
///
/// # Arguments
///
/// * `stream` - The accepted TCP stream
/// * `router` - Router shared by all connections
/// * `settings` - Keep-alive, timeout and body limit
pub fn spawn_connection(stream: TcpStream, router: Arc<Router>, settings: ConnectionSettings) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        // Build HTTP/1 connection with keep-alive support
        let mut builder = http1::Builder::new();
        builder.keep_alive(settings.keep_alive);

        // Serve connection, one router dispatch per request
        let conn = builder.serve_connection(
            io,
            service_fn(move |req| {
                let router = Arc::clone(&router);
                async move { handler::handle_request(req, &router, settings.max_body_size).await }
            }),
        );

        // Apply timeout and handle result
        match tokio::time::timeout(settings.timeout, conn).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => logger::log_connection_error(&err),
            Err(_) => logger::log_warning(&format!(
                "Connection timeout after {} seconds",
                settings.timeout.as_secs()
            )),
        }
    });
}
