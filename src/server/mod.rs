// Server module entry
// Accept loop, per-connection serving and graceful stop

pub mod connection;
pub mod listener;

use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use crate::config::Config;
use crate::logger;
use crate::routing::Router;

pub use connection::{spawn_connection, ConnectionSettings};
pub use listener::bind_listener;

impl From<&Config> for ConnectionSettings {
    fn from(config: &Config) -> Self {
        Self {
            keep_alive: config.performance.keep_alive,
            timeout: Duration::from_secs(config.performance.connection_timeout),
            max_body_size: config.http.max_body_size,
        }
    }
}

/// Accept connections until `shutdown` completes
///
/// Connections already accepted keep running on their own tasks.
pub async fn serve<F>(
    listener: TcpListener,
    router: Arc<Router>,
    settings: ConnectionSettings,
    shutdown: F,
) -> std::io::Result<()>
where
    F: std::future::Future<Output = ()>,
{
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, _peer_addr)) => {
                        spawn_connection(stream, Arc::clone(&router), settings);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }
            () = &mut shutdown => {
                logger::log_shutdown();
                return Ok(());
            }
        }
    }
}

/// Resolves on Ctrl+C, or SIGTERM on Unix
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            logger::log_error(&format!("Failed to listen for Ctrl+C: {e}"));
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                logger::log_error(&format!("Failed to register SIGTERM handler: {e}"));
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
