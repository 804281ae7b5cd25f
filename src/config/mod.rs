// Configuration module entry point
// Loads server configuration from file and environment

mod types;

use std::net::SocketAddr;

pub use types::{Config, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig, StaticRoute};

/// Default config file name (extension resolved by the `config` crate)
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from specified file path (without extension)
    ///
    /// The file is optional; `WEBDISPATCH_*` environment variables override
    /// file values (`WEBDISPATCH_SERVER__PORT=9000`).
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("WEBDISPATCH")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.backlog", 128)?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.connection_timeout", 30)?
            .set_default("http.max_body_size", 10_485_760)? // 10MB
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}
