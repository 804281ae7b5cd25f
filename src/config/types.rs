// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    /// Directory-backed subtree routes
    #[serde(default = "default_static_routes")]
    pub static_routes: Vec<StaticRoute>,
    /// Files tried, in order, when a static route resolves to a directory
    #[serde(default = "default_index_files")]
    pub index_files: Vec<String>,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
    pub backlog: i32,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct LoggingConfig {
    /// Log file path (optional, stderr if not set)
    #[serde(default)]
    pub log_file: Option<String>,
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive: bool,
    /// Seconds a single connection may stay open
    pub connection_timeout: u64,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub max_body_size: u64,
}

/// A route prefix served from a directory
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct StaticRoute {
    /// Route pattern, a trailing slash makes it a subtree route
    pub prefix: String,
    /// Directory the request path is resolved against
    pub dir: String,
}

fn default_static_routes() -> Vec<StaticRoute> {
    vec![
        StaticRoute {
            prefix: "/img/".to_string(),
            dir: "public".to_string(),
        },
        StaticRoute {
            prefix: "/files/".to_string(),
            dir: "public".to_string(),
        },
    ]
}

fn default_index_files() -> Vec<String> {
    vec!["index.html".to_string()]
}
