//! Path-based request router with hierarchical prefix fallback and a
//! status-code reply chain, served over hyper.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod routing;
pub mod server;

pub use handler::{Handler, StaticDir};
pub use routing::{ReplyChain, Router, RouterError};
