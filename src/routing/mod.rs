//! Routing module
//!
//! Path-based request routing with hierarchical prefix fallback:
//! - Action registry shared by path routes and status replies
//! - Exact match first, then longest matching subtree pattern
//! - Status reply chain with built-in 400/404/500 replies, reachable from
//!   handlers through [`ReplyChain`]

pub mod action;
pub mod matcher;
mod reply;
mod router;

pub use action::{status_key, Action};
pub use matcher::path_begins;
pub use reply::ReplyChain;
pub use router::Router;

use thiserror::Error;

/// Errors returned by router operations
#[derive(Debug, Error)]
pub enum RouterError {
    /// The router was not built with `Router::new`, so it has no registry.
    /// Serving requests against it is a programming error.
    #[error("router not ready: no action registry")]
    NotReady,
}
