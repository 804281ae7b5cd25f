//! Request handler module
//!
//! Defines the handler capability the router dispatches to, the connection
//! entry point that feeds requests into the router, and the built-in static
//! directory handler.

pub mod entry;
pub mod static_files;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Request, Response};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

// Re-export main entry point
pub use entry::handle_request;
pub use static_files::StaticDir;

/// Boxed future produced by a handler
pub type HandlerFuture = Pin<Box<dyn Future<Output = Response<Full<Bytes>>> + Send>>;

/// Anything that turns a request into a response
///
/// Implemented for async closures and functions taking `Request<Bytes>`:
///
/// ```ignore
/// router.register_default("/ping", |_req: Request<Bytes>| async {
///     build_text_response(StatusCode::OK, "pong".to_string())
/// })?;
/// ```
pub trait Handler: Send + Sync + 'static {
    fn call(&self, req: Request<Bytes>) -> HandlerFuture;
}

impl<F, Fut> Handler for F
where
    F: Fn(Request<Bytes>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response<Full<Bytes>>> + Send + 'static,
{
    fn call(&self, req: Request<Bytes>) -> HandlerFuture {
        Box::pin(self(req))
    }
}

/// Handler shared between registry entries and in-flight requests
pub type SharedHandler = Arc<dyn Handler>;
