//! Status replies from inside handlers
//!
//! A handler that needs to answer 404 or 500 itself goes back through the
//! router's reply chain, so custom replies and the `[Status]` log lines
//! apply to it as well.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Request, Response, StatusCode};
use std::sync::{Arc, Weak};

use super::Router;
use crate::http;
use crate::logger;

/// Weak handle on a router's status reply chain
///
/// Handlers registered on a router keep this rather than an `Arc<Router>`,
/// which would make the router own itself. An unbound chain
/// (`ReplyChain::default()`) writes the default status text.
#[derive(Debug, Clone, Default)]
pub struct ReplyChain {
    router: Weak<Router>,
}

impl ReplyChain {
    pub fn new(router: &Arc<Router>) -> Self {
        Self {
            router: Arc::downgrade(router),
        }
    }

    /// Answer `req` with the router's reply for `code`
    ///
    /// Falls back to `<code> - <message> - Path: <path>` when the router is
    /// gone or not ready.
    pub async fn reply(
        &self,
        code: StatusCode,
        message: &str,
        req: Request<Bytes>,
    ) -> Response<Full<Bytes>> {
        let Some(router) = self.router.upgrade() else {
            return http::write_status(code, message, &http::request_path(&req));
        };
        let path = http::request_path(&req).into_owned();
        match router.reply_status(code, message, req).await {
            Ok(resp) => resp,
            Err(e) => {
                logger::log_error(&format!("Status reply {code} failed: {e}"));
                http::write_status(code, message, &path)
            }
        }
    }
}
