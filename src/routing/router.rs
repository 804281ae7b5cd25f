//! Request router
//!
//! Owns the action registry and the log sink. Requests are resolved to a
//! path action, and anything without a path handler falls through to the
//! status reply chain.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Request, Response, StatusCode};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::action::{normalize_path, status_key, Action, ActionMap};
use super::matcher::find_action;
use super::RouterError;
use crate::handler::{Handler, SharedHandler};
use crate::http;
use crate::logger::{format, writer, LogWriter};

/// Path and status-code router
///
/// `Router::new` builds a ready router; `Router::default()` is the not
/// ready value, on which every registry operation fails with
/// [`RouterError::NotReady`].
pub struct Router {
    actions: Option<RwLock<ActionMap>>,
    log: LogWriter,
}

impl Default for Router {
    fn default() -> Self {
        Self {
            actions: None,
            log: writer::shared(),
        }
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("Router");
        match self.read() {
            Ok(actions) => s.field("actions", &actions.len()),
            Err(_) => s.field("actions", &"<not ready>"),
        };
        s.field("log", &self.log).finish()
    }
}

impl Router {
    /// Build a ready router with the built-in 400, 404 and 500 replies
    ///
    /// Replace them, or add replies for other codes, with
    /// [`Router::register_status`]. Log lines go to `log`, or to the
    /// process-wide writer when `None`.
    pub fn new(log: Option<LogWriter>) -> Self {
        let mut actions = HashMap::with_capacity(8);
        let defaults: [(StatusCode, SharedHandler); 3] = [
            (
                StatusCode::BAD_REQUEST,
                Arc::new(|req: Request<Bytes>| async move {
                    http::bad_request_reply(&http::request_path(&req))
                }),
            ),
            (
                StatusCode::NOT_FOUND,
                Arc::new(|req: Request<Bytes>| async move {
                    http::not_found_reply(&http::request_path(&req))
                }),
            ),
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Arc::new(|req: Request<Bytes>| async move {
                    http::server_error_reply(&http::request_path(&req))
                }),
            ),
        ];
        for (code, handler) in defaults {
            actions.insert(status_key(code), Action::status_reply(code, Some(handler)));
        }

        Self {
            actions: Some(RwLock::new(actions)),
            log: log.unwrap_or_else(writer::shared),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.actions.is_some()
    }

    /// Route `path` to `handler`; `code` is the status associated with it
    ///
    /// A missing leading `/` is added. Registering a path again replaces
    /// the previous action. A trailing `/` makes the route cover its subtree.
    pub fn register<H: Handler>(
        &self,
        path: &str,
        handler: H,
        code: StatusCode,
    ) -> Result<(), RouterError> {
        self.register_path(path, Some(Arc::new(handler)), code)
    }

    /// Route `path` to `handler` with status 200
    pub fn register_default<H: Handler>(&self, path: &str, handler: H) -> Result<(), RouterError> {
        self.register(path, handler, StatusCode::OK)
    }

    /// Route `path` to the status reply chain for `code`
    pub fn register_reply(&self, path: &str, code: StatusCode) -> Result<(), RouterError> {
        self.register_path(path, None, code)
    }

    /// Set the reply for status `code`
    pub fn register_status<H: Handler>(&self, code: StatusCode, handler: H) -> Result<(), RouterError> {
        let handler: SharedHandler = Arc::new(handler);
        self.write()?
            .insert(status_key(code), Action::status_reply(code, Some(handler)));
        Ok(())
    }

    fn register_path(
        &self,
        path: &str,
        handler: Option<SharedHandler>,
        code: StatusCode,
    ) -> Result<(), RouterError> {
        let mut actions = self.write()?;
        let pattern = normalize_path(path);
        actions.insert(pattern.clone(), Action::path(pattern, handler, code));
        Ok(())
    }

    /// Resolve a request path to its action
    ///
    /// Returns the synthetic 404 action when nothing matches or the router
    /// is not ready.
    pub fn resolve(&self, path: &str) -> Action {
        self.read()
            .ok()
            .and_then(|actions| find_action(&actions, path).cloned())
            .unwrap_or_else(Action::not_found)
    }

    /// Answer `req` through the reply registered for `code`
    ///
    /// Without a registered reply the plain-text default is written:
    /// `<code> - <message> - Path: <path>`. The status and message are
    /// logged on every call.
    pub async fn reply_status(
        &self,
        code: StatusCode,
        message: &str,
        req: Request<Bytes>,
    ) -> Result<Response<Full<Bytes>>, RouterError> {
        let handler = {
            let actions = self.read()?;
            actions
                .get(&status_key(code))
                .filter(|a| a.replies_status(code))
                .and_then(|a| a.handler.clone())
        };

        self.log
            .write_lines(&format::status_reply(code.as_u16(), message));

        Ok(match handler {
            Some(handler) => handler.call(req).await,
            None => http::write_status(code, message, &http::request_path(&req)),
        })
    }

    /// Dispatch one request
    ///
    /// Matching uses the percent-decoded path. Logs the request, then runs exactly one of: the matched path
    /// handler, the registered status reply, or the default status text.
    pub async fn dispatch(&self, req: Request<Bytes>) -> Result<Response<Full<Bytes>>, RouterError> {
        self.log.write_lines(&format::request_audit(&req));

        let action = self.resolve(&http::request_path(&req));
        if action.status_reply {
            return self.reply_status(action.status, "", req).await;
        }
        match action.handler {
            Some(handler) => Ok(handler.call(req).await),
            None => self.reply_status(action.status, "", req).await,
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, ActionMap>, RouterError> {
        let lock = self.actions.as_ref().ok_or(RouterError::NotReady)?;
        Ok(lock.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, ActionMap>, RouterError> {
        let lock = self.actions.as_ref().ok_or(RouterError::NotReady)?;
        Ok(lock.write().unwrap_or_else(PoisonError::into_inner))
    }
}
