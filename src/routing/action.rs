//! Routing table entries
//!
//! Path actions and status actions share one map. Path keys always start
//! with `/`; status keys are `#STATUS_<code>#`, which no normalized path can
//! equal.

use hyper::StatusCode;
use std::collections::HashMap;

use crate::handler::SharedHandler;

/// Registry: key to action
pub type ActionMap = HashMap<String, Action>;

/// A single routing entry
#[derive(Clone)]
pub struct Action {
    /// Registered path for path actions, empty for status actions
    pub pattern: String,
    pub status_reply: bool,
    /// Status this action replies for, or the code associated with a path
    pub status: StatusCode,
    pub handler: Option<SharedHandler>,
}

impl std::fmt::Debug for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Action")
            .field("pattern", &self.pattern)
            .field("status_reply", &self.status_reply)
            .field("status", &self.status)
            .field("handler", &self.handler.as_ref().map(|_| "<handler>"))
            .finish()
    }
}

impl Action {
    pub fn path(pattern: String, handler: Option<SharedHandler>, status: StatusCode) -> Self {
        Self {
            pattern,
            status_reply: false,
            status,
            handler,
        }
    }

    // The empty pattern keeps status actions out of prefix matching.
    pub fn status_reply(status: StatusCode, handler: Option<SharedHandler>) -> Self {
        Self {
            pattern: String::new(),
            status_reply: true,
            status,
            handler,
        }
    }

    /// Synthetic action returned when nothing matches
    pub fn not_found() -> Self {
        Self::status_reply(StatusCode::NOT_FOUND, None)
    }

    /// True if this action is the status reply for `code`
    pub fn replies_status(&self, code: StatusCode) -> bool {
        self.status_reply && self.status == code
    }
}

/// Registry key of the status action for `code`
pub fn status_key(code: StatusCode) -> String {
    format!("#STATUS_{}#", code.as_u16())
}

/// Path with a leading `/`
pub fn normalize_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}
