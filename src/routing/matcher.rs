//! Path matching module
//!
//! Exact match first, then the longest registered pattern whose subtree
//! contains the request path.

use super::action::{Action, ActionMap};

/// True if `req_path` equals `act_path` or lies in its subtree
///
/// One trailing slash is ignored on both sides when comparing for
/// equality. Empty paths never match.
pub fn path_begins(req_path: &str, act_path: &str) -> bool {
    if act_path.is_empty() || req_path.is_empty() {
        return false;
    }
    let act_pure = act_path.strip_suffix('/').unwrap_or(act_path);
    let req_pure = req_path.strip_suffix('/').unwrap_or(req_path);
    if act_pure == req_pure {
        return true;
    }
    req_path
        .strip_prefix(act_pure)
        .is_some_and(|rest| rest.starts_with('/'))
}

/// Find the most specific path action for `req_path`
///
/// Among prefix matches the longest raw pattern wins. Patterns of equal
/// length are not ranked: whichever the map yields first is kept.
pub fn find_action<'a>(actions: &'a ActionMap, req_path: &str) -> Option<&'a Action> {
    if let Some(action) = actions.get(req_path).filter(|a| !a.status_reply) {
        return Some(action);
    }

    let mut found: Option<&Action> = None;
    for action in actions.values().filter(|a| !a.status_reply) {
        if !path_begins(req_path, &action.pattern) {
            continue;
        }
        if found.is_none_or(|best| action.pattern.len() > best.pattern.len()) {
            found = Some(action);
        }
    }
    found
}
