//! Request path module
//!
//! Routing, status texts and file lookup all work on the decoded path:
//! `/img/my%20logo.svg` is matched and served as `/img/my logo.svg`.

use hyper::Request;
use std::borrow::Cow;

/// Percent-decoded request path, without the query string
///
/// A path whose escapes do not decode to UTF-8 is returned as received.
pub fn request_path<B>(req: &Request<B>) -> Cow<'_, str> {
    let raw = req.uri().path();
    urlencoding::decode(raw).unwrap_or(Cow::Borrowed(raw))
}
