//! Log line format module
//!
//! Builds the timestamp prefix and the per-request audit trail written by
//! the dispatcher and the status reply chain.

use chrono::Utc;
use hyper::header::HOST;
use hyper::Request;

/// Delimiter opening every request audit block
pub const SECTION_DELIMITER: &str = "====================";

/// UTC timestamp prefix, e.g. `2024/05/01 13:45:10 `
pub fn timestamp() -> String {
    Utc::now().format("%Y/%m/%d %H:%M:%S ").to_string()
}

/// Target host of a request
///
/// Uses the `Host` header, falling back to the URI authority.
pub fn request_host<B>(req: &Request<B>) -> String {
    req.headers()
        .get(HOST)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .or_else(|| req.uri().authority().map(ToString::to_string))
        .unwrap_or_default()
}

/// Audit lines for an incoming request
///
/// Delimiter, host, raw request URI, then one line per header value in
/// the order the headers were received.
pub fn request_audit<B>(req: &Request<B>) -> Vec<String> {
    let mut lines = Vec::with_capacity(req.headers().len() + 3);
    lines.push(SECTION_DELIMITER.to_string());
    lines.push(format!("host: {}", request_host(req)));
    lines.push(format!("rURI: {}", req.uri()));
    for (name, value) in req.headers() {
        lines.push(format!(
            " {} = {}",
            name,
            String::from_utf8_lossy(value.as_bytes())
        ));
    }
    lines
}

/// Lines recorded for every pass through the status reply chain
pub fn status_reply(code: u16, message: &str) -> [String; 2] {
    [format!("[Status] {code}"), format!("[Message] [{message}]")]
}
