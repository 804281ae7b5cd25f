//! HTTP protocol layer module
//!
//! Status replies, response builders, content negotiation and the small
//! pieces of HTTP the static file handler needs.

pub mod cache;
pub mod mime;
pub mod negotiate;
pub mod path;
pub mod response;

// Re-export commonly used items
pub use negotiate::{
    accepts, check_accept, check_method, method_allowed, serve_json, serve_json_raw,
    JSON_MIME_TYPES,
};
pub use path::request_path;
pub use response::{
    bad_request_reply, build_html_response, build_text_response, not_found_reply, redirect,
    server_error_reply, write_status, NOT_FOUND_MESSAGE,
};
