//! Conditional request module
//!
//! `ETag` generation and `If-None-Match` evaluation for static files.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Quoted `ETag` derived from the file content, e.g. `"1f3a9c"`
pub fn etag_for(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    format!("\"{:x}\"", hasher.finish())
}

/// True when the client's cached copy is current
///
/// `If-None-Match` may list several tags separated by commas, or `*`.
pub fn is_not_modified(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|header| {
        header
            .split(',')
            .map(str::trim)
            .any(|tag| tag == "*" || tag == etag)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_etag_is_quoted_and_stable() {
        let etag = etag_for(b"same content");
        assert!(etag.starts_with('"') && etag.ends_with('"'));
        assert_eq!(etag, etag_for(b"same content"));
        assert_ne!(etag, etag_for(b"other content"));
    }

    #[test]
    fn test_is_not_modified() {
        let etag = "\"abc123\"";
        assert!(is_not_modified(Some("\"abc123\""), etag));
        assert!(is_not_modified(Some("\"xyz\", \"abc123\""), etag));
        assert!(is_not_modified(Some("*"), etag));
        assert!(!is_not_modified(Some("\"different\""), etag));
        assert!(!is_not_modified(None, etag));
    }
}
