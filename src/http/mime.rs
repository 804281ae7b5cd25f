//! MIME type detection module
//!
//! Maps a file extension to the `Content-Type` sent by the static handler.

use std::path::Path;

const FALLBACK: &str = "application/octet-stream";

// Extensions are matched lowercase.
const TYPES: &[(&str, &str)] = &[
    ("html", "text/html; charset=utf-8"),
    ("htm", "text/html; charset=utf-8"),
    ("css", "text/css; charset=utf-8"),
    ("txt", "text/plain; charset=utf-8"),
    ("csv", "text/csv; charset=utf-8"),
    ("js", "text/javascript; charset=utf-8"),
    ("mjs", "text/javascript; charset=utf-8"),
    ("json", "application/json"),
    ("xml", "application/xml"),
    ("pdf", "application/pdf"),
    ("zip", "application/zip"),
    ("wasm", "application/wasm"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("svg", "image/svg+xml"),
    ("ico", "image/x-icon"),
    ("webp", "image/webp"),
    ("woff", "font/woff"),
    ("woff2", "font/woff2"),
    ("ttf", "font/ttf"),
];

/// Content type for a file, chosen by its extension
pub fn content_type_for(path: &Path) -> &'static str {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return FALLBACK;
    };
    let ext = ext.to_ascii_lowercase();
    TYPES
        .iter()
        .find(|(known, _)| *known == ext)
        .map_or(FALLBACK, |&(_, content_type)| content_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_extensions() {
        assert_eq!(content_type_for(Path::new("a/index.html")), "text/html; charset=utf-8");
        assert_eq!(content_type_for(Path::new("apilib.js")), "text/javascript; charset=utf-8");
        assert_eq!(content_type_for(Path::new("LOGO.PNG")), "image/png");
    }

    #[test]
    fn test_unknown_extension() {
        assert_eq!(content_type_for(Path::new("data.xyz")), FALLBACK);
        assert_eq!(content_type_for(Path::new("Makefile")), FALLBACK);
    }
}
