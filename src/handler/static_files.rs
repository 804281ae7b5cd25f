//! Static file serving module
//!
//! A handler serving files below a root directory, mounted on subtree
//! routes such as `/img/`. The decoded request path is resolved against the
//! root as-is, so `/img/my%20logo.png` is read from `<root>/img/my logo.png`.
//! Missing files and read errors are answered through the router's reply
//! chain.

use crate::http::{self, cache, mime};
use crate::logger;
use crate::routing::ReplyChain;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{CACHE_CONTROL, CONTENT_LENGTH, CONTENT_TYPE, ETAG, IF_NONE_MATCH};
use hyper::{Method, Request, Response, StatusCode};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;

use super::{Handler, HandlerFuture};

/// Serves files from a directory
#[derive(Debug, Clone)]
pub struct StaticDir {
    inner: Arc<StaticDirInner>,
}

#[derive(Debug)]
struct StaticDirInner {
    root: PathBuf,
    index_files: Vec<String>,
    replies: ReplyChain,
}

impl StaticDir {
    /// Serve `root`, trying `index_files` in order for directories
    ///
    /// 404 and 500 go through `replies`; pass `ReplyChain::default()` for
    /// the plain default texts.
    pub fn new(root: impl Into<PathBuf>, index_files: Vec<String>, replies: ReplyChain) -> Self {
        Self {
            inner: Arc::new(StaticDirInner {
                root: root.into(),
                index_files,
                replies,
            }),
        }
    }
}

impl Handler for StaticDir {
    fn call(&self, req: Request<Bytes>) -> HandlerFuture {
        let inner = Arc::clone(&self.inner);
        Box::pin(async move { inner.serve(req).await })
    }
}

impl StaticDirInner {
    async fn serve(&self, req: Request<Bytes>) -> Response<Full<Bytes>> {
        if let Err(resp) = http::check_method(&req, &[Method::GET, Method::HEAD]) {
            return resp;
        }
        let path = http::request_path(&req).into_owned();

        let Some(file_path) = self.locate(&path).await else {
            return self
                .replies
                .reply(StatusCode::NOT_FOUND, http::NOT_FOUND_MESSAGE, req)
                .await;
        };

        let content = match fs::read(&file_path).await {
            Ok(c) => c,
            Err(e) => {
                logger::log_error(&format!(
                    "Failed to read file '{}': {e}",
                    file_path.display()
                ));
                return self
                    .replies
                    .reply(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string(), req)
                    .await;
            }
        };

        let if_none_match = req
            .headers()
            .get(IF_NONE_MATCH)
            .and_then(|v| v.to_str().ok());
        build_file_response(
            content,
            mime::content_type_for(&file_path),
            if_none_match,
            req.method() == Method::HEAD,
        )
    }

    /// Resolve a request path to a readable file inside the root
    async fn locate(&self, path: &str) -> Option<PathBuf> {
        let relative = path.trim_start_matches('/');
        let mut file_path = self.root.join(relative);

        if fs::metadata(&file_path).await.ok()?.is_dir() {
            let mut index = None;
            for name in &self.index_files {
                let candidate = file_path.join(name);
                if fs::metadata(&candidate).await.is_ok_and(|m| m.is_file()) {
                    index = Some(candidate);
                    break;
                }
            }
            file_path = index?;
        }

        // Security: ensure file_path is within root
        let root = match fs::canonicalize(&self.root).await {
            Ok(p) => p,
            Err(e) => {
                logger::log_warning(&format!(
                    "Static directory not found or inaccessible '{}': {e}",
                    self.root.display()
                ));
                return None;
            }
        };
        let canonical = fs::canonicalize(&file_path).await.ok()?;
        if !canonical.starts_with(&root) {
            logger::log_warning(&format!(
                "Path traversal attempt blocked: {path} -> {}",
                canonical.display()
            ));
            return None;
        }
        Some(canonical)
    }
}

/// Build file response with `ETag` revalidation
fn build_file_response(
    content: Vec<u8>,
    content_type: &str,
    if_none_match: Option<&str>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let etag = cache::etag_for(&content);
    let builder = Response::builder()
        .header(ETAG, &etag)
        .header(CACHE_CONTROL, "public, max-age=3600");

    let result = if cache::is_not_modified(if_none_match, &etag) {
        builder
            .status(StatusCode::NOT_MODIFIED)
            .body(Full::new(Bytes::new()))
    } else {
        let length = content.len();
        let body = if is_head {
            Bytes::new()
        } else {
            Bytes::from(content)
        };
        builder
            .status(StatusCode::OK)
            .header(CONTENT_TYPE, content_type)
            .header(CONTENT_LENGTH, length)
            .body(Full::new(body))
    };

    result.unwrap_or_else(|e| {
        logger::log_error(&format!("Failed to build file response: {e}"));
        Response::new(Full::new(Bytes::new()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::response::test_util::{body_string, header};
    use crate::logger::LogWriter;
    use crate::routing::Router;

    fn scratch_root(name: &str) -> PathBuf {
        let root = std::env::temp_dir().join(format!(
            "webdispatch-static-{name}-{}",
            std::process::id()
        ));
        std::fs::create_dir_all(root.join("img")).unwrap();
        std::fs::create_dir_all(root.join("files")).unwrap();
        std::fs::write(root.join("img").join("logo.svg"), "<svg/>").unwrap();
        std::fs::write(root.join("img").join("my logo.svg"), "<svg id=\"spaced\"/>").unwrap();
        std::fs::write(root.join("files").join("index.html"), "<p>files</p>").unwrap();
        root
    }

    fn get(path: &str) -> Request<Bytes> {
        Request::builder().uri(path).body(Bytes::new()).unwrap()
    }

    #[tokio::test]
    async fn test_serves_file_below_root() {
        let root = scratch_root("file");
        let dir = StaticDir::new(&root, vec!["index.html".to_string()], ReplyChain::default());

        let resp = dir.call(get("/img/logo.svg")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(header(&resp, "content-type"), Some("image/svg+xml"));
        assert!(header(&resp, "etag").is_some());
        assert_eq!(body_string(resp).await, "<svg/>");

        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn test_encoded_file_name_served() {
        let root = scratch_root("encoded");
        let dir = StaticDir::new(&root, vec![], ReplyChain::default());

        let resp = dir.call(get("/img/my%20logo.svg")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_string(resp).await, "<svg id=\"spaced\"/>");

        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn test_missing_file_uses_router_404() {
        let root = scratch_root("chain");
        let log = LogWriter::memory();
        let router = Arc::new(Router::new(Some(log.clone())));
        router
            .register_status(StatusCode::NOT_FOUND, |_req: Request<Bytes>| async {
                http::build_html_response(StatusCode::NOT_FOUND, "<h1>Niente</h1>".to_string())
            })
            .unwrap();
        let dir = StaticDir::new(&root, vec![], ReplyChain::new(&router));

        let resp = dir.call(get("/img/none.png")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_string(resp).await, "<h1>Niente</h1>");

        let lines = log.lines();
        assert!(lines.iter().any(|l| l.ends_with("[Status] 404")));
        assert!(lines.iter().any(|l| l.ends_with("[Message] [Pagina non trovata.]")));

        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn test_directory_serves_index() {
        let root = scratch_root("index");
        let dir = StaticDir::new(&root, vec!["index.html".to_string()], ReplyChain::default());

        let resp = dir.call(get("/files/")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_string(resp).await, "<p>files</p>");

        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn test_missing_file_is_404_text() {
        let root = scratch_root("missing");
        let dir = StaticDir::new(&root, vec![], ReplyChain::default());

        let resp = dir.call(get("/img/none.png")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_string(resp).await,
            "404 - Pagina non trovata. - Path: /img/none.png"
        );

        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn test_traversal_blocked() {
        let root = scratch_root("traversal");
        let dir = StaticDir::new(root.join("img"), vec![], ReplyChain::default());

        let resp = dir.call(get("/../files/index.html")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn test_etag_revalidation() {
        let root = scratch_root("etag");
        let dir = StaticDir::new(&root, vec![], ReplyChain::default());

        let first = dir.call(get("/img/logo.svg")).await;
        let etag = header(&first, "etag").unwrap().to_string();

        let req = Request::builder()
            .uri("/img/logo.svg")
            .header("If-None-Match", etag)
            .body(Bytes::new())
            .unwrap();
        let resp = dir.call(req).await;
        assert_eq!(resp.status(), StatusCode::NOT_MODIFIED);
        assert_eq!(body_string(resp).await, "");

        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn test_post_rejected() {
        let root = scratch_root("post");
        let dir = StaticDir::new(&root, vec![], ReplyChain::default());

        let req = Request::builder()
            .method(Method::POST)
            .uri("/img/logo.svg")
            .body(Bytes::new())
            .unwrap();
        let resp = dir.call(req).await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(header(&resp, "allow"), Some("GET, HEAD"));

        let _ = std::fs::remove_dir_all(root);
    }
}
