//! HTTP response building module
//!
//! Plain-text status replies, the built-in 400/404/500 replies and a few
//! generic builders shared by the router and handlers.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{ALLOW, CONTENT_TYPE, LOCATION};
use hyper::{Response, StatusCode};

pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
pub const TEXT_HTML: &str = "text/html; charset=utf-8";
pub const APPLICATION_JSON: &str = "application/json; charset=utf-8";

pub const BAD_REQUEST_MESSAGE: &str = "Richiesta non valida.";
pub const NOT_FOUND_MESSAGE: &str = "Pagina non trovata.";
pub const SERVER_ERROR_MESSAGE: &str = "Errore interno del server.";

/// Body of a plain-text status reply
///
/// `<code> - <message>`, followed by ` - Path: <path>` when `path` is not empty.
pub fn status_text(code: StatusCode, message: &str, path: &str) -> String {
    if path.is_empty() {
        format!("{} - {message}", code.as_u16())
    } else {
        format!("{} - {message} - Path: {path}", code.as_u16())
    }
}

/// Write a plain-text status reply
pub fn write_status(code: StatusCode, message: &str, path: &str) -> Response<Full<Bytes>> {
    build_text_response(code, status_text(code, message, path))
}

/// Built-in reply for 400
pub fn bad_request_reply(path: &str) -> Response<Full<Bytes>> {
    write_status(StatusCode::BAD_REQUEST, BAD_REQUEST_MESSAGE, path)
}

/// Built-in reply for 404
pub fn not_found_reply(path: &str) -> Response<Full<Bytes>> {
    write_status(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE, path)
}

/// Built-in reply for 500
pub fn server_error_reply(path: &str) -> Response<Full<Bytes>> {
    write_status(StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR_MESSAGE, path)
}

/// Build a `text/plain` response
pub fn build_text_response(code: StatusCode, body: String) -> Response<Full<Bytes>> {
    build_response(code, TEXT_PLAIN, Bytes::from(body))
}

/// Build a `text/html` response
pub fn build_html_response(code: StatusCode, body: String) -> Response<Full<Bytes>> {
    build_response(code, TEXT_HTML, Bytes::from(body))
}

/// Build a response with the given status, content type and body
pub fn build_response(code: StatusCode, content_type: &str, body: Bytes) -> Response<Full<Bytes>> {
    Response::builder()
        .status(code)
        .header(CONTENT_TYPE, content_type)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error(code, &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 405 Method Not Allowed response
///
/// Body: `405 - <method> invece di <allowed>`; `Allow` lists the same methods.
pub fn build_405_response(method: &str, allowed: &str) -> Response<Full<Bytes>> {
    let code = StatusCode::METHOD_NOT_ALLOWED;
    Response::builder()
        .status(code)
        .header(CONTENT_TYPE, TEXT_PLAIN)
        .header(ALLOW, allowed)
        .body(Full::new(Bytes::from(format!(
            "{} - {method} invece di {allowed}",
            code.as_u16()
        ))))
        .unwrap_or_else(|e| {
            log_build_error(code, &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 406 Not Acceptable response listing the producible types
pub fn build_406_response(allowed: &str) -> Response<Full<Bytes>> {
    let code = StatusCode::NOT_ACCEPTABLE;
    build_text_response(
        code,
        format!(
            "{} - la richiesta non accetta il formato della risposta: {allowed}",
            code.as_u16()
        ),
    )
}

/// Build a redirect to `location`
///
/// Codes outside the 3xx range are replaced by 302 Found.
pub fn redirect(location: &str, code: StatusCode) -> Response<Full<Bytes>> {
    let code = if code.is_redirection() {
        code
    } else {
        StatusCode::FOUND
    };
    Response::builder()
        .status(code)
        .header(LOCATION, location)
        .header(CONTENT_TYPE, TEXT_HTML)
        .body(Full::new(Bytes::from(format!(
            "<a href=\"{location}\">{}</a>.\n",
            code.canonical_reason().unwrap_or("Redirect")
        ))))
        .unwrap_or_else(|e| {
            log_build_error(code, &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Log response build error
fn log_build_error(code: StatusCode, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {code} response: {error}"));
}


#[cfg(test)]
mod tests {
    use super::test_util::{body_string, header};
    use super::*;

    #[test]
    fn test_status_text() {
        assert_eq!(
            status_text(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE, "/x"),
            "404 - Pagina non trovata. - Path: /x"
        );
        assert_eq!(
            status_text(StatusCode::INTERNAL_SERVER_ERROR, "boom", ""),
            "500 - boom"
        );
    }

    #[tokio::test]
    async fn test_default_replies() {
        let resp = bad_request_reply("/form");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(header(&resp, "content-type"), Some(TEXT_PLAIN));
        assert_eq!(
            body_string(resp).await,
            "400 - Richiesta non valida. - Path: /form"
        );

        let resp = not_found_reply("/unregistered");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_string(resp).await,
            "404 - Pagina non trovata. - Path: /unregistered"
        );

        let resp = server_error_reply("/api");
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_string(resp).await,
            "500 - Errore interno del server. - Path: /api"
        );
    }

    #[tokio::test]
    async fn test_405_response() {
        let resp = build_405_response("DELETE", "GET, POST");
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(header(&resp, "allow"), Some("GET, POST"));
        assert_eq!(body_string(resp).await, "405 - DELETE invece di GET, POST");
    }

    #[tokio::test]
    async fn test_406_response() {
        let resp = build_406_response("application/json");
        assert_eq!(resp.status(), StatusCode::NOT_ACCEPTABLE);
        assert_eq!(header(&resp, "content-type"), Some(TEXT_PLAIN));
        assert_eq!(
            body_string(resp).await,
            "406 - la richiesta non accetta il formato della risposta: application/json"
        );
    }

    #[test]
    fn test_redirect() {
        let resp = redirect("/", StatusCode::SEE_OTHER);
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(header(&resp, "location"), Some("/"));

        // Non-3xx codes fall back to 302
        let resp = redirect("/", StatusCode::OK);
        assert_eq!(resp.status(), StatusCode::FOUND);
    }
}
