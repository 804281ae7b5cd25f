//! Content negotiation module
//!
//! Method and `Accept` guards for handlers, and the JSON reply writer.
//!
//! Each guard comes in two forms: a predicate (`method_allowed`, `accepts`)
//! that only inspects the request, and a rejecting check (`check_method`,
//! `check_accept`) whose `Err` carries the 405/406 response to send back.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::ACCEPT;
use hyper::{Method, Request, Response, StatusCode};
use serde::Serialize;

use super::response::{build_405_response, build_406_response, build_response, APPLICATION_JSON};
use crate::logger;

/// Media ranges that let a client receive a JSON reply
pub const JSON_MIME_TYPES: &[&str] = &["*/*", "application/*", "application/json"];

/// True if the request method is one of `allowed`
pub fn method_allowed<B>(req: &Request<B>, allowed: &[Method]) -> bool {
    allowed.contains(req.method())
}

/// Reject the request with 405 unless its method is one of `allowed`
///
/// ```ignore
/// if let Err(resp) = check_method(&req, &[Method::GET]) {
///     return resp;
/// }
/// ```
pub fn check_method<B>(req: &Request<B>, allowed: &[Method]) -> Result<(), Response<Full<Bytes>>> {
    if method_allowed(req, allowed) {
        return Ok(());
    }
    let allowed_list = allowed
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    Err(build_405_response(req.method().as_str(), &allowed_list))
}

/// True if the `Accept` header contains any of `allowed`
///
/// This is a substring test, not media range negotiation: `text/html`
/// does not accept `application/json`, an absent header accepts nothing.
pub fn accepts<B>(req: &Request<B>, allowed: &[&str]) -> bool {
    let accepted = req
        .headers()
        .get(ACCEPT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    allowed.iter().any(|mime| accepted.contains(mime))
}

/// Reject the request with 406 unless it accepts one of `allowed`
pub fn check_accept<B>(req: &Request<B>, allowed: &[&str]) -> Result<(), Response<Full<Bytes>>> {
    if accepts(req, allowed) {
        Ok(())
    } else {
        Err(build_406_response(&allowed.join(", ")))
    }
}

/// Reply with `payload` serialized as a JSON document
///
/// Answers 406 when the client does not accept JSON. A payload that fails
/// to serialize still gets `code` and the JSON content type, with an empty
/// body; the failure is logged as a warning.
pub fn serve_json<B, T>(req: &Request<B>, payload: &T, code: StatusCode) -> Response<Full<Bytes>>
where
    T: Serialize + ?Sized,
{
    if let Err(resp) = check_accept(req, JSON_MIME_TYPES) {
        return resp;
    }
    let body = match serde_json::to_vec(payload) {
        Ok(data) => Bytes::from(data),
        Err(e) => {
            logger::log_warning(&format!(
                "JSON serialization failed for {}: {e}",
                req.uri().path()
            ));
            Bytes::new()
        }
    };
    build_response(code, APPLICATION_JSON, body)
}

/// Reply with an already encoded JSON document, passed through unchanged
pub fn serve_json_raw<B>(
    req: &Request<B>,
    payload: impl Into<Bytes>,
    code: StatusCode,
) -> Response<Full<Bytes>> {
    if let Err(resp) = check_accept(req, JSON_MIME_TYPES) {
        return resp;
    }
    build_response(code, APPLICATION_JSON, payload.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::response::test_util::{body_string, header};
    use crate::http::response::TEXT_PLAIN;
    use serde::ser::Error as _;

    fn request(method: Method, accept: Option<&str>) -> Request<()> {
        let mut builder = Request::builder().method(method).uri("/api/nota");
        if let Some(accept) = accept {
            builder = builder.header("Accept", accept);
        }
        builder.body(()).unwrap()
    }

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("not representable"))
        }
    }

    #[test]
    fn test_method_allowed() {
        let req = request(Method::POST, None);
        assert!(method_allowed(&req, &[Method::GET, Method::POST]));
        assert!(!method_allowed(&req, &[Method::GET]));
        assert!(check_method(&req, &[Method::POST]).is_ok());
    }

    #[tokio::test]
    async fn test_check_method_rejects() {
        let req = request(Method::DELETE, None);
        let resp = check_method(&req, &[Method::GET, Method::POST]).unwrap_err();
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(header(&resp, "allow"), Some("GET, POST"));
        assert_eq!(header(&resp, "content-type"), Some(TEXT_PLAIN));
        assert_eq!(body_string(resp).await, "405 - DELETE invece di GET, POST");
    }

    #[test]
    fn test_accepts_substring() {
        let req = request(Method::GET, Some("text/html,application/json;q=0.9"));
        assert!(accepts(&req, &["application/json"]));

        let req = request(Method::GET, Some("text/html"));
        assert!(!accepts(&req, &["application/json"]));

        let req = request(Method::GET, None);
        assert!(!accepts(&req, JSON_MIME_TYPES));
    }

    #[tokio::test]
    async fn test_check_accept_rejects() {
        let req = request(Method::GET, Some("text/html"));
        let resp = check_accept(&req, &["application/json"]).unwrap_err();
        assert_eq!(resp.status(), StatusCode::NOT_ACCEPTABLE);
        assert_eq!(
            body_string(resp).await,
            "406 - la richiesta non accetta il formato della risposta: application/json"
        );
    }

    #[tokio::test]
    async fn test_serve_json() {
        let req = request(Method::GET, Some("application/json"));
        let resp = serve_json(&req, &serde_json::json!({"ok": true}), StatusCode::OK);
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(header(&resp, "content-type"), Some(APPLICATION_JSON));
        assert_eq!(body_string(resp).await, r#"{"ok":true}"#);
    }

    #[tokio::test]
    async fn test_serve_json_not_acceptable() {
        let req = request(Method::GET, Some("text/html"));
        let resp = serve_json(&req, &serde_json::json!({"ok": true}), StatusCode::OK);
        assert_eq!(resp.status(), StatusCode::NOT_ACCEPTABLE);
        assert_eq!(
            body_string(resp).await,
            "406 - la richiesta non accetta il formato della risposta: */*, application/*, application/json"
        );
    }

    #[tokio::test]
    async fn test_serve_json_raw_passthrough() {
        let req = request(Method::GET, Some("*/*"));
        let resp = serve_json_raw(&req, r#"{"id":7}"#, StatusCode::CREATED);
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(body_string(resp).await, r#"{"id":7}"#);
    }

    #[tokio::test]
    async fn test_serve_json_serialization_failure_keeps_status() {
        let req = request(Method::GET, Some("application/*"));
        let resp = serve_json(&req, &Unserializable, StatusCode::OK);
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(header(&resp, "content-type"), Some(APPLICATION_JSON));
        assert_eq!(body_string(resp).await, "");
    }
}
