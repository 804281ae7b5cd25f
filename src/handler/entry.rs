//! Connection entry point
//!
//! Turns a streaming hyper request into the buffered request the router
//! works with, enforcing the configured body size limit.

use crate::http;
use crate::logger;
use crate::routing::{Router, RouterError};
use http_body_util::{BodyExt, Full, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::CONTENT_LENGTH;
use hyper::{Request, Response, StatusCode};
use std::convert::Infallible;

const TOO_LARGE_MESSAGE: &str = "Richiesta troppo grande.";

/// Main entry point for HTTP request handling
///
/// Collects the body (413 above `max_body_size`, 400 if it cannot be
/// read) and hands the request to the router.
pub async fn handle_request<B>(
    req: Request<B>,
    router: &Router,
    max_body_size: u64,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let (parts, body) = req.into_parts();
    let declared_too_large = exceeds_declared_length(&parts.headers, max_body_size);

    let result = if declared_too_large {
        let req = Request::from_parts(parts, Bytes::new());
        router
            .reply_status(StatusCode::PAYLOAD_TOO_LARGE, TOO_LARGE_MESSAGE, req)
            .await
    } else {
        let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
        match Limited::new(body, limit).collect().await {
            Ok(collected) => {
                router
                    .dispatch(Request::from_parts(parts, collected.to_bytes()))
                    .await
            }
            Err(e) => {
                let too_large = e.is::<http_body_util::LengthLimitError>();
                let req = Request::from_parts(parts, Bytes::new());
                if too_large {
                    router
                        .reply_status(StatusCode::PAYLOAD_TOO_LARGE, TOO_LARGE_MESSAGE, req)
                        .await
                } else {
                    logger::log_warning(&format!("Failed to read request body: {e}"));
                    router
                        .reply_status(StatusCode::BAD_REQUEST, &e.to_string(), req)
                        .await
                }
            }
        }
    };

    Ok(result.unwrap_or_else(|e: RouterError| {
        logger::log_error(&format!("Dispatch failed: {e}"));
        http::server_error_reply("")
    }))
}

/// True when `Content-Length` announces more than `max_body_size` bytes
fn exceeds_declared_length(headers: &hyper::HeaderMap, max_body_size: u64) -> bool {
    let Some(content_length) = headers.get(CONTENT_LENGTH) else {
        return false;
    };
    match content_length.to_str().ok().map(str::parse::<u64>) {
        Some(Ok(size)) => {
            if size > max_body_size {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                true
            } else {
                false
            }
        }
        _ => {
            logger::log_warning("Invalid Content-Length value, skipping size check");
            false
        }
    }
}
