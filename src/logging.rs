//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes, to_bytes},
    extract::{FromRequest, Request},
    http::{
        HeaderMap, HeaderValue, StatusCode,
        header::{COOKIE, SET_COOKIE},
    },
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{Error, validation::FieldError};

/// Bodies longer than this many characters are truncated in the `info` logs.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

const REDACTED: &str = "********";

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] characters, it is
/// truncated and the full body is logged at the `debug` level.
///
/// Cookie headers are redacted since the session cookie is the only thing
/// standing between a client and its transactions.
///
/// Request bodies are read up to axum's default body limit (2 MiB); larger
/// bodies are answered with 413 Payload Too Large without reaching the router.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_bytes = match Bytes::from_request(Request::new(body), &()).await {
        Ok(bytes) => bytes,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            tracing::warn!(
                "Rejected request body for {} {}: {}",
                parts.method,
                parts.uri,
                rejection.body_text()
            );
            return Error::PayloadTooLarge.into_response();
        }
        Err(rejection) => {
            tracing::error!("Could not read request body: {}", rejection.body_text());
            return Error::Validation(vec![FieldError::unattributed(rejection.body_text())])
                .into_response();
        }
    };

    tracing::info!(
        "Received request: {} {}\nheaders: {:?}\nbody: {}",
        parts.method,
        parts.uri,
        redact_cookies(&parts.headers),
        format_body(&body_bytes)
    );
    log_full_body(&body_bytes);

    let request = Request::from_parts(parts, Body::from(body_bytes));
    let response = next.run(request).await;

    // Responses are produced by this server, so they are read without a limit.
    let (parts, body) = response.into_parts();
    let body_bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("Could not read response body: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    tracing::info!(
        "Sending response: {}\nheaders: {:?}\nbody: {}",
        parts.status,
        redact_cookies(&parts.headers),
        format_body(&body_bytes)
    );
    log_full_body(&body_bytes);

    Response::from_parts(parts, Body::from(body_bytes))
}

fn redact_cookies(headers: &HeaderMap) -> HeaderMap {
    let mut headers = headers.clone();

    for name in [COOKIE, SET_COOKIE] {
        if headers.contains_key(&name) {
            headers.insert(name, HeaderValue::from_static(REDACTED));
        }
    }

    headers
}

/// Format `body` for the `info` logs, truncating it to [LOG_BODY_LENGTH_LIMIT] characters.
fn format_body(body: &Bytes) -> String {
    let text = String::from_utf8_lossy(body);

    match text.char_indices().nth(LOG_BODY_LENGTH_LIMIT) {
        Some((end, _)) => format!("{:?}...", &text[..end]),
        None => format!("{text:?}"),
    }
}

fn log_full_body(body: &Bytes) {
    let text = String::from_utf8_lossy(body);

    if text.chars().count() > LOG_BODY_LENGTH_LIMIT {
        tracing::debug!("Full body: {text:?}");
    }
}
