//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::{Method, StatusCode, header::CONTENT_TYPE},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// The maximum number of characters of a body that are logged at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Form fields whose values must never be written to the logs.
const REDACTED_FIELDS: [&str; 2] = ["password", "confirm_password"];

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] characters, it is
/// truncated and the full body is logged at the `debug` level.
/// Password fields in submitted forms are redacted.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("Could not read request body: {error}");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    let body_text = String::from_utf8_lossy(&body_bytes);

    if is_form_submission(&parts) {
        log_request(&parts, &redact_form_fields(&body_text));
    } else {
        log_request(&parts, &body_text);
    }

    let request = Request::from_parts(parts, Body::from(body_bytes));
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("Could not read response body: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    log_response(&parts, &body_bytes);

    Response::from_parts(parts, Body::from(body_bytes))
}

fn is_form_submission(parts: &axum::http::request::Parts) -> bool {
    let is_form = parts
        .headers
        .get(CONTENT_TYPE)
        .and_then(|content_type| content_type.to_str().ok())
        .is_some_and(|content_type| content_type.starts_with("application/x-www-form-urlencoded"));

    is_form && (parts.method == Method::POST || parts.method == Method::PUT)
}

/// Replace the values of password fields in a URL encoded form.
///
/// Bodies that cannot be parsed as a form are replaced entirely, since they
/// may still contain a password.
fn redact_form_fields(form_text: &str) -> String {
    let Ok(fields) = serde_urlencoded::from_str::<Vec<(String, String)>>(form_text) else {
        return "<unparseable form>".to_owned();
    };

    let fields = fields
        .into_iter()
        .map(|(name, value)| {
            if REDACTED_FIELDS.contains(&name.as_str()) {
                (name, "********".to_owned())
            } else {
                (name, value)
            }
        })
        .collect::<Vec<_>>();

    serde_urlencoded::to_string(fields).unwrap_or_else(|_| "<unparseable form>".to_owned())
}

/// The first [LOG_BODY_LENGTH_LIMIT] characters of `body`, or `None` if it is short enough to log in full.
fn truncate_body(body: &str) -> Option<&str> {
    body.char_indices()
        .nth(LOG_BODY_LENGTH_LIMIT)
        .map(|(end, _)| &body[..end])
}

fn log_request(parts: &axum::http::request::Parts, body: &str) {
    match truncate_body(body) {
        Some(truncated) => {
            tracing::info!("Received request: {parts:#?}\nbody: {truncated}...");
            tracing::debug!("Full request body: {body:?}");
        }
        None => tracing::info!("Received request: {parts:#?}\nbody: {body:?}"),
    }
}

fn log_response(parts: &axum::http::response::Parts, body: &Bytes) {
    let is_text = parts
        .headers
        .get(CONTENT_TYPE)
        .and_then(|content_type| content_type.to_str().ok())
        .is_none_or(|content_type| {
            content_type.starts_with("text/") || content_type.starts_with("application/json")
        });

    if !is_text {
        tracing::info!("Sending response: {parts:#?}\nbody: <{} bytes>", body.len());
        return;
    }

    let body = String::from_utf8_lossy(body);

    match truncate_body(&body) {
        Some(truncated) => {
            tracing::info!("Sending response: {parts:#?}\nbody: {truncated}...");
            tracing::debug!("Full response body: {body:?}");
        }
        None => tracing::info!("Sending response: {parts:#?}\nbody: {body:?}"),
    }
}
