//! Global fallback that renders framework-level errors as JSON.
//!
//! Handlers build their own error envelopes through `AppError`. Anything else
//! that leaves the router with an error status and a non-JSON body (unknown
//! routes, wrong methods, extractor rejections, timeouts) is rewritten here.

use crate::api::models::ErrorResponse;
use axum::{
    body::to_bytes,
    http::{header, HeaderValue, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use tracing::warn;

/// Largest framework error body we read back to reuse as a description.
const MAX_ERROR_BODY: usize = 64 * 1024;

/// Router fallback for unmatched paths.
pub async fn not_found_handler(uri: Uri) -> Response {
    warn!(path = %uri.path(), "No route matched");
    StatusCode::NOT_FOUND.into_response()
}

/// `map_response` middleware converting error responses to `{code, name, description}`.
pub async fn json_error_envelope(response: Response) -> Response {
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) || is_json(&response) {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let text = match to_bytes(body, MAX_ERROR_BODY).await {
        Ok(bytes) => String::from_utf8_lossy(&bytes).trim().to_string(),
        Err(_) => String::new(),
    };

    let envelope = ErrorResponse {
        code: status.as_u16(),
        name: status.canonical_reason().unwrap_or("Unknown Error").to_string(),
        description: describe(status, text),
    };

    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );

    Response::from_parts(parts, Json(envelope).into_response().into_body())
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"))
}

/// Framework body text when present, otherwise a stock explanation.
fn describe(status: StatusCode, text: String) -> String {
    if !text.is_empty() {
        return text;
    }

    match status {
        StatusCode::NOT_FOUND => "The requested URL was not found on the server. If you entered the URL manually please check your spelling and try again.".to_string(),
        StatusCode::METHOD_NOT_ALLOWED => "The method is not allowed for the requested URL.".to_string(),
        StatusCode::REQUEST_TIMEOUT => "The server closed the network connection because the request took too long to process.".to_string(),
        StatusCode::PAYLOAD_TOO_LARGE => "The data value transmitted exceeds the capacity limit.".to_string(),
        StatusCode::UNSUPPORTED_MEDIA_TYPE => "The server does not support the media type transmitted in the request.".to_string(),
        StatusCode::INTERNAL_SERVER_ERROR => "The server encountered an internal error and was unable to complete your request.".to_string(),
        _ => status.canonical_reason().unwrap_or("Unknown Error").to_string(),
    }
}
