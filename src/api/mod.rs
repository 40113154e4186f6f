//! API module
//!
//! Contains HTTP request handlers for the chat and document-analysis
//! endpoints, plus the shared mapping from orchestration failures to
//! HTTP responses.

pub mod chat;
pub mod documents;

use crate::orchestrator::completion::FailureKind;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Convert a terminal orchestration failure into an HTTP response
///
/// The body always carries the human-readable `error` message, the
/// machine-readable `kind`, and the `suggestions` list. Quota failures
/// additionally set `quota_exceeded` so the frontend can render
/// reset guidance.
pub(crate) fn failure_response(
    kind: FailureKind,
    message: String,
    suggestions: Vec<String>,
) -> Response {
    let status = match kind {
        FailureKind::InvalidCredential => StatusCode::BAD_REQUEST,
        FailureKind::AuthFailed => StatusCode::FORBIDDEN,
        FailureKind::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        FailureKind::Unavailable => StatusCode::NOT_FOUND,
        FailureKind::Transient | FailureKind::NetworkError => StatusCode::BAD_GATEWAY,
    };

    let mut body = json!({
        "error": message,
        "kind": kind,
        "suggestions": suggestions,
    });
    if kind == FailureKind::RateLimited {
        body["quota_exceeded"] = json!(true);
    }

    (status, Json(body)).into_response()
}
