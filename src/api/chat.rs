//! Chat API
//!
//! Provides the legal Q&A chat endpoint. Flow: user message -> prompt
//! builder -> completion orchestrator (model fallback + retries) ->
//! response. The conversation itself is stateless on the server; the
//! frontend carries history.

use axum::{extract::State, response::IntoResponse, response::Response, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::api::failure_response;
use crate::error::AppError;
use crate::orchestrator::completion::{attempt_completion, OrchestrationResult};
use crate::orchestrator::prompts;
use crate::state::AppState;

#[allow(missing_docs)]
#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub api_key: String,
}

#[allow(missing_docs)]
#[derive(Serialize)]
pub struct ChatResponse {
    pub response: String,
    /// The model that produced the response
    pub model: String,
    /// 1-based attempt number on that model
    pub attempt: u32,
}

/// POST /api/chat - answer a legal question in plain language
///
/// Validates the request, wraps the question in the assistant prompt,
/// and runs the completion orchestrator. Failures come back as the
/// kind-specific status with guidance text; partial per-model failures
/// are never surfaced individually.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Response, AppError> {
    if request.message.trim().is_empty() {
        return Err(AppError::InvalidRequest("message is required".to_string()));
    }
    if request.api_key.is_empty() {
        return Err(AppError::InvalidRequest("api_key is required".to_string()));
    }

    info!(message_len = request.message.len(), "Chat request received");

    let payload = prompts::chat_request(&request.message);
    let result = attempt_completion(&state.http, &state.orchestrator, &request.api_key, &payload)
        .await;

    match result {
        OrchestrationResult::Success {
            text,
            model_used,
            attempt,
        } => Ok(Json(ChatResponse {
            response: text,
            model: model_used,
            attempt,
        })
        .into_response()),
        OrchestrationResult::Failure {
            kind,
            message,
            suggestions,
        } => Ok(failure_response(kind, message, suggestions)),
    }
}
