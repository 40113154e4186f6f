//! Document analysis API
//!
//! Accepts extracted document text and returns a structured analysis
//! envelope. The document is truncated before prompting to keep token
//! usage within light-model quotas; the response notes when truncation
//! happened so the frontend can warn the user.

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
pub struct AnalyzeDocumentRequest {
    /// Extracted plain text of the document
    pub content: String,
    pub api_key: String,
}

/// Structured analysis returned to the frontend
#[derive(Serialize)]
pub struct DocumentAnalysis {
    /// The model-generated analysis text
    pub summary: String,
    /// The model that produced the analysis
    pub model: String,
    /// 1-based attempt number on that model
    pub attempt: u32,
    /// Character count of the submitted document before truncation
    pub original_chars: usize,
    /// Whether the document was truncated before analysis
    pub truncated: bool,
    /// Fixed framing notes shown alongside the analysis
    pub key_points: Vec<String>,
    /// Fixed caution notes shown alongside the analysis
    pub risks: Vec<String>,
    /// Fixed follow-up recommendations
    pub recommendations: Vec<String>,
}

#[allow(missing_docs)]
#[derive(Serialize)]
pub struct AnalyzeDocumentResponse {
    pub analysis: DocumentAnalysis,
}

/// POST /api/analyze-document - analyze extracted document text
pub async fn analyze_document(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalyzeDocumentRequest>,
) -> Result<Response, AppError> {
    if request.content.trim().is_empty() {
        return Err(AppError::InvalidRequest(
            "document appears to be empty".to_string(),
        ));
    }
    if request.api_key.is_empty() {
        return Err(AppError::InvalidRequest("api_key is required".to_string()));
    }

    let original_chars = request.content.chars().count();
    let max_chars = state.orchestrator.max_document_chars;

    info!(
        original_chars,
        truncated = original_chars > max_chars,
        "Analyzing document"
    );

    let payload = prompts::document_analysis_request(&request.content, max_chars);
    let result = attempt_completion(&state.http, &state.orchestrator, &request.api_key, &payload)
        .await;

    match result {
        OrchestrationResult::Success {
            text,
            model_used,
            attempt,
        } => {
            let analysis = DocumentAnalysis {
                summary: text,
                model: model_used,
                attempt,
                original_chars,
                truncated: original_chars > max_chars,
                key_points: vec![
                    "Analysis completed".to_string(),
                    "Document processed successfully".to_string(),
                ],
                risks: vec![
                    "Please review AI analysis carefully".to_string(),
                    "This is not legal advice".to_string(),
                ],
                recommendations: vec![
                    "Consult a licensed attorney for important documents".to_string(),
                    "Review all terms before signing".to_string(),
                    "Keep copies of signed documents".to_string(),
                ],
            };
            Ok(Json(AnalyzeDocumentResponse { analysis }).into_response())
        }
        OrchestrationResult::Failure {
            kind,
            message,
            suggestions,
        } => Ok(failure_response(kind, message, suggestions)),
    }
}
