//! Prompt and request builders
//!
//! Assembles the domain-specific Gemini request payloads: the legal Q&A
//! chat prompt and the trimmed document-analysis prompt. Payloads are
//! built once per user-initiated call and never mutated afterwards.

use crate::orchestrator::gemini_types::{
    GeminiApiRequest, GenerationConfig, RequestContent, RequestPart, SafetySetting,
};

/// Output-token cap for chat responses
const CHAT_MAX_OUTPUT_TOKENS: u32 = 1024;

/// Output-token cap for document analysis (kept low to save quota)
const DOCUMENT_MAX_OUTPUT_TOKENS: u32 = 512;

/// Build the chat completion request for a user's legal question
pub fn chat_request(message: &str) -> GeminiApiRequest {
    let prompt = format!(
        "You are LegalEase, an AI legal assistant. Your role is to help people understand \
         legal issues in simple, clear language.\n\n\
         IMPORTANT GUIDELINES:\n\
         - Always provide a clear disclaimer that this is informational only, not legal advice\n\
         - Explain legal concepts in plain English\n\
         - Suggest when someone should consult a licensed lawyer\n\
         - Focus on general legal principles and common scenarios\n\
         - Be helpful but emphasize the importance of professional legal counsel for serious matters\n\n\
         User question: {message}\n\n\
         Please provide a helpful, informative response while following the guidelines above."
    );

    GeminiApiRequest {
        contents: vec![RequestContent {
            parts: vec![RequestPart { text: prompt }],
        }],
        generation_config: Some(GenerationConfig {
            temperature: 0.7,
            max_output_tokens: CHAT_MAX_OUTPUT_TOKENS,
            top_p: None,
            top_k: None,
        }),
        safety_settings: None,
    }
}

/// Build the document-analysis request, truncating the document text
///
/// The prompt is deliberately terse and the document capped at
/// `max_chars` characters to minimize token usage on light models.
pub fn document_analysis_request(document_text: &str, max_chars: usize) -> GeminiApiRequest {
    let truncated = truncate_chars(document_text, max_chars);
    let prompt = format!(
        "Legal doc analyzer. Brief analysis with disclaimer.\n\n\
         Doc: {truncated}\n\n\
         Provide: summary, key points, risks, advice. Keep concise."
    );

    GeminiApiRequest {
        contents: vec![RequestContent {
            parts: vec![RequestPart { text: prompt }],
        }],
        generation_config: Some(GenerationConfig {
            temperature: 0.3,
            max_output_tokens: DOCUMENT_MAX_OUTPUT_TOKENS,
            top_p: Some(0.8),
            top_k: Some(10),
        }),
        safety_settings: Some(default_safety_settings()),
    }
}

/// Content-safety thresholds applied to document analysis
fn default_safety_settings() -> Vec<SafetySetting> {
    [
        "HARM_CATEGORY_HARASSMENT",
        "HARM_CATEGORY_HATE_SPEECH",
        "HARM_CATEGORY_SEXUALLY_EXPLICIT",
        "HARM_CATEGORY_DANGEROUS_CONTENT",
    ]
    .iter()
    .map(|category| SafetySetting {
        category: category.to_string(),
        threshold: "BLOCK_MEDIUM_AND_ABOVE".to_string(),
    })
    .collect()
}

/// Truncate to at most `max_chars` characters on a char boundary
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}
