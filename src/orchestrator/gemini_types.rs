//! Gemini API wire types
//!
//! Structs that mirror the Gemini `generateContent` JSON request, response,
//! and error formats. Used to build request payloads and to deserialize
//! API responses into typed Rust structs.

use serde::{Deserialize, Serialize};

/// `@type` URL identifying a retry hint in an error's detail list
pub const RETRY_INFO_TYPE: &str = "type.googleapis.com/google.rpc.RetryInfo";

/// `@type` URL identifying quota violation details in an error's detail list
pub const QUOTA_FAILURE_TYPE: &str = "type.googleapis.com/google.rpc.QuotaFailure";

/// Request structure for the Gemini `generateContent` endpoint
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GeminiApiRequest {
    /// List of content items to send
    pub contents: Vec<RequestContent>,
    /// Optional generation configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
    /// Optional content-safety thresholds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safety_settings: Option<Vec<SafetySetting>>,
}

/// Content structure for requests
#[derive(Serialize, Debug, Clone)]
pub struct RequestContent {
    /// List of content parts
    pub parts: Vec<RequestPart>,
}

/// A single part for requests (typically text)
#[derive(Serialize, Debug, Clone)]
pub struct RequestPart {
    /// The text content
    pub text: String,
}

/// Generation configuration for requests
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Sampling temperature
    pub temperature: f64,
    /// Maximum number of output tokens to generate
    pub max_output_tokens: u32,
    /// Nucleus sampling bound
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    /// Top-k sampling bound
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
}

/// A single content-safety threshold entry
#[derive(Serialize, Debug, Clone)]
pub struct SafetySetting {
    /// Harm category (e.g., "HARM_CATEGORY_HARASSMENT")
    pub category: String,
    /// Blocking threshold (e.g., "BLOCK_MEDIUM_AND_ABOVE")
    pub threshold: String,
}

/// Top-level Gemini API success response
#[derive(Deserialize, Debug)]
pub struct GeminiApiResponse {
    /// List of candidate responses from the model
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// A single candidate response from the model
#[derive(Deserialize, Debug)]
pub struct Candidate {
    /// The content of this candidate
    pub content: Content,
}

/// Content structure containing parts of the response
#[derive(Deserialize, Debug)]
pub struct Content {
    /// List of content parts (typically one text part)
    pub parts: Vec<Part>,
}

/// A single part of content (typically text)
#[derive(Deserialize, Debug)]
pub struct Part {
    /// The text content of this part
    pub text: String,
}

/// Top-level Gemini API error response
#[derive(Deserialize, Debug)]
pub struct GeminiErrorBody {
    /// The error payload, if the body followed the documented shape
    #[serde(default)]
    pub error: Option<GeminiErrorPayload>,
}

/// Error payload within an error response
#[derive(Deserialize, Debug)]
pub struct GeminiErrorPayload {
    /// Human-readable error message from the provider
    #[serde(default)]
    pub message: Option<String>,
    /// Structured error details (retry hints, quota violations)
    #[serde(default)]
    pub details: Vec<ErrorDetail>,
}

/// A single structured detail entry in an error response
#[derive(Deserialize, Debug)]
pub struct ErrorDetail {
    /// Type URL discriminating the detail shape
    #[serde(rename = "@type", default)]
    pub type_url: String,
    /// Retry delay hint, formatted as "<seconds>s" (RetryInfo details only)
    #[serde(rename = "retryDelay", default)]
    pub retry_delay: Option<String>,
    /// Quota violations (QuotaFailure details only)
    #[serde(default)]
    pub violations: Vec<QuotaViolation>,
}

/// A single quota violation entry
#[derive(Deserialize, Debug)]
pub struct QuotaViolation {
    /// Identifier of the violated quota (e.g., contains "FreeTier")
    #[serde(rename = "quotaId", default)]
    pub quota_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_with_camel_case_keys() {
        let request = GeminiApiRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: "hello".to_string(),
                }],
            }],
            generation_config: Some(GenerationConfig {
                temperature: 0.3,
                max_output_tokens: 512,
                top_p: Some(0.8),
                top_k: Some(10),
            }),
            safety_settings: None,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 512);
        assert_eq!(json["generationConfig"]["topP"], 0.8);
        assert_eq!(json["generationConfig"]["topK"], 10);
        assert!(json.get("safetySettings").is_none());
    }

    #[test]
    fn error_body_parses_retry_info_and_quota_failure() {
        let body = r#"{
            "error": {
                "code": 429,
                "message": "Resource has been exhausted",
                "details": [
                    {
                        "@type": "type.googleapis.com/google.rpc.QuotaFailure",
                        "violations": [{"quotaId": "GenerateRequestsPerDayPerProjectPerModel-FreeTier"}]
                    },
                    {
                        "@type": "type.googleapis.com/google.rpc.RetryInfo",
                        "retryDelay": "14s"
                    }
                ]
            }
        }"#;

        let parsed: GeminiErrorBody = serde_json::from_str(body).unwrap();
        let error = parsed.error.unwrap();
        assert_eq!(error.details.len(), 2);
        assert_eq!(error.details[1].type_url, RETRY_INFO_TYPE);
        assert_eq!(error.details[1].retry_delay.as_deref(), Some("14s"));
        assert_eq!(error.details[0].type_url, QUOTA_FAILURE_TYPE);
        assert_eq!(
            error.details[0].violations[0].quota_id.as_deref(),
            Some("GenerateRequestsPerDayPerProjectPerModel-FreeTier")
        );
    }

    #[test]
    fn error_body_tolerates_unstructured_errors() {
        let parsed: GeminiErrorBody = serde_json::from_str(r#"{"error": {"message": "boom"}}"#).unwrap();
        let error = parsed.error.unwrap();
        assert_eq!(error.message.as_deref(), Some("boom"));
        assert!(error.details.is_empty());
    }
}
