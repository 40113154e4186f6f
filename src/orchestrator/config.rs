//! Orchestrator configuration
//!
//! Centralized configuration for the completion orchestrator. Passed
//! explicitly into the orchestration call rather than read from globals,
//! so concurrent invocations (and tests) can use different settings.

use serde::Serialize;

/// Orchestrator configuration
#[derive(Debug, Clone, Serialize)]
pub struct OrchestratorConfig {
    /// Ranked model candidates, cheapest/lightest-quota first
    pub models: Vec<String>,
    /// Maximum attempts per model before falling through to the next
    pub max_retry_attempts: u32,
    /// Base backoff delay in milliseconds
    pub base_retry_delay_ms: u64,
    /// Gemini API base URL
    pub api_base_url: String,
    /// Maximum document characters sent for analysis
    pub max_document_chars: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            // Lightest models first to conserve quota
            models: vec![
                "gemini-2.5-flash-lite".to_string(),
                "gemini-2.0-flash-lite".to_string(),
                "gemini-2.0-flash-lite-001".to_string(),
                "gemini-2.5-flash".to_string(),
                "gemini-2.0-flash".to_string(),
                "gemini-2.0-flash-001".to_string(),
                "gemini-1.5-flash-latest".to_string(),
                "gemini-1.5-flash".to_string(),
            ],
            max_retry_attempts: 3,
            base_retry_delay_ms: 2000,
            api_base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            max_document_chars: 4000,
        }
    }
}
