//! Application state management
//!
//! Shared state handed to every request handler: the pooled HTTP client
//! and the immutable orchestrator configuration. Nothing here is mutated
//! after startup, so handlers share it behind a plain `Arc`.

use crate::orchestrator::config::OrchestratorConfig;

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Shared HTTP client (connection pooling across requests)
    pub http: reqwest::Client,
    /// Orchestrator configuration (model candidates, retry caps, delays)
    pub orchestrator: OrchestratorConfig,
}

impl AppState {
    /// Create state with the default orchestrator configuration
    pub fn new() -> Self {
        Self::with_config(OrchestratorConfig::default())
    }

    /// Create state with a custom orchestrator configuration
    pub fn with_config(orchestrator: OrchestratorConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            orchestrator,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
