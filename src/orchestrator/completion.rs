//! Model-fallback completion orchestrator
//!
//! Attempts to obtain a completion from a ranked list of Gemini models,
//! retrying transient failures with backoff and falling through to the
//! next model when the current one is exhausted or unavailable. Model
//! candidates are tried strictly sequentially so that lighter models are
//! preferred and quota is not wasted on speculative parallel calls.

use crate::orchestrator::config::OrchestratorConfig;
use crate::orchestrator::gemini_types::{
    GeminiApiRequest, GeminiApiResponse, GeminiErrorBody, QUOTA_FAILURE_TYPE, RETRY_INFO_TYPE,
};
use serde::Serialize;
use std::time::Duration;

/// Expected prefix of a Gemini API key
const API_KEY_PREFIX: &str = "AIza";

/// Minimum length of a plausible Gemini API key
const API_KEY_MIN_LENGTH: usize = 35;

/// Machine-readable classification of a terminal orchestration failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Credential failed the local format check; no network call was made
    InvalidCredential,
    /// The provider rejected the credential (401/403)
    AuthFailed,
    /// Quota or rate limits were hit on every candidate
    RateLimited,
    /// No candidate model was accessible (404)
    Unavailable,
    /// Repeated server errors or malformed responses
    Transient,
    /// Transport-level failures reaching the provider
    NetworkError,
}

impl FailureKind {
    /// Precedence used to pick the reported kind when candidates fail
    /// differently. Higher wins, independent of candidate order.
    fn precedence(self) -> u8 {
        match self {
            FailureKind::InvalidCredential => 6,
            FailureKind::AuthFailed => 5,
            FailureKind::RateLimited => 4,
            FailureKind::Unavailable => 3,
            FailureKind::Transient => 2,
            FailureKind::NetworkError => 1,
        }
    }
}

/// Final result of one orchestration invocation
#[derive(Debug)]
pub enum OrchestrationResult {
    /// A model produced generated text
    Success {
        /// The generated text
        text: String,
        /// The model that produced it
        model_used: String,
        /// 1-based attempt number on that model
        attempt: u32,
    },
    /// Every candidate was exhausted, or a terminal failure occurred
    Failure {
        /// Machine-readable failure classification
        kind: FailureKind,
        /// Human-readable, actionable message
        message: String,
        /// Concrete next steps for the caller
        suggestions: Vec<String>,
    },
}

/// Outcome of a single HTTP attempt against one model
#[derive(Debug, PartialEq)]
enum AttemptOutcome {
    /// 2xx with extractable generated text
    Success(String),
    /// 429; carries the provider's retry hint and quota context if present
    RateLimited {
        retry_after_ms: Option<u64>,
        free_tier_quota: bool,
    },
    /// 401 or 403
    AuthFailure,
    /// 404
    ModelUnavailable,
    /// Any other non-success status, or a malformed success body
    TransientServerError,
    /// Transport-level error issuing the request
    NetworkError,
}

/// Check that a credential looks like a Gemini API key before any network I/O
pub fn is_valid_api_key(api_key: &str) -> bool {
    api_key.starts_with(API_KEY_PREFIX) && api_key.len() >= API_KEY_MIN_LENGTH
}

/// Attempt a completion against the ranked model candidates
///
/// Tries each model in `config.models` in order, retrying rate limits and
/// transient errors up to `config.max_retry_attempts` times per model with
/// backoff, and returns the first success or a classified failure after
/// exhausting all candidates.
///
/// Issues at most `models.len() * max_retry_attempts` HTTP calls. Auth
/// failures (401/403) terminate the whole invocation immediately; a 404
/// advances to the next candidate without delay or retry-budget cost.
///
/// # Arguments
/// * `client` - Shared HTTP client (connection pooling)
/// * `config` - Candidate list, retry caps, base delay, API base URL
/// * `api_key` - Gemini API key; format-checked before any network call
/// * `request` - Fully-built request payload
pub async fn attempt_completion(
    client: &reqwest::Client,
    config: &OrchestratorConfig,
    api_key: &str,
    request: &GeminiApiRequest,
) -> OrchestrationResult {
    if !is_valid_api_key(api_key) {
        tracing::warn!("API key failed format check, skipping all network calls");
        return failure(FailureKind::InvalidCredential, false);
    }

    // Highest-precedence classification observed across all candidates
    let mut worst: Option<FailureKind> = None;
    let mut free_tier_quota = false;

    for model in &config.models {
        let mut retry_count: u32 = 0;

        while retry_count < config.max_retry_attempts {
            tracing::debug!(model = %model, attempt = retry_count + 1, "Trying model");

            let outcome = try_model(client, config, api_key, request, model).await;
            match outcome {
                AttemptOutcome::Success(text) => {
                    tracing::info!(
                        model = %model,
                        attempt = retry_count + 1,
                        response_len = text.len(),
                        "Completion succeeded"
                    );
                    return OrchestrationResult::Success {
                        text,
                        model_used: model.clone(),
                        attempt: retry_count + 1,
                    };
                }
                AttemptOutcome::RateLimited {
                    retry_after_ms,
                    free_tier_quota: free_tier,
                } => {
                    record_failure(&mut worst, FailureKind::RateLimited);
                    free_tier_quota |= free_tier;

                    if retry_count + 1 < config.max_retry_attempts {
                        let delay_ms = rate_limited_backoff_ms(
                            config.base_retry_delay_ms,
                            retry_count,
                            retry_after_ms,
                        );
                        tracing::warn!(
                            model = %model,
                            delay_ms,
                            "Rate limited, waiting before retry"
                        );
                        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                        retry_count += 1;
                    } else {
                        tracing::warn!(model = %model, "Max retries reached, trying next model");
                        break;
                    }
                }
                AttemptOutcome::AuthFailure => {
                    // Credentials are bad for every model; nothing left to try
                    tracing::error!(model = %model, "Authentication error, stopping retries");
                    record_failure(&mut worst, FailureKind::AuthFailed);
                    return failure(FailureKind::AuthFailed, free_tier_quota);
                }
                AttemptOutcome::ModelUnavailable => {
                    tracing::warn!(model = %model, "Model not available, trying next model");
                    record_failure(&mut worst, FailureKind::Unavailable);
                    break;
                }
                outcome @ (AttemptOutcome::TransientServerError | AttemptOutcome::NetworkError) => {
                    let kind = if matches!(outcome, AttemptOutcome::NetworkError) {
                        FailureKind::NetworkError
                    } else {
                        FailureKind::Transient
                    };
                    record_failure(&mut worst, kind);

                    if retry_count + 1 < config.max_retry_attempts {
                        let delay_ms =
                            transient_backoff_ms(config.base_retry_delay_ms, retry_count);
                        tracing::warn!(
                            model = %model,
                            delay_ms,
                            "Server or network error, waiting before retry"
                        );
                        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                        retry_count += 1;
                    } else {
                        tracing::warn!(model = %model, "Max retries reached, trying next model");
                        break;
                    }
                }
            }
        }
    }

    let kind = worst.unwrap_or(FailureKind::Transient);
    tracing::error!(kind = ?kind, "All models failed");
    failure(kind, free_tier_quota)
}

/// Issue one HTTP call against one model and classify the result
async fn try_model(
    client: &reqwest::Client,
    config: &OrchestratorConfig,
    api_key: &str,
    request: &GeminiApiRequest,
    model: &str,
) -> AttemptOutcome {
    let url = format!(
        "{}/models/{}:generateContent?key={}",
        config.api_base_url, model, api_key
    );

    let response = match client.post(&url).json(request).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(model = %model, error = %e, "Network error calling Gemini API");
            return AttemptOutcome::NetworkError;
        }
    };

    let status = response.status().as_u16();
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!(model = %model, error = %e, "Failed to read response body");
            return AttemptOutcome::NetworkError;
        }
    };

    if (200..300).contains(&status) {
        return match extract_text(&body) {
            Some(text) => AttemptOutcome::Success(text),
            None => {
                tracing::warn!(model = %model, "Response contained no generated text");
                AttemptOutcome::TransientServerError
            }
        };
    }

    tracing::warn!(model = %model, status_code = status, "Gemini API returned error status");
    classify_error(status, &body)
}

/// Extract the generated text from a 2xx response body
fn extract_text(body: &str) -> Option<String> {
    let parsed: GeminiApiResponse = serde_json::from_str(body).ok()?;
    let text = &parsed.candidates.first()?.content.parts.first()?.text;
    if text.is_empty() {
        return None;
    }
    Some(text.clone())
}

/// Classify a non-success HTTP status plus its error body
fn classify_error(status: u16, body: &str) -> AttemptOutcome {
    match status {
        429 => {
            let parsed: Option<GeminiErrorBody> = serde_json::from_str(body).ok();
            AttemptOutcome::RateLimited {
                retry_after_ms: parsed.as_ref().and_then(retry_delay_hint_ms),
                free_tier_quota: parsed.as_ref().map(has_free_tier_violation).unwrap_or(false),
            }
        }
        401 | 403 => AttemptOutcome::AuthFailure,
        404 => AttemptOutcome::ModelUnavailable,
        _ => AttemptOutcome::TransientServerError,
    }
}

/// Pull the structured RetryInfo delay hint out of an error body, if any
fn retry_delay_hint_ms(body: &GeminiErrorBody) -> Option<u64> {
    let details = &body.error.as_ref()?.details;
    let retry_info = details.iter().find(|d| d.type_url == RETRY_INFO_TYPE)?;
    parse_retry_delay_ms(retry_info.retry_delay.as_deref()?)
}

/// Parse a provider delay hint like "1.5s" into whole milliseconds, rounding up
fn parse_retry_delay_ms(hint: &str) -> Option<u64> {
    let seconds: f64 = hint.strip_suffix('s')?.parse().ok()?;
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }
    Some((seconds * 1000.0).ceil() as u64)
}

/// True if any QuotaFailure violation names a free-tier quota
fn has_free_tier_violation(body: &GeminiErrorBody) -> bool {
    let Some(error) = body.error.as_ref() else {
        return false;
    };
    error
        .details
        .iter()
        .filter(|d| d.type_url == QUOTA_FAILURE_TYPE)
        .flat_map(|d| d.violations.iter())
        .any(|v| v.quota_id.as_deref().is_some_and(|id| id.contains("FreeTier")))
}

/// Backoff for a 429: the provider hint verbatim, else linear in the attempt
fn rate_limited_backoff_ms(base_ms: u64, retry_count: u32, hint_ms: Option<u64>) -> u64 {
    hint_ms.unwrap_or(base_ms * (u64::from(retry_count) + 1))
}

/// Exponential backoff for server and network errors
fn transient_backoff_ms(base_ms: u64, retry_count: u32) -> u64 {
    base_ms * 2u64.pow(retry_count)
}

/// Keep the highest-precedence failure kind observed so far
fn record_failure(worst: &mut Option<FailureKind>, kind: FailureKind) {
    if worst.map_or(true, |current| kind.precedence() > current.precedence()) {
        *worst = Some(kind);
    }
}

/// Build the terminal failure for a classification, with guidance text
fn failure(kind: FailureKind, free_tier_quota: bool) -> OrchestrationResult {
    let (message, suggestions) = match kind {
        FailureKind::InvalidCredential => (
            "Invalid Gemini API key format.".to_string(),
            vec![
                "Keys start with \"AIza\" and are at least 35 characters long".to_string(),
                "Copy the full key from https://aistudio.google.com/".to_string(),
            ],
        ),
        FailureKind::AuthFailed => (
            "API key is invalid or doesn't have permission. Please check your Gemini API key."
                .to_string(),
            vec![
                "Verify the key at https://aistudio.google.com/".to_string(),
                "Make sure the Generative Language API is enabled for your project".to_string(),
            ],
        ),
        FailureKind::RateLimited => {
            let mut message = "You've exceeded your Gemini API quota limits.".to_string();
            if free_tier_quota {
                message.push_str(
                    " You're on the free tier and have hit your daily limits. \
                     Consider upgrading to a paid plan or wait for the quota to reset.",
                );
            }
            (
                message,
                vec![
                    "Wait for quota reset (daily limits reset at midnight PT)".to_string(),
                    "Upgrade to paid tier at https://aistudio.google.com/".to_string(),
                    "Try analyzing smaller documents".to_string(),
                    "Try again in a few minutes".to_string(),
                ],
            )
        }
        FailureKind::Unavailable => (
            "None of the Gemini models are accessible. This might be a regional availability issue."
                .to_string(),
            vec![
                "Check model availability for your region".to_string(),
                "Try again later".to_string(),
            ],
        ),
        FailureKind::Transient => (
            "The Gemini API returned repeated server errors. Please try again.".to_string(),
            vec!["Try again in a few minutes".to_string()],
        ),
        FailureKind::NetworkError => (
            "Could not reach the Gemini API. Please check your connection and try again."
                .to_string(),
            vec![
                "Check your network connection".to_string(),
                "Try again in a few minutes".to_string(),
            ],
        ),
    };

    OrchestrationResult::Failure {
        kind,
        message,
        suggestions,
    }
}
