//! Deadline-bounded generation.
//!
//! `generate` is the only way the answer pipeline talks to a model. It never
//! returns an error: every failure is folded into [`Generation::Unavailable`]
//! so callers can fall back to raw excerpts.

use crate::client::{LlmClient, LlmRequest};
use docqa_core::AppError;
use std::fmt;
use std::time::Duration;

/// Outcome of one generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generation {
    /// The model answered with non-empty text.
    Text(String),
    /// The model could not be used for this request.
    Unavailable(Unavailable),
}

/// Why the model could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unavailable {
    /// The deadline expired before the model answered.
    TimedOut,
    /// The backend could not be reached or answered with an error.
    Unreachable(String),
    /// The backend answered with no text.
    EmptyResponse,
}

impl Unavailable {
    /// User-facing notice shown in front of the fallback excerpts.
    pub fn message(&self) -> &'static str {
        match self {
            Self::TimedOut => {
                "⚠️ Local AI summarization timed out on this machine. \
                 The system will fall back to showing the most relevant document excerpts."
            }
            Self::Unreachable(_) => {
                "⚠️ Unable to reach the local AI service (Ollama). Please ensure Ollama is running."
            }
            Self::EmptyResponse => "⚠️ Local AI did not return a response.",
        }
    }
}

impl fmt::Display for Unavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TimedOut => f.write_str("timed out"),
            Self::Unreachable(reason) => write!(f, "unreachable: {}", reason),
            Self::EmptyResponse => f.write_str("empty response"),
        }
    }
}

/// Run one completion with a hard deadline.
///
/// # Arguments
/// * `client` - Generation backend
/// * `request` - Fully built request
/// * `timeout` - Deadline for the whole call, including reading the body
pub async fn generate(client: &dyn LlmClient, request: &LlmRequest, timeout: Duration) -> Generation {
    tracing::debug!(
        provider = client.provider_name(),
        timeout_secs = timeout.as_secs_f64(),
        "Starting generation"
    );

    let outcome = match tokio::time::timeout(timeout, client.complete(request)).await {
        Err(_) => Generation::Unavailable(Unavailable::TimedOut),
        Ok(Err(AppError::Timeout(_))) => Generation::Unavailable(Unavailable::TimedOut),
        Ok(Err(e)) => Generation::Unavailable(Unavailable::Unreachable(e.to_string())),
        Ok(Ok(response)) if response.content.trim().is_empty() => {
            Generation::Unavailable(Unavailable::EmptyResponse)
        }
        Ok(Ok(response)) => Generation::Text(response.content),
    };

    if let Generation::Unavailable(ref reason) = outcome {
        tracing::warn!(
            provider = client.provider_name(),
            reason = %reason,
            "Generation unavailable, falling back to excerpts"
        );
    }

    outcome
}
