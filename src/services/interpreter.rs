//! Contract for the natural-language interpreter.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::domain::{PartialUpdate, ProjectConfig};

#[derive(Debug, Error)]
pub enum InterpreterError {
    #[error("interpreter unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("interpreter returned {status}: {message}")]
    Status {
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("interpreter returned no content")]
    EmptyResponse,

    #[error("interpreter returned unusable JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Turns free text into a sparse configuration update.
///
/// Implementations send the instruction together with the current
/// configuration and return whatever fields the model produced. The
/// result is untrusted and must be sanitized before it is merged.
#[async_trait]
pub trait Interpreter: Send + Sync {
    async fn interpret(
        &self,
        instruction: &str,
        current: &ProjectConfig,
    ) -> Result<PartialUpdate, InterpreterError>;

    async fn health_check(&self) -> Result<(), InterpreterError>;
}

/// Remembers the last reachability check so health polling does not hit
/// the interpreter on every request.
pub struct HealthCache {
    ttl: Duration,
    last: Mutex<Option<(Instant, bool)>>,
}

impl HealthCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            last: Mutex::new(None),
        }
    }

    /// Last result, if it is younger than the TTL.
    pub fn cached(&self) -> Option<bool> {
        let last = *self.last.lock();
        last.filter(|(at, _)| at.elapsed() < self.ttl)
            .map(|(_, reachable)| reachable)
    }

    pub fn record(&self, reachable: bool) {
        *self.last.lock() = Some((Instant::now(), reachable));
    }

    /// Returns the cached result, or checks the interpreter and caches it.
    pub async fn check(&self, interpreter: &dyn Interpreter) -> bool {
        if let Some(reachable) = self.cached() {
            return reachable;
        }

        let reachable = match interpreter.health_check().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Interpreter health check failed");
                false
            }
        };
        self.record(reachable);
        reachable
    }
}

/// Strips an optional Markdown code fence around a JSON payload.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = match rest.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => &rest[4..],
        _ => rest,
    };
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Parses the model's text output into an update.
pub fn parse_update(text: &str) -> Result<PartialUpdate, InterpreterError> {
    let payload = strip_code_fence(text);
    if payload.is_empty() {
        return Err(InterpreterError::EmptyResponse);
    }
    Ok(serde_json::from_str(payload)?)
}
