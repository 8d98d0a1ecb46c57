//! Request/response DTOs for the natural-language assistant endpoint.

use serde::{Deserialize, Serialize};

use super::project::ProjectConfig;
use super::quote::QuoteSnapshot;
use super::updates::FieldRejection;

#[derive(Debug, Clone, Deserialize)]
pub struct AssistantRequest {
    pub prompt: String,
}

/// Outcome of one assistant submission.
///
/// When nothing was applied the original prompt is echoed back so the
/// client can offer it for correction and retry.
#[derive(Debug, Clone, Serialize)]
pub struct AssistantResponse {
    pub applied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rejected: Vec<FieldRejection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(flatten)]
    pub snapshot: QuoteSnapshot,
}

impl AssistantResponse {
    pub fn applied(config: &ProjectConfig, rejected: Vec<FieldRejection>) -> Self {
        Self {
            applied: true,
            prompt: None,
            rejected,
            reason: None,
            snapshot: QuoteSnapshot::new(config),
        }
    }

    pub fn unchanged(
        prompt: String,
        config: &ProjectConfig,
        rejected: Vec<FieldRejection>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            applied: false,
            prompt: Some(prompt),
            rejected,
            reason: Some(reason.into()),
            snapshot: QuoteSnapshot::new(config),
        }
    }
}
