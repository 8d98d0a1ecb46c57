//! Gemini client for the natural-language interpreter.
//!
//! Sends the user's instruction plus the current configuration to the
//! `generateContent` endpoint, asking for a JSON object restricted to the
//! recognized update fields.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, error, instrument};

use super::interpreter::{parse_update, InterpreterError, Interpreter};
use crate::domain::{PartialUpdate, ProjectConfig};

/// Client for the Gemini REST API.
#[derive(Clone)]
pub struct AiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

/// Error body returned by the API.
#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .find_map(|part| part.text)
    }
}

/// Fields the model may return, mirrored from [`PartialUpdate`].
fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "m2": { "type": "NUMBER" },
            "selectedMaterial": {
                "type": "STRING",
                "enum": ["Impermeabilizante", "Pintura", "Sellador"]
            },
            "yield": { "type": "NUMBER" },
            "price": { "type": "NUMBER" },
            "brand": { "type": "STRING" },
            "auxMaterialRate": { "type": "NUMBER" },
            "profitRate": { "type": "NUMBER" },
            "numWorkers": { "type": "NUMBER" },
            "workerDailyRate": { "type": "NUMBER" },
            "workDays": { "type": "NUMBER" },
            "scaffoldCount": { "type": "NUMBER" },
            "scaffoldDailyRate": { "type": "NUMBER" },
            "scaffoldDays": { "type": "NUMBER" },
            "masonryRepairEnabled": { "type": "BOOLEAN" },
            "masonryRepairCost": { "type": "NUMBER" },
            "addWorker": {
                "type": "OBJECT",
                "properties": {
                    "name": { "type": "STRING" },
                    "dailyRate": { "type": "NUMBER" }
                }
            },
            "removeWorker": { "type": "STRING" }
        }
    })
}

fn system_instruction(current: &ProjectConfig) -> Result<String, InterpreterError> {
    let context = serde_json::to_string(current)?;
    Ok(format!(
        r#"Eres un asistente experto de la empresa "Renueva Koba".
Tu tarea es extraer cambios de configuración de un mensaje del usuario.
Regresa un objeto JSON solo con los campos que cambian.

REGLA IMPORTANTE: Para impermeabilizante, el rendimiento estándar es de 34 m2 por cubeta.

Campos posibles:
- m2: número (superficie a cubrir)
- selectedMaterial: "Impermeabilizante" | "Pintura" | "Sellador"
- yield: número (rendimiento del material, m2 por cubeta)
- price: número (precio por cubeta)
- brand: string (marca del material)
- auxMaterialRate: número (material auxiliar por cada 100 m2)
- profitRate: número (utilidad por cada m2)
- numWorkers: número entero
- workerDailyRate: número
- workDays: número entero
- scaffoldCount: número entero (cantidad de andamios, 0 si no se usan)
- scaffoldDailyRate: número (costo por día por andamio)
- scaffoldDays: número entero (días de renta)
- masonryRepairEnabled: boolean (si requiere reparaciones de albañilería)
- masonryRepairCost: número (costo total de las reparaciones)
- addWorker: {{ name, dailyRate }} (agregar trabajador a la cuadrilla)
- removeWorker: string (id o nombre del trabajador a quitar)

Contexto actual: {}"#,
        context
    ))
}

impl AiClient {
    /// Create a new interpreter client.
    pub fn new(base_url: &str, api_key: &str, model: &str, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        tracing::info!(base_url = base_url, model = model, "AI client initialized");

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }

    fn model_url(&self) -> String {
        format!("{}/v1beta/models/{}", self.base_url, self.model)
    }

    async fn error_from(response: reqwest::Response) -> InterpreterError {
        let status = response.status();
        let message = response
            .json::<ApiErrorEnvelope>()
            .await
            .map(|e| e.error.message)
            .unwrap_or_else(|_| format!("AI service error: {}", status));

        error!(status = %status, message = %message, "AI service error");
        InterpreterError::Status { status, message }
    }
}

#[async_trait]
impl Interpreter for AiClient {
    #[instrument(skip(self, instruction, current))]
    async fn interpret(
        &self,
        instruction: &str,
        current: &ProjectConfig,
    ) -> Result<PartialUpdate, InterpreterError> {
        let system = system_instruction(current)?;
        let body = GenerateRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part { text: &system }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: instruction }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: response_schema(),
            },
        };

        let url = format!("{}:generateContent", self.model_url());
        debug!(url = %url, "AI service request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "AI service request failed");
                InterpreterError::Transport(e)
            })?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let text = response
            .json::<GenerateResponse>()
            .await?
            .first_text()
            .ok_or(InterpreterError::EmptyResponse)?;

        debug!(chars = text.len(), "AI service response received");
        parse_update(&text)
    }

    async fn health_check(&self) -> Result<(), InterpreterError> {
        let response = self
            .client
            .get(self.model_url())
            .header("x-goog-api-key", &self.api_key)
            .timeout(Duration::from_secs(5))
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::error_from(response).await)
        }
    }
}
