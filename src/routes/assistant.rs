//! Natural-language assistant endpoint.
//!
//! Forwards free text to the interpreter, sanitizes what comes back and
//! merges it into the current configuration. Anything short of a usable
//! update leaves the configuration alone and hands the prompt back.

use axum::{extract::State, http::HeaderMap, response::IntoResponse, Json};
use std::sync::Arc;

use crate::api::DataResponse;
use crate::app::AppState;
use crate::domain::{AssistantRequest, AssistantResponse};
use crate::engine::merge;
use crate::error::{ApiError, ApiResult};
use crate::middleware::request_id;

/// POST /assistant
pub async fn submit_instruction(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<AssistantRequest>,
) -> ApiResult<impl IntoResponse> {
    if req.prompt.trim().is_empty() {
        return Err(ApiError::bad_request("prompt must not be empty"));
    }

    let _slot = state
        .session
        .begin_interpretation()
        .ok_or_else(|| ApiError::conflict("Another instruction is still being processed"))?;

    let request_id = request_id(&headers);
    let snapshot = state.session.snapshot();

    let update = match state.interpreter.interpret(req.prompt.trim(), &snapshot).await {
        Ok(update) => update,
        Err(e) => {
            tracing::warn!(
                error = %e,
                request_id = ?request_id,
                "Interpreter produced no usable update"
            );
            return Ok(DataResponse::new(AssistantResponse::unchanged(
                req.prompt,
                &state.session.snapshot(),
                Vec::new(),
                "The assistant could not interpret the instruction",
            )));
        }
    };

    let (update, rejected) = update.sanitize();
    for rejection in &rejected {
        tracing::warn!(
            field = rejection.field,
            reason = %rejection.reason,
            request_id = ?request_id,
            "Dropped interpreter field"
        );
    }

    // Nothing survived sanitization, or the merge left the configuration as it was
    let merged = if update.is_empty() {
        None
    } else {
        state
            .session
            .update_if(|current| Some(merge(current, &update, &req.prompt)))?
    };
    let Some(config) = merged else {
        return Ok(DataResponse::new(AssistantResponse::unchanged(
            req.prompt,
            &state.session.snapshot(),
            rejected,
            "No applicable changes were found",
        )));
    };

    tracing::info!(
        request_id = ?request_id,
        m2 = config.m2,
        material = %config.selected_material,
        dropped = rejected.len(),
        "Assistant update applied"
    );

    Ok(DataResponse::new(AssistantResponse::applied(&config, rejected)))
}
