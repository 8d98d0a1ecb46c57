//! Configuration routes
//!
//! Direct edits from the form. Every write replaces the whole
//! configuration and is validated before it is installed.

use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;

use crate::api::DataResponse;
use crate::app::AppState;
use crate::domain::{QuoteSnapshot, ReplaceConfigRequest};
use crate::error::{ApiError, ApiResult};

/// GET /config
pub async fn get_config(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let config = state.session.snapshot();
    DataResponse::new((*config).clone())
}

/// PUT /config
///
/// Replace the configuration wholesale. An omitted `pricing` keeps the
/// policy currently in force.
pub async fn replace_config(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ReplaceConfigRequest>,
) -> ApiResult<impl IntoResponse> {
    let config = state.session.update(|current| req.into_config(current))?;
    tracing::info!(
        m2 = config.m2,
        material = %config.selected_material,
        "Configuration replaced"
    );
    Ok(DataResponse::new(QuoteSnapshot::new(&config)))
}

/// POST /config/reset
pub async fn reset_config(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let config = state.session.reset();
    tracing::info!("Configuration reset to initial values");
    DataResponse::new(QuoteSnapshot::new(&config))
}

/// POST /config/undo
pub async fn undo_config(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    let config = state
        .session
        .undo()
        .ok_or_else(|| ApiError::conflict("Nothing to undo"))?;
    tracing::info!("Configuration change undone");
    Ok(DataResponse::new(QuoteSnapshot::new(&config)))
}
