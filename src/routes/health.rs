use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub services: ServiceHealth,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceHealth {
    pub quote_engine: String,
    pub interpreter: String,
    pub interpreter_busy: bool,
}

/// Health check endpoint
///
/// Quoting works without the interpreter, so a failing interpreter only
/// degrades the service. Interpreter reachability comes from a cached
/// check that is refreshed once it expires.
pub async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let reachable = state
        .interpreter_health
        .check(state.interpreter.as_ref())
        .await;

    let status = if reachable { "healthy" } else { "degraded" };

    (
        StatusCode::OK,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            services: ServiceHealth {
                quote_engine: "ok".to_string(),
                interpreter: if reachable { "ok" } else { "error" }.to_string(),
                interpreter_busy: state.session.is_interpreting(),
            },
        }),
    )
}
