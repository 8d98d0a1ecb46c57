//! Quote routes

use axum::{extract::State, response::IntoResponse};
use std::sync::Arc;

use crate::api::{DataResponse, PrintableText};
use crate::app::AppState;
use crate::engine;
use crate::render;

/// GET /quote
///
/// Derived fresh from the current configuration on every call.
pub async fn get_quote(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let config = state.session.snapshot();
    DataResponse::new(engine::compute(&config))
}

/// GET /quote/print
pub async fn print_quote(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let config = state.session.snapshot();
    let quote = engine::compute(&config);
    let today = chrono::Local::now().date_naive();
    PrintableText(render::print_quote(&config, &quote, today))
}
