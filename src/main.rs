mod api;
mod app;
mod config;
mod domain;
mod engine;
mod error;
mod logging;
mod middleware;
mod render;
mod routes;
mod services;

use anyhow::Result;
use std::sync::Arc;

use domain::ProjectConfig;
use services::{AiClient, QuoteSession};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let settings = config::Settings::from_env()?;

    // Initialize logging
    logging::init_logging(&settings);

    tracing::info!(
        env = ?settings.env,
        server_addr = %settings.server_addr,
        sealer_line = ?settings.pricing.sealer_line,
        labor_mode = ?settings.pricing.labor_mode,
        "Starting quote service"
    );

    // Create interpreter client
    let ai_client = AiClient::new(
        &settings.gemini_api_url,
        &settings.gemini_api_key,
        &settings.gemini_model,
        settings.ai_service_timeout_seconds,
    )?;

    let session = QuoteSession::new(
        ProjectConfig::initial(settings.pricing),
        settings.undo_history_limit,
    )?;

    // Create application state
    let server_addr = settings.server_addr.clone();
    let state = app::AppState::new(settings, session, Arc::new(ai_client));

    // Check interpreter reachability without blocking startup; the result
    // seeds the health cache
    tokio::spawn({
        let state = state.clone();
        async move {
            if state.interpreter_health.check(state.interpreter.as_ref()).await {
                tracing::info!("Interpreter is reachable");
            } else {
                tracing::warn!("Interpreter unreachable - quoting still available");
            }
        }
    });

    // Build application
    let app = app::create_app(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&server_addr).await?;
    tracing::info!("Listening on {}", server_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
