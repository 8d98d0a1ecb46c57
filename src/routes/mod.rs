pub mod assistant;
pub mod config;
pub mod health;
pub mod materials;
pub mod quote;
pub mod workers;

use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::app::AppState;

/// Build the API router with all routes
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health_check))
        // Configuration
        .route(
            "/config",
            get(config::get_config).put(config::replace_config),
        )
        .route("/config/reset", post(config::reset_config))
        .route("/config/undo", post(config::undo_config))
        // Quote
        .route("/quote", get(quote::get_quote))
        .route("/quote/print", get(quote::print_quote))
        // Natural-language assistant
        .route("/assistant", post(assistant::submit_instruction))
        // Material presets
        .route("/materials/presets", get(materials::list_presets))
        .route("/materials/:material/preset", post(materials::apply_preset))
        // Crew roster
        .route("/workers", post(workers::add_worker))
        .route("/workers/:worker", delete(workers::delete_worker))
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::app::{create_app, AppState};
    use crate::config::{Environment, LogFormat, Settings};
    use crate::domain::{LaborMode, PartialUpdate, PricingPolicy, ProjectConfig, SealerLine};
    use crate::services::{Interpreter, InterpreterError, QuoteSession};

    /// Replies with a fixed JSON update, or fails when `reply` is `None`.
    struct StubInterpreter {
        reply: Option<Value>,
        healthy: bool,
    }

    #[async_trait]
    impl Interpreter for StubInterpreter {
        async fn interpret(
            &self,
            _instruction: &str,
            _current: &ProjectConfig,
        ) -> Result<PartialUpdate, InterpreterError> {
            match &self.reply {
                Some(value) => Ok(serde_json::from_value(value.clone())?),
                None => Err(InterpreterError::EmptyResponse),
            }
        }

        async fn health_check(&self) -> Result<(), InterpreterError> {
            if self.healthy {
                Ok(())
            } else {
                Err(InterpreterError::EmptyResponse)
            }
        }
    }

    fn test_settings() -> Settings {
        Settings {
            env: Environment::Dev,
            server_addr: "127.0.0.1:0".to_string(),
            log_format: LogFormat::Compact,
            cors_allow_origins: vec!["http://localhost:3000".to_string()],
            gemini_api_url: "http://localhost:9".to_string(),
            gemini_api_key: "test".to_string(),
            gemini_model: "test-model".to_string(),
            ai_service_timeout_seconds: 1,
            interpreter_health_ttl_seconds: 60,
            pricing: PricingPolicy::default(),
            undo_history_limit: 10,
        }
    }

    fn test_state(reply: Option<Value>) -> Arc<AppState> {
        let settings = test_settings();
        let session = QuoteSession::new(
            ProjectConfig::initial(settings.pricing),
            settings.undo_history_limit,
        )
        .unwrap();
        AppState::new(
            settings,
            session,
            Arc::new(StubInterpreter {
                reply,
                healthy: true,
            }),
        )
    }

    fn request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder().method(method).uri(uri);
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request(method, uri, body)).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_get_quote_for_initial_config() {
        let app = create_app(test_state(None));
        let (status, body) = send(&app, Method::GET, "/quote", None).await;

        assert_eq!(status, StatusCode::OK);
        let quote = &body["data"];
        assert_eq!(quote["items"].as_array().unwrap().len(), 6);
        assert_eq!(quote["items"][0]["total"], 4917.0);
        assert_eq!(quote["items"][0]["yieldDisplay"], "34 m²/c");
        assert_eq!(quote["subtotal"], 22122.0);
        assert!((quote["total"].as_f64().unwrap() - 25661.52).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_responses_carry_request_id() {
        let app = create_app(test_state(None));
        let response = app
            .oneshot(request(Method::GET, "/config", None))
            .await
            .unwrap();
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_replace_config_validates() {
        let state = test_state(None);
        let app = create_app(state.clone());

        let mut config = serde_json::to_value(ProjectConfig::initial(PricingPolicy::default())).unwrap();
        config["materials"]["Pintura"]["yield"] = json!(0);

        let (status, body) = send(&app, Method::PUT, "/config", Some(config.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_CONFIG");
        assert_eq!(state.session.snapshot().materials.paint.yield_per_unit, 120.0);

        config["materials"]["Pintura"]["yield"] = json!(100);
        config["m2"] = json!(250);
        let (status, body) = send(&app, Method::PUT, "/config", Some(config)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["config"]["m2"], 250.0);
        assert_eq!(body["data"]["quote"]["items"][0]["quantity"], "8 Cub.");
    }

    #[tokio::test]
    async fn test_undo_and_reset() {
        let state = test_state(None);
        let app = create_app(state.clone());

        let mut config = ProjectConfig::initial(PricingPolicy::default());
        config.m2 = 40.0;
        let (status, _) = send(&app, Method::PUT, "/config", Some(serde_json::to_value(&config).unwrap())).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, Method::POST, "/config/undo", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["config"]["m2"], 100.0);

        let (status, body) = send(&app, Method::POST, "/config/undo", None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "CONFLICT");

        let (status, body) = send(&app, Method::POST, "/config/reset", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["quote"]["subtotal"], 22122.0);
    }

    #[tokio::test]
    async fn test_assistant_targets_newly_selected_material() {
        let state = test_state(Some(json!({
            "selectedMaterial": "Sellador",
            "price": 999
        })));
        let app = create_app(state.clone());

        let (status, body) = send(
            &app,
            Method::POST,
            "/assistant",
            Some(json!({ "prompt": "usa el otro producto a 999" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["applied"], true);
        assert!(body["data"].get("prompt").is_none());
        assert_eq!(body["data"]["config"]["selectedMaterial"], "Sellador");
        assert_eq!(body["data"]["config"]["materials"]["Sellador"]["price"], 999.0);
        assert_eq!(body["data"]["config"]["materials"]["Pintura"]["price"], 2100.0);
        assert_eq!(state.session.snapshot().materials.sealer.price, 999.0);
        assert!(!state.session.is_interpreting());
    }

    #[tokio::test]
    async fn test_assistant_failure_preserves_prompt_and_config() {
        let state = test_state(None);
        let app = create_app(state.clone());
        let before = state.session.snapshot();

        let (status, body) = send(
            &app,
            Method::POST,
            "/assistant",
            Some(json!({ "prompt": "pon 300 metros" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["applied"], false);
        assert_eq!(body["data"]["prompt"], "pon 300 metros");
        assert_eq!(*state.session.snapshot(), *before);
        assert!(!state.session.is_interpreting());
    }

    #[tokio::test]
    async fn test_assistant_drops_invalid_fields() {
        let state = test_state(Some(json!({ "m2": -3, "workDays": 7 })));
        let app = create_app(state.clone());

        let (_, body) = send(
            &app,
            Method::POST,
            "/assistant",
            Some(json!({ "prompt": "menos tres metros y 7 días" })),
        )
        .await;

        assert_eq!(body["data"]["applied"], true);
        assert_eq!(body["data"]["rejected"][0]["field"], "m2");
        assert_eq!(body["data"]["config"]["m2"], 100.0);
        assert_eq!(body["data"]["config"]["workDays"], 7);
    }

    #[tokio::test]
    async fn test_assistant_with_nothing_usable_changes_nothing() {
        let state = test_state(Some(json!({ "yield": 0 })));
        let app = create_app(state.clone());

        let (_, body) = send(
            &app,
            Method::POST,
            "/assistant",
            Some(json!({ "prompt": "rendimiento cero" })),
        )
        .await;

        assert_eq!(body["data"]["applied"], false);
        assert_eq!(body["data"]["prompt"], "rendimiento cero");
        assert!(state.session.undo().is_none());
    }

    #[tokio::test]
    async fn test_assistant_update_without_effect_is_not_applied() {
        let state = test_state(Some(json!({ "removeWorker": "nadie", "m2": 100 })));
        let app = create_app(state.clone());
        let before = state.session.snapshot();

        let (status, body) = send(
            &app,
            Method::POST,
            "/assistant",
            Some(json!({ "prompt": "quita a nadie" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["applied"], false);
        assert_eq!(body["data"]["prompt"], "quita a nadie");
        assert_eq!(*state.session.snapshot(), *before);

        let (status, _) = send(&app, Method::POST, "/config/undo", None).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_replace_config_keeps_policy_when_omitted() {
        let mut settings = test_settings();
        settings.pricing = PricingPolicy {
            sealer_line: SealerLine::SkipWhenSelected,
            labor_mode: LaborMode::Roster,
        };
        let session = QuoteSession::new(ProjectConfig::initial(settings.pricing), 5).unwrap();
        let state = AppState::new(
            settings,
            session,
            Arc::new(StubInterpreter {
                reply: None,
                healthy: true,
            }),
        );
        let app = create_app(state.clone());

        let mut config = serde_json::to_value(ProjectConfig::initial(PricingPolicy::default())).unwrap();
        config.as_object_mut().unwrap().remove("pricing");
        config["m2"] = json!(60);

        let (status, body) = send(&app, Method::PUT, "/config", Some(config)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["config"]["pricing"]["sealerLine"], "skip_when_selected");
        assert_eq!(body["data"]["config"]["pricing"]["laborMode"], "roster");
        assert_eq!(state.session.snapshot().pricing.sealer_line, SealerLine::SkipWhenSelected);
        assert_eq!(state.session.snapshot().m2, 60.0);
    }

    #[tokio::test]
    async fn test_replace_with_identical_config_records_no_undo() {
        let state = test_state(None);
        let app = create_app(state.clone());
        let config = serde_json::to_value(&*state.session.snapshot()).unwrap();

        let (status, _) = send(&app, Method::PUT, "/config", Some(config)).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&app, Method::POST, "/config/undo", None).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_assistant_rejects_overlapping_submission() {
        let state = test_state(Some(json!({ "m2": 10 })));
        let app = create_app(state.clone());

        let slot = state.session.begin_interpretation().unwrap();
        let (status, _) = send(
            &app,
            Method::POST,
            "/assistant",
            Some(json!({ "prompt": "10 metros" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        drop(slot);

        let (status, body) = send(
            &app,
            Method::POST,
            "/assistant",
            Some(json!({ "prompt": "10 metros" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["config"]["m2"], 10.0);
    }

    #[tokio::test]
    async fn test_assistant_requires_prompt() {
        let app = create_app(test_state(None));
        let (status, body) = send(&app, Method::POST, "/assistant", Some(json!({ "prompt": "  " }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_print_quote_is_plain_text() {
        let app = create_app(test_state(None));
        let response = app
            .oneshot(request(Method::GET, "/quote/print", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.contains("Sellador Primario"));
        assert!(text.contains("$25,662"));
    }

    #[tokio::test]
    async fn test_presets() {
        let state = test_state(None);
        let app = create_app(state.clone());

        let (status, body) = send(&app, Method::GET, "/materials/presets", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 3);

        let (status, body) = send(
            &app,
            Method::POST,
            "/materials/pintura/preset",
            Some(json!({ "brand": "behr premium" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["config"]["materials"]["Pintura"]["brand"], "Behr Premium");
        assert_eq!(state.session.snapshot().materials.paint.yield_per_unit, 140.0);

        let (status, _) = send(
            &app,
            Method::POST,
            "/materials/Pintura/preset",
            Some(json!({ "brand": "Fester Vaportite" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &app,
            Method::POST,
            "/materials/barniz/preset",
            Some(json!({ "brand": "Comex Top" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_worker_roster() {
        let state = test_state(None);
        let app = create_app(state.clone());

        let (status, body) = send(
            &app,
            Method::POST,
            "/workers",
            Some(json!({ "name": "Pedro", "dailyRate": 450 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["config"]["workers"].as_array().unwrap().len(), 3);

        let (status, _) = send(
            &app,
            Method::POST,
            "/workers",
            Some(json!({ "name": " ", "dailyRate": 450 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(&app, Method::DELETE, "/workers/pedro", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["config"]["workers"].as_array().unwrap().len(), 2);

        let (status, _) = send(&app, Method::DELETE, "/workers/pedro", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_health_degrades_without_interpreter() {
        let settings = test_settings();
        let session = QuoteSession::new(ProjectConfig::initial(settings.pricing), 5).unwrap();
        let state = AppState::new(
            settings,
            session,
            Arc::new(StubInterpreter {
                reply: None,
                healthy: false,
            }),
        );
        let app = create_app(state);

        let (status, body) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "degraded");
        assert_eq!(body["services"]["interpreter"], "error");
        assert_eq!(body["services"]["quoteEngine"], "ok");
        assert_eq!(body["services"]["interpreterBusy"], false);
    }
}
