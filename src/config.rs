use anyhow::{bail, Context, Result};
use std::env;

use crate::domain::{LaborMode, PricingPolicy, SealerLine};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Staging,
    Prod,
}

impl Environment {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "prod" | "production" => Self::Prod,
            "staging" => Self::Staging,
            _ => Self::Dev,
        }
    }

    pub fn is_dev(&self) -> bool {
        matches!(self, Self::Dev)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
    Compact,
}

impl LogFormat {
    /// JSON in production, pretty output elsewhere, unless `LOG_FORMAT` says otherwise.
    pub fn resolve(env: &Environment, requested: Option<&str>) -> Self {
        match requested.map(|s| s.trim().to_lowercase()).as_deref() {
            Some("json") => Self::Json,
            Some("pretty") => Self::Pretty,
            Some("compact") => Self::Compact,
            _ if matches!(env, Environment::Prod) => Self::Json,
            _ => Self::Pretty,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub env: Environment,
    pub server_addr: String,
    pub log_format: LogFormat,

    // CORS
    pub cors_allow_origins: Vec<String>,

    // Language-model interpreter
    pub gemini_api_url: String,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub ai_service_timeout_seconds: u64,
    /// How long a reachability check answers `/health` before it is repeated.
    pub interpreter_health_ttl_seconds: u64,

    // Quoting
    pub pricing: PricingPolicy,
    pub undo_history_limit: usize,
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn pricing_from_env() -> Result<PricingPolicy> {
    let sealer_line = match env::var("QUOTE_SEALER_LINE") {
        Ok(raw) => match SealerLine::from_str(&raw) {
            Some(policy) => policy,
            None => bail!("QUOTE_SEALER_LINE must be 'always' or 'skip_when_selected', got '{}'", raw),
        },
        Err(_) => SealerLine::default(),
    };

    let labor_mode = match env::var("QUOTE_LABOR_MODE") {
        Ok(raw) => match LaborMode::from_str(&raw) {
            Some(mode) => mode,
            None => bail!("QUOTE_LABOR_MODE must be 'crew' or 'roster', got '{}'", raw),
        },
        Err(_) => LaborMode::default(),
    };

    Ok(PricingPolicy {
        sealer_line,
        labor_mode,
    })
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let env = Environment::from_str(&env::var("ENV").unwrap_or_else(|_| "dev".to_string()));
        let server_addr = env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let log_format = LogFormat::resolve(&env, env::var("LOG_FORMAT").ok().as_deref());

        // CORS
        let cors_allow_origins = env::var("CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        // Language-model interpreter
        let gemini_api_url = env::var("GEMINI_API_URL")
            .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".to_string());
        let gemini_api_key = env::var("GEMINI_API_KEY").context("GEMINI_API_KEY must be set")?;
        let gemini_model =
            env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-2.0-flash".to_string());
        let ai_service_timeout_seconds = parse_or("AI_SERVICE_TIMEOUT_SECONDS", 30);
        let interpreter_health_ttl_seconds = parse_or("INTERPRETER_HEALTH_TTL_SECONDS", 60);

        // Quoting
        let pricing = pricing_from_env()?;
        let undo_history_limit = parse_or("UNDO_HISTORY_LIMIT", 20);

        Ok(Settings {
            env,
            server_addr,
            log_format,
            cors_allow_origins,
            gemini_api_url,
            gemini_api_key,
            gemini_model,
            ai_service_timeout_seconds,
            interpreter_health_ttl_seconds,
            pricing,
            undo_history_limit,
        })
    }
}
