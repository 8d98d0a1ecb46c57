use crate::config::{Environment, LogFormat, Settings};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn default_directives(env: &Environment) -> &'static str {
    match env {
        Environment::Dev => "koba_quoter=debug,tower_http=debug,info",
        Environment::Staging => "koba_quoter=debug,tower_http=info,info",
        Environment::Prod => "koba_quoter=info,tower_http=info,warn",
    }
}

pub fn init_logging(settings: &Settings) {
    let env = &settings.env;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(env)));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(env.is_dev())
        .with_line_number(env.is_dev());

    let registry = tracing_subscriber::registry().with(filter);
    match settings.log_format {
        LogFormat::Json => registry.with(fmt_layer.json()).init(),
        LogFormat::Pretty => registry.with(fmt_layer.pretty()).init(),
        LogFormat::Compact => registry.with(fmt_layer.compact()).init(),
    }

    tracing::info!(
        format = ?settings.log_format,
        "Logging initialized for {:?} environment",
        env
    );
}
