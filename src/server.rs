//! Tracing setup and proxy server startup.

use std::sync::Arc;

use anyhow::{anyhow, bail};
use tracing::{error, info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use codementor_api::{ApiServer, AppState};
use codementor_config::{Config, ConfigValidator, UpstreamConfig};
use codementor_gateway_openai::OpenAiGateway;
use codementor_protocols::{GatewayError, ModelGateway};

use crate::adapters::codementor_dir;

/// Initialize tracing with file output and, optionally, console output.
///
/// Log files are written to ~/.codementor/logs/ with daily rotation.
/// The interactive client leaves the console to the conversation.
pub(crate) fn init_tracing(console: bool) -> anyhow::Result<()> {
    let log_dir = codementor_dir().join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("codementor")
        .filename_suffix("log")
        .max_log_files(30)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Keeps the background writer alive for the program duration
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console.then(|| fmt::layer().with_target(true).with_ansi(true)))
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
        )
        .init();

    Ok(())
}

/// Validate the configuration, logging warnings; fails on any error.
pub(crate) fn check_config(config: &Config) -> anyhow::Result<()> {
    let result = ConfigValidator::validate(config);
    for warning in &result.warnings {
        warn!("Config {}: {}", warning.path, warning.message);
    }
    if !result.is_valid() {
        for err in &result.errors {
            error!("Config {}: {}", err.path, err.message);
        }
        bail!("invalid configuration ({} errors)", result.errors.len());
    }
    Ok(())
}

/// Build the proxy state from the upstream section.
///
/// Without an API key the server still starts and answers every
/// request with a configuration notice.
pub(crate) fn build_state(upstream: &UpstreamConfig) -> anyhow::Result<AppState> {
    let gateway = match OpenAiGateway::from_config(upstream) {
        Ok(gateway) => gateway,
        Err(GatewayError::NotConfigured(reason)) => {
            warn!("Upstream not configured: {}", reason);
            return Ok(AppState::new(upstream.model.clone(), None));
        }
        Err(e) => return Err(e.into()),
    };

    let primary: Arc<dyn ModelGateway> = Arc::new(gateway.clone());
    let mut state = AppState::new(upstream.model.clone(), Some(primary));
    if let Some(fallback) = upstream
        .fallback_model
        .as_deref()
        .filter(|m| !m.trim().is_empty() && *m != upstream.model)
    {
        state = state.with_fallback(fallback, Arc::new(gateway.for_model(fallback)));
    }
    Ok(state)
}

/// Run the proxy server in foreground.
pub(crate) async fn run_server(
    mut config: Config,
    host: Option<String>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    check_config(&config)?;

    info!("Starting codementor proxy v{}", env!("CARGO_PKG_VERSION"));
    let state = Arc::new(build_state(&config.upstream)?);
    let server = ApiServer::new(config.server, state);

    server
        .run()
        .await
        .map_err(|e| anyhow!("server error: {e}"))
}
