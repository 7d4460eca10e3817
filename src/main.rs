//! SRE observability app.
//!
//! Serves `/` and `/checkout` with configurable latency and error injection,
//! emits a fixed-shape span tree per request and exposes request metrics on
//! `/metrics`.
//!
//! ```text
//!   GET /          handle_root ─── simulate_work
//!
//!   GET /checkout  handle_checkout ─── database_query ─── simulate_work
//! ```
//!
//! Configuration comes from an optional TOML file (`--config`) overlaid with
//! `ERROR_RATE`, `LATENCY_MS`, `CHAOS_SEED`, `BIND_ADDRESS`,
//! `OTEL_EXPORTER_OTLP_ENDPOINT`, `OTEL_SERVICE_NAME` and `LOG_FORMAT`.

use std::path::PathBuf;

use clap::Parser;
use opentelemetry::trace::TracerProvider as _;
use tokio::net::TcpListener;

use sre_app::config::load_config;
use sre_app::config::validation::config_warnings;
use sre_app::lifecycle::{build_handler, Shutdown, StartupError};
use sre_app::observability::logging::init_logging;
use sre_app::observability::tracing::init_tracer_provider;
use sre_app::observability::TelemetryGuard;
use sre_app::HttpServer;

#[derive(Debug, Parser)]
#[command(name = "sre-app", version, about = "Latency and fault generator for observability labs")]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address, overriding config and environment.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    init_logging(&config.observability)?;

    tracing::info!("sre-app v{} starting", env!("CARGO_PKG_VERSION"));
    for warning in config_warnings(&config) {
        tracing::warn!("{}", warning);
    }
    tracing::info!(
        error_rate = config.chaos.error_rate,
        latency_ms = config.chaos.latency_ms,
        seed = ?config.chaos.seed,
        bind_address = %config.listener.bind_address,
        otlp_endpoint = ?config.telemetry.otlp_endpoint,
        service_name = %config.telemetry.service_name,
        "Configuration loaded"
    );

    let provider = init_tracer_provider(&config.telemetry)?;
    let _telemetry = TelemetryGuard::new(provider.clone());
    let tracer = provider.tracer(config.telemetry.service_name.clone());

    let handler = build_handler(&config, tracer)?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, handler);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
