//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{AppConfig, LogFormat};
use crate::config::validation::{validate_config, ValidationError};

pub const ENV_ERROR_RATE: &str = "ERROR_RATE";
pub const ENV_LATENCY_MS: &str = "LATENCY_MS";
pub const ENV_CHAOS_SEED: &str = "CHAOS_SEED";
pub const ENV_BIND_ADDRESS: &str = "BIND_ADDRESS";
pub const ENV_OTLP_ENDPOINT: &str = "OTEL_EXPORTER_OTLP_ENDPOINT";
pub const ENV_SERVICE_NAME: &str = "OTEL_SERVICE_NAME";
pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from an optional TOML file plus the process environment.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    load_config_with(path, |key| std::env::var(key).ok())
}

/// Same as [`load_config`] with an explicit environment lookup.
pub fn load_config_with<F>(path: Option<&Path>, lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => AppConfig::default(),
    };

    apply_env_overrides(&mut config, lookup);

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay environment variables onto `config`.
///
/// Unset variables leave the current value alone. A set but unparsable
/// `ERROR_RATE` or `LATENCY_MS` becomes 0.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup(ENV_ERROR_RATE) {
        config.chaos.error_rate = parse_int_or_zero(ENV_ERROR_RATE, &raw);
    }
    if let Some(raw) = lookup(ENV_LATENCY_MS) {
        config.chaos.latency_ms = parse_int_or_zero(ENV_LATENCY_MS, &raw);
    }
    if let Some(raw) = lookup(ENV_CHAOS_SEED) {
        match raw.parse() {
            Ok(seed) => config.chaos.seed = Some(seed),
            Err(_) => tracing::warn!(value = %raw, "Ignoring unparsable {}", ENV_CHAOS_SEED),
        }
    }
    if let Some(addr) = lookup(ENV_BIND_ADDRESS) {
        config.listener.bind_address = addr;
    }
    if let Some(endpoint) = lookup(ENV_OTLP_ENDPOINT).filter(|e| !e.is_empty()) {
        config.telemetry.otlp_endpoint = Some(endpoint);
    }
    if let Some(name) = lookup(ENV_SERVICE_NAME).filter(|n| !n.is_empty()) {
        config.telemetry.service_name = name;
    }
    if let Some(raw) = lookup(ENV_LOG_FORMAT) {
        match LogFormat::parse(&raw) {
            Some(format) => config.observability.log_format = format,
            None => tracing::warn!(value = %raw, "Ignoring unknown {}", ENV_LOG_FORMAT),
        }
    }
}

fn parse_int_or_zero(key: &str, raw: &str) -> i64 {
    raw.parse().unwrap_or_else(|_| {
        tracing::warn!(key, value = %raw, "Unparsable integer, using 0");
        0
    })
}
