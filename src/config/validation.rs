//! Configuration validation.
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Chaos values are never rejected; suspicious ones become warnings

use std::fmt;
use std::net::SocketAddr;

use crate::chaos::Route;
use crate::config::schema::AppConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check the configuration for values the service cannot start with.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    let buckets = &config.observability.histogram_buckets;
    if buckets.is_empty() {
        errors.push(ValidationError::new(
            "observability.histogram_buckets",
            "at least one bucket is required",
        ));
    } else if buckets.iter().any(|b| !b.is_finite()) {
        errors.push(ValidationError::new(
            "observability.histogram_buckets",
            "buckets must be finite",
        ));
    } else if buckets.windows(2).any(|w| w[0] >= w[1]) {
        errors.push(ValidationError::new(
            "observability.histogram_buckets",
            "buckets must be strictly ascending",
        ));
    }

    let metrics_path = config.observability.metrics_path.as_str();
    if !metrics_path.starts_with('/') {
        errors.push(ValidationError::new(
            "observability.metrics_path",
            "must start with '/'",
        ));
    } else if Route::ALL.iter().any(|r| r.path() == metrics_path) {
        errors.push(ValidationError::new(
            "observability.metrics_path",
            format!("'{}' collides with a request route", metrics_path),
        ));
    }

    if config.telemetry.service_name.trim().is_empty() {
        errors.push(ValidationError::new(
            "telemetry.service_name",
            "must not be empty",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Accepted but probably unintended settings, for logging at startup.
pub fn config_warnings(config: &AppConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    let rate = config.chaos.error_rate;
    if rate < 0 {
        warnings.push(format!("error_rate {} is negative; no errors will be injected", rate));
    } else if rate > 100 {
        warnings.push(format!("error_rate {} exceeds 100; every request will fail", rate));
    }

    if config.chaos.latency_ms < 0 {
        warnings.push(format!(
            "latency_ms {} is negative; no latency will be added",
            config.chaos.latency_ms
        ));
    }

    warnings
}
