//! Configuration schema definitions.
//!
//! All types derive Serde traits so the same structure can be read from a
//! TOML file and then overridden from the environment.

use serde::{Deserialize, Serialize};

use crate::observability::metrics::DEFAULT_BUCKETS;

/// Root configuration for the service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Fault and latency injection.
    pub chaos: ChaosConfig,

    /// Listener configuration.
    pub listener: ListenerConfig,

    /// Span export settings.
    pub telemetry: TelemetryConfig,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,
}

/// Fault and latency injection settings.
///
/// Values are taken as-is; out-of-range rates are reported at startup but
/// never clamped.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ChaosConfig {
    /// Percent chance (0-100) that a request fails with a 500.
    pub error_rate: i64,

    /// Artificial delay added to every simulated unit of work, in milliseconds.
    pub latency_ms: i64,

    /// Seed for a reproducible random source. `None` uses an OS-seeded one.
    pub seed: Option<u64>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Span export configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// OTLP gRPC endpoint (e.g., "http://tempo:4317"). Unset disables export.
    pub otlp_endpoint: Option<String>,

    /// `service.name` resource attribute.
    pub service_name: String,

    /// `service.version` resource attribute.
    pub service_version: String,

    /// `deployment.environment` resource attribute.
    pub environment: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            otlp_endpoint: None,
            service_name: "sre-observability-app".to_string(),
            service_version: "1.0.0".to_string(),
            environment: "lab".to_string(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    /// Parse a case-insensitive format name.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Some(Self::Pretty),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log filter directive, used when `RUST_LOG` is unset.
    pub log_filter: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Path serving the Prometheus exposition.
    pub metrics_path: String,

    /// Upper bounds of the request duration histogram, in seconds.
    pub histogram_buckets: Vec<f64>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "sre_app=info,tower_http=info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_path: "/metrics".to_string(),
            histogram_buckets: DEFAULT_BUCKETS.to_vec(),
        }
    }
}
