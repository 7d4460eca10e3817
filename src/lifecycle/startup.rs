//! Startup orchestration.
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Every shared component is built here once and handed out by `Arc`

use std::sync::Arc;

use metrics_exporter_prometheus::BuildError;
use opentelemetry_sdk::trace::SdkTracer;
use thiserror::Error;

use crate::chaos::{
    DependencySimulator, FaultInjector, RandomSource, RequestHandler, SeededRandom, ThreadRandom,
    WorkSimulator,
};
use crate::config::{AppConfig, ChaosConfig, ConfigError};
use crate::observability::{RequestMetrics, TelemetryError};

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),

    #[error("metrics error: {0}")]
    Metrics(#[from] BuildError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Random source selected by the chaos settings.
pub fn random_source(chaos: &ChaosConfig) -> Arc<dyn RandomSource> {
    match chaos.seed {
        Some(seed) => Arc::new(SeededRandom::new(seed)),
        None => Arc::new(ThreadRandom),
    }
}

/// Wire the request handler and its collaborators from configuration.
pub fn build_handler(config: &AppConfig, tracer: SdkTracer) -> Result<RequestHandler, StartupError> {
    let metrics = Arc::new(RequestMetrics::new(&config.observability.histogram_buckets)?);
    let random = random_source(&config.chaos);

    Ok(RequestHandler::new(
        tracer.clone(),
        WorkSimulator::new(tracer.clone(), config.chaos.latency_ms),
        DependencySimulator::new(tracer, random.clone()),
        FaultInjector::new(config.chaos.error_rate, random),
        metrics,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use opentelemetry::trace::TracerProvider as _;
    use opentelemetry_sdk::trace::SdkTracerProvider;

    #[test]
    fn test_build_handler_with_defaults() {
        let provider = SdkTracerProvider::builder().build();
        let handler = build_handler(&AppConfig::default(), provider.tracer("test"));
        assert!(handler.is_ok());
    }

    #[test]
    fn test_empty_buckets_abort_startup() {
        let provider = SdkTracerProvider::builder().build();
        let mut config = AppConfig::default();
        config.observability.histogram_buckets.clear();

        let err = build_handler(&config, provider.tracer("test")).unwrap_err();
        assert!(matches!(err, StartupError::Metrics(_)));
    }

    #[test]
    fn test_seeded_sources_agree() {
        let chaos = ChaosConfig {
            seed: Some(11),
            ..ChaosConfig::default()
        };
        let a = random_source(&chaos);
        let b = random_source(&chaos);
        for _ in 0..16 {
            assert_eq!(a.uniform(0, 100), b.uniform(0, 100));
        }
    }
}
