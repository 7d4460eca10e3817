//! Simulated downstream dependency call.
//!
//! Always succeeds at the span level; injected faults are decided by the
//! request handler, never here.

use std::sync::Arc;
use std::time::Duration;

use opentelemetry::trace::SpanKind;
use opentelemetry::{Context, KeyValue};
use opentelemetry_sdk::trace::SdkTracer;

use crate::chaos::random::RandomSource;
use crate::observability::ScopedSpan;

pub const DEPENDENCY_SPAN: &str = "database_query";
pub const DB_SYSTEM: &str = "postgres";
pub const DB_STATEMENT: &str = "SELECT * FROM cart";

/// Latency window in milliseconds, `[min, max)`.
pub const MIN_LATENCY_MS: u64 = 20;
pub const MAX_LATENCY_MS: u64 = 70;

/// A traced call to a pretend database.
#[derive(Debug, Clone)]
pub struct DependencySimulator {
    tracer: SdkTracer,
    random: Arc<dyn RandomSource>,
}

impl DependencySimulator {
    pub fn new(tracer: SdkTracer, random: Arc<dyn RandomSource>) -> Self {
        Self { tracer, random }
    }

    /// Run under `parent` and return the context of the finished dependency
    /// span, so later work can nest beneath it.
    pub async fn simulate_dependency(&self, parent: &Context) -> Context {
        let span = ScopedSpan::start(&self.tracer, DEPENDENCY_SPAN, SpanKind::Client, parent);

        let latency_ms = self.random.uniform(MIN_LATENCY_MS, MAX_LATENCY_MS);
        tokio::time::sleep(Duration::from_millis(latency_ms)).await;

        let span_ref = span.span();
        span_ref.set_attribute(KeyValue::new("db.system", DB_SYSTEM));
        span_ref.set_attribute(KeyValue::new("db.statement", DB_STATEMENT));

        span.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chaos::random::FixedRandom;
    use opentelemetry::trace::{TraceContextExt, TracerProvider as _};
    use opentelemetry::Value;
    use opentelemetry_sdk::trace::{InMemorySpanExporter, SdkTracerProvider};
    use std::time::Instant;

    fn setup(draw: u64) -> (SdkTracerProvider, DependencySimulator, InMemorySpanExporter) {
        let exporter = InMemorySpanExporter::default();
        let provider = SdkTracerProvider::builder()
            .with_simple_exporter(exporter.clone())
            .build();
        let dependency = DependencySimulator::new(provider.tracer("test"), Arc::new(FixedRandom(draw)));
        (provider, dependency, exporter)
    }

    #[tokio::test]
    async fn test_span_attributes_and_latency() {
        let (_provider, dependency, exporter) = setup(35);

        let start = Instant::now();
        let cx = dependency.simulate_dependency(&Context::new()).await;
        assert!(start.elapsed() >= Duration::from_millis(35));

        let spans = exporter.get_finished_spans().unwrap();
        assert_eq!(spans.len(), 1, "span must be closed before returning");
        let span = &spans[0];
        assert_eq!(span.name, DEPENDENCY_SPAN);
        assert_eq!(span.span_kind, SpanKind::Client);
        assert!(span
            .attributes
            .contains(&KeyValue::new("db.system", Value::from(DB_SYSTEM))));
        assert!(span
            .attributes
            .contains(&KeyValue::new("db.statement", Value::from(DB_STATEMENT))));

        // Returned context points at the dependency span.
        assert_eq!(cx.span().span_context().span_id(), span.span_context.span_id());
    }

    #[tokio::test]
    async fn test_latency_floor() {
        // Draw below the window is clamped to the minimum.
        let (_provider, dependency, _exporter) = setup(0);
        let start = Instant::now();
        dependency.simulate_dependency(&Context::new()).await;
        assert!(start.elapsed() >= Duration::from_millis(MIN_LATENCY_MS));
    }
}
