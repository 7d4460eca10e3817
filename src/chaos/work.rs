//! Simulated internal work.

use std::time::Duration;

use opentelemetry::trace::SpanKind;
use opentelemetry::{Context, KeyValue};
use opentelemetry_sdk::trace::SdkTracer;

use crate::observability::ScopedSpan;

pub const WORK_SPAN: &str = "simulate_work";
pub const LATENCY_ATTRIBUTE: &str = "simulated_latency_ms";

/// One unit of traced work with a fixed artificial delay.
#[derive(Debug, Clone)]
pub struct WorkSimulator {
    tracer: SdkTracer,
    latency_ms: i64,
}

impl WorkSimulator {
    pub fn new(tracer: SdkTracer, latency_ms: i64) -> Self {
        Self { tracer, latency_ms }
    }

    /// Run under `parent`. Non-positive latency yields an empty span.
    pub async fn simulate_work(&self, parent: &Context) {
        let span = ScopedSpan::start(&self.tracer, WORK_SPAN, SpanKind::Internal, parent);

        if self.latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.latency_ms as u64)).await;
            span.span()
                .set_attribute(KeyValue::new(LATENCY_ATTRIBUTE, self.latency_ms));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opentelemetry::trace::TracerProvider as _;
    use opentelemetry::Value;
    use opentelemetry_sdk::trace::{InMemorySpanExporter, SdkTracerProvider};
    use std::time::Instant;

    fn setup(latency_ms: i64) -> (SdkTracerProvider, WorkSimulator, InMemorySpanExporter) {
        let exporter = InMemorySpanExporter::default();
        let provider = SdkTracerProvider::builder()
            .with_simple_exporter(exporter.clone())
            .build();
        let work = WorkSimulator::new(provider.tracer("test"), latency_ms);
        (provider, work, exporter)
    }

    #[tokio::test]
    async fn test_latency_is_applied_and_recorded() {
        let (_provider, work, exporter) = setup(50);

        let start = Instant::now();
        work.simulate_work(&Context::new()).await;
        assert!(start.elapsed() >= Duration::from_millis(50));

        let spans = exporter.get_finished_spans().unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].name, WORK_SPAN);
        let latency = spans[0]
            .attributes
            .iter()
            .find(|kv| kv.key.as_str() == LATENCY_ATTRIBUTE)
            .map(|kv| kv.value.clone());
        assert_eq!(latency, Some(Value::I64(50)));
    }

    #[tokio::test]
    async fn test_zero_latency_is_a_plain_span() {
        for latency in [0, -10] {
            let (_provider, work, exporter) = setup(latency);

            let start = Instant::now();
            work.simulate_work(&Context::new()).await;
            assert!(start.elapsed() < Duration::from_millis(20));

            let spans = exporter.get_finished_spans().unwrap();
            assert_eq!(spans.len(), 1);
            assert!(spans[0].attributes.is_empty());
        }
    }

    #[tokio::test]
    async fn test_span_parent_is_caller() {
        let (provider, work, exporter) = setup(0);
        let tracer = provider.tracer("caller");
        let parent = ScopedSpan::start(&tracer, "caller", SpanKind::Server, &Context::new());
        let parent_id = parent.span().span_context().span_id();

        work.simulate_work(parent.context()).await;
        drop(parent);

        let spans = exporter.get_finished_spans().unwrap();
        let work_span = spans.iter().find(|s| s.name == WORK_SPAN).unwrap();
        assert_eq!(work_span.parent_span_id, parent_id);
    }
}
