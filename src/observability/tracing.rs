//! Distributed tracing support.
//!
//! # Responsibilities
//! - Build the tracer provider and its (optional) OTLP batch exporter
//! - Extract inbound W3C trace context from request headers
//! - Scope span lifetimes so every opened span is ended exactly once
//!
//! # Design Decisions
//! - Trace context is an explicit `Context` value threaded down the call
//!   chain; nothing reads the ambient current context
//! - Export is batched on a background worker and never blocks a request
//! - Without an endpoint, spans still get real trace ids but are dropped

use axum::http::HeaderMap;
use opentelemetry::propagation::{Extractor, TextMapPropagator};
use opentelemetry::trace::{SpanKind, SpanRef, TraceContextExt, Tracer};
use opentelemetry::{Context, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::{SdkTracer, SdkTracerProvider};
use opentelemetry_sdk::Resource;
use thiserror::Error;

use crate::config::TelemetryConfig;

/// Errors raised while setting up telemetry.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// OTLP exporter could not be built.
    #[error("Failed to create OTLP exporter: {0}")]
    Exporter(String),

    /// Global subscriber could not be installed.
    #[error("Failed to initialize logging: {0}")]
    Init(String),
}

/// Build the tracer provider described by `config`.
pub fn init_tracer_provider(config: &TelemetryConfig) -> Result<SdkTracerProvider, TelemetryError> {
    let resource = Resource::builder()
        .with_attribute(KeyValue::new("service.name", config.service_name.clone()))
        .with_attribute(KeyValue::new("service.version", config.service_version.clone()))
        .with_attribute(KeyValue::new("deployment.environment", config.environment.clone()))
        .build();

    let builder = SdkTracerProvider::builder().with_resource(resource);

    let provider = match &config.otlp_endpoint {
        Some(endpoint) => {
            let exporter = opentelemetry_otlp::SpanExporter::builder()
                .with_tonic()
                .with_endpoint(endpoint.clone())
                .build()
                .map_err(|e| TelemetryError::Exporter(e.to_string()))?;

            tracing::info!(endpoint = %endpoint, "OTLP span export enabled");
            builder.with_batch_exporter(exporter).build()
        }
        None => {
            tracing::info!("No OTLP endpoint configured, spans will not be exported");
            builder.build()
        }
    };

    Ok(provider)
}

/// Flushes and shuts down the tracer provider when dropped.
pub struct TelemetryGuard {
    provider: Option<SdkTracerProvider>,
}

impl TelemetryGuard {
    pub fn new(provider: SdkTracerProvider) -> Self {
        Self {
            provider: Some(provider),
        }
    }
}

impl std::fmt::Debug for TelemetryGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelemetryGuard")
            .field("active", &self.provider.is_some())
            .finish()
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.provider.take() {
            if let Err(e) = provider.shutdown() {
                tracing::error!(error = ?e, "Failed to shut down tracer provider");
            }
        }
    }
}

/// Read-only view of request headers for context extraction.
pub struct HeaderExtractor<'a>(pub &'a HeaderMap);

impl Extractor for HeaderExtractor<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(|k| k.as_str()).collect()
    }
}

/// Parent context carried by the inbound `traceparent`/`tracestate` headers.
///
/// Yields an empty context (new trace) when the headers are absent or invalid.
pub fn extract_context(propagator: &TraceContextPropagator, headers: &HeaderMap) -> Context {
    propagator.extract(&HeaderExtractor(headers))
}

/// An open span together with the context that makes it the parent of
/// anything started from it.
///
/// The span ends when the guard is dropped, so early returns and
/// cancellation cannot leak it.
pub struct ScopedSpan {
    cx: Context,
}

impl ScopedSpan {
    pub fn start(tracer: &SdkTracer, name: &'static str, kind: SpanKind, parent: &Context) -> Self {
        let span = tracer
            .span_builder(name)
            .with_kind(kind)
            .start_with_context(tracer, parent);
        Self {
            cx: parent.with_span(span),
        }
    }

    /// Context to pass to children of this span.
    pub fn context(&self) -> &Context {
        &self.cx
    }

    pub fn span(&self) -> SpanRef<'_> {
        self.cx.span()
    }

    /// End the span now and hand back its context, which stays valid as a
    /// parent for later spans.
    pub fn end(self) -> Context {
        self.cx.span().end();
        self.cx.clone()
    }
}

impl Drop for ScopedSpan {
    fn drop(&mut self) {
        // No-op if already ended.
        self.cx.span().end();
    }
}
