//! Shared utilities for integration and load testing.

#![allow(dead_code)]

use std::net::SocketAddr;

use axum::Router;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::{InMemorySpanExporter, SdkTracerProvider, SpanData};
use sre_app::config::AppConfig;
use sre_app::lifecycle::{build_handler, Shutdown};
use sre_app::observability::metrics::{sample_value, REQUESTS_TOTAL, REQUEST_DURATION_SECONDS};
use sre_app::HttpServer;
use tokio::net::TcpListener;

/// An app wired to an in-memory span exporter.
pub struct TestApp {
    pub server: HttpServer,
    pub exporter: InMemorySpanExporter,
    provider: SdkTracerProvider,
}

impl TestApp {
    pub fn new(error_rate: i64, latency_ms: i64) -> Self {
        let mut config = AppConfig::default();
        config.chaos.error_rate = error_rate;
        config.chaos.latency_ms = latency_ms;
        Self::with_config(config)
    }

    pub fn with_config(config: AppConfig) -> Self {
        let exporter = InMemorySpanExporter::default();
        let provider = SdkTracerProvider::builder()
            .with_simple_exporter(exporter.clone())
            .build();
        let handler = build_handler(&config, provider.tracer("integration")).unwrap();
        Self {
            server: HttpServer::new(config, handler),
            exporter,
            provider,
        }
    }

    pub fn router(&self) -> Router {
        self.server.router()
    }

    pub fn spans(&self) -> Vec<SpanData> {
        self.exporter.get_finished_spans().unwrap()
    }

    /// Serve on an ephemeral port. Returns the address and the trigger that stops it.
    pub async fn spawn(self) -> (SocketAddr, Shutdown, InMemorySpanExporter) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = Shutdown::new();
        let signal = shutdown.subscribe();
        let TestApp {
            server,
            exporter,
            provider,
        } = self;

        tokio::spawn(async move {
            let _provider = provider;
            let _ = server.run(listener, signal).await;
        });

        (addr, shutdown, exporter)
    }
}

pub fn request_count(rendered: &str, path: &str, status: &str) -> f64 {
    sample_value(rendered, REQUESTS_TOTAL, &[("path", path), ("status", status)]).unwrap_or(0.0)
}

pub fn duration_count(rendered: &str, path: &str) -> f64 {
    sample_value(
        rendered,
        &format!("{}_count", REQUEST_DURATION_SECONDS),
        &[("path", path)],
    )
    .unwrap_or(0.0)
}

pub fn duration_sum(rendered: &str, path: &str) -> f64 {
    sample_value(
        rendered,
        &format!("{}_sum", REQUEST_DURATION_SECONDS),
        &[("path", path)],
    )
    .unwrap_or(0.0)
}

/// True for a 32-character lowercase hex trace id that is not all zeros.
pub fn is_trace_id(s: &str) -> bool {
    s.len() == 32
        && s.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        && s.chars().any(|c| c != '0')
}
