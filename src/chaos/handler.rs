//! Request handling core for the two fixed routes.
//!
//! # Per-request lifecycle
//! ```text
//! Started → (DependencyPhase, checkout only) → WorkPhase
//!         → Decided{Success|Error} → MetricsRecorded → Closed
//! ```
//!
//! The root span is held by a scope guard for the whole lifecycle, so it is
//! closed after metrics are recorded on both exit paths.

use std::sync::Arc;
use std::time::Instant;

use axum::http::{Method, StatusCode};
use opentelemetry::trace::{SpanKind, SpanRef, Status, TraceId};
use opentelemetry::{Context, KeyValue};
use opentelemetry_sdk::trace::SdkTracer;

use crate::chaos::dependency::DependencySimulator;
use crate::chaos::fault::FaultInjector;
use crate::chaos::work::WorkSimulator;
use crate::observability::{RequestMetrics, ScopedSpan};

pub const ROOT_SUCCESS_PREFIX: &str = "Hello from SRE App! TraceID: ";
pub const ROOT_FAILURE_BODY: &str = "Chaos Monkey struck!\n";
pub const CHECKOUT_SUCCESS_BODY: &str = "Checkout successful";
pub const CHECKOUT_FAILURE_BODY: &str = "Checkout failed\n";

/// The fixed set of instrumented routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/`: work only, echoes the trace id.
    Root,
    /// `/checkout`: dependency call, then work nested under it.
    Checkout,
}

impl Route {
    pub const ALL: [Route; 2] = [Route::Root, Route::Checkout];

    /// URL path, also used as the `path` metric label.
    pub fn path(self) -> &'static str {
        match self {
            Route::Root => "/",
            Route::Checkout => "/checkout",
        }
    }

    pub fn span_name(self) -> &'static str {
        match self {
            Route::Root => "handle_root",
            Route::Checkout => "handle_checkout",
        }
    }
}

/// The error recorded on spans for an injected failure.
#[derive(Debug, thiserror::Error)]
#[error("artificial chaos error")]
pub struct InjectedFault;

/// Result of handling one request.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub route: Route,
    pub status: StatusCode,
    pub body: String,
    pub trace_id: TraceId,
}

impl Outcome {
    pub fn is_injected_failure(&self) -> bool {
        self.status == StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// Orchestrates spans, simulators, fault decision and metrics for a request.
#[derive(Debug, Clone)]
pub struct RequestHandler {
    tracer: SdkTracer,
    work: WorkSimulator,
    dependency: DependencySimulator,
    faults: FaultInjector,
    metrics: Arc<RequestMetrics>,
}

impl RequestHandler {
    pub fn new(
        tracer: SdkTracer,
        work: WorkSimulator,
        dependency: DependencySimulator,
        faults: FaultInjector,
        metrics: Arc<RequestMetrics>,
    ) -> Self {
        Self {
            tracer,
            work,
            dependency,
            faults,
            metrics,
        }
    }

    pub fn metrics(&self) -> &Arc<RequestMetrics> {
        &self.metrics
    }

    pub async fn handle(&self, route: Route, method: &Method, parent: &Context) -> Outcome {
        match route {
            Route::Root => self.handle_root(method, parent).await,
            Route::Checkout => self.handle_checkout(method, parent).await,
        }
    }

    /// Simple variant: root span → work span.
    pub async fn handle_root(&self, method: &Method, parent: &Context) -> Outcome {
        let route = Route::Root;
        let start = Instant::now();
        let root = self.open_root(route, method, parent);

        self.work.simulate_work(root.context()).await;

        let trace_id = root.span().span_context().trace_id();
        let (status, body) = if self.faults.should_inject_error() {
            mark_injected_failure(&root.span());
            tracing::warn!(path = route.path(), %trace_id, "Error injected 500");
            (StatusCode::INTERNAL_SERVER_ERROR, ROOT_FAILURE_BODY.to_string())
        } else {
            (StatusCode::OK, format!("{}{}\n", ROOT_SUCCESS_PREFIX, trace_id))
        };

        self.finish(route, &root, status, start);
        Outcome {
            route,
            status,
            body,
            trace_id,
        }
    }

    /// Composite variant: root span → dependency span → work span.
    pub async fn handle_checkout(&self, method: &Method, parent: &Context) -> Outcome {
        let route = Route::Checkout;
        let start = Instant::now();
        let root = self.open_root(route, method, parent);

        let dependency_cx = self.dependency.simulate_dependency(root.context()).await;
        self.work.simulate_work(&dependency_cx).await;

        let trace_id = root.span().span_context().trace_id();
        let (status, body) = if self.faults.should_inject_error() {
            mark_injected_failure(&root.span());
            tracing::warn!(path = route.path(), %trace_id, "Error injected 500");
            (StatusCode::INTERNAL_SERVER_ERROR, CHECKOUT_FAILURE_BODY.to_string())
        } else {
            (StatusCode::OK, CHECKOUT_SUCCESS_BODY.to_string())
        };

        self.finish(route, &root, status, start);
        Outcome {
            route,
            status,
            body,
            trace_id,
        }
    }

    fn open_root(&self, route: Route, method: &Method, parent: &Context) -> ScopedSpan {
        let root = ScopedSpan::start(&self.tracer, route.span_name(), SpanKind::Server, parent);
        let span = root.span();
        span.set_attribute(KeyValue::new("http.request.method", method.as_str().to_string()));
        span.set_attribute(KeyValue::new("http.route", route.path()));
        root
    }

    fn finish(&self, route: Route, root: &ScopedSpan, status: StatusCode, start: Instant) {
        root.span().set_attribute(KeyValue::new(
            "http.response.status_code",
            i64::from(status.as_u16()),
        ));
        self.metrics.record_request(route.path(), status, start.elapsed());
    }
}

fn mark_injected_failure(span: &SpanRef<'_>) {
    span.set_attribute(KeyValue::new("error", true));
    span.record_error(&InjectedFault);
    span.set_status(Status::error(InjectedFault.to_string()));
}
