//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router for the fixed route set and the metrics endpoint
//! - Wire up middleware (request ID, request logging)
//! - Serve on a bound listener until shutdown

use std::sync::Arc;

use axum::{routing::get, Router};
use opentelemetry_sdk::propagation::TraceContextPropagator;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::chaos::{RequestHandler, Route};
use crate::config::AppConfig;
use crate::http::handlers::{checkout_handler, metrics_handler, root_handler};
use crate::http::request::{make_request_span, propagate_request_id_layer, set_request_id_layer};
use crate::lifecycle::{signals, ShutdownSignal};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub handler: Arc<RequestHandler>,
    pub propagator: TraceContextPropagator,
}

/// HTTP server for the chaos app.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
}

impl HttpServer {
    /// Create a new HTTP server around an already-wired request handler.
    pub fn new(config: AppConfig, handler: RequestHandler) -> Self {
        let state = AppState {
            handler: Arc::new(handler),
            propagator: TraceContextPropagator::new(),
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    fn build_router(config: &AppConfig, state: AppState) -> Router {
        Router::new()
            .route(Route::Root.path(), get(root_handler).post(root_handler))
            .route(Route::Checkout.path(), get(checkout_handler).post(checkout_handler))
            .route(&config.observability.metrics_path, get(metrics_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
                    .layer(propagate_request_id_layer()),
            )
    }

    /// The configured router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Serve connections until `shutdown` fires or the process is signalled.
    pub async fn run(self, listener: TcpListener, mut shutdown: ShutdownSignal) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            metrics_path = %self.config.observability.metrics_path,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = shutdown.recv() => tracing::info!("Shutdown requested"),
                    _ = signals::wait_for_signal() => {}
                }
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
