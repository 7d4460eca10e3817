//! Axum adapters over the request-handling core.

use axum::{
    extract::State,
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::Instrument;

use crate::chaos::Route;
use crate::http::request::request_id;
use crate::http::server::AppState;
use crate::observability::tracing::extract_context;

/// `GET|POST /`
pub async fn root_handler(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
) -> Response {
    serve_route(state, Route::Root, method, headers).await
}

/// `GET|POST /checkout`
pub async fn checkout_handler(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
) -> Response {
    serve_route(state, Route::Checkout, method, headers).await
}

/// `GET /metrics`: Prometheus text exposition.
pub async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.handler.metrics().render(),
    )
}

/// Run the core handler in its own task so a client disconnect cannot cut
/// the request short: sleeps, metrics and span closure always complete.
async fn serve_route(state: AppState, route: Route, method: Method, headers: HeaderMap) -> Response {
    let parent = extract_context(&state.propagator, &headers);
    let request_id = request_id(&headers).to_string();
    let handler = state.handler.clone();

    let task = tokio::spawn(
        async move { handler.handle(route, &method, &parent).await }
            .instrument(tracing::Span::current()),
    );

    match task.await {
        Ok(outcome) => {
            tracing::debug!(
                request_id = %request_id,
                path = route.path(),
                status = outcome.status.as_u16(),
                trace_id = %outcome.trace_id,
                "Request handled"
            );
            (outcome.status, outcome.body).into_response()
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, path = route.path(), error = %e, "Request task failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
