//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Request handling produces:
//!     → logging.rs (structured log events)
//!     → metrics.rs (request counter, duration histogram)
//!     → tracing.rs (span tree per request)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → GET /metrics (Prometheus scrape)
//!     → OTLP collector (batched span export)
//! ```

pub mod logging;
pub mod metrics;
pub mod tracing;

pub use self::metrics::RequestMetrics;
pub use self::tracing::{ScopedSpan, TelemetryError, TelemetryGuard};
