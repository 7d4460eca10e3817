//! Metrics collection and exposition.
//!
//! # Metrics
//! - `http_requests_total` (counter): handled requests by path, status
//! - `http_request_duration_seconds` (histogram): handling time by path
//!
//! # Design Decisions
//! - The Prometheus recorder is owned by `RequestMetrics`, not installed
//!   globally; updates go through `metrics::with_local_recorder`
//! - Label cardinality is bounded by the fixed route set and the status codes
//!   actually produced
//! - Counter and histogram updates are atomic, so concurrent requests never
//!   lose increments

use std::time::Duration;

use axum::http::StatusCode;
use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use metrics_exporter_prometheus::{
    BuildError, Matcher, PrometheusBuilder, PrometheusHandle, PrometheusRecorder,
};

pub const REQUESTS_TOTAL: &str = "http_requests_total";
pub const REQUEST_DURATION_SECONDS: &str = "http_request_duration_seconds";

/// Prometheus client default buckets, in seconds.
pub const DEFAULT_BUCKETS: [f64; 11] = [
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Process-lifetime request aggregates, shared by every handler.
pub struct RequestMetrics {
    recorder: PrometheusRecorder,
    handle: PrometheusHandle,
}

impl RequestMetrics {
    /// Create the recorder with fixed duration buckets.
    pub fn new(buckets: &[f64]) -> Result<Self, BuildError> {
        let recorder = PrometheusBuilder::new()
            .set_buckets_for_metric(Matcher::Full(REQUEST_DURATION_SECONDS.to_string()), buckets)?
            .build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            describe_counter!(REQUESTS_TOTAL, "Total number of HTTP requests");
            describe_histogram!(
                REQUEST_DURATION_SECONDS,
                Unit::Seconds,
                "Duration of HTTP requests in seconds"
            );
        });

        Ok(Self { recorder, handle })
    }

    /// Count one finished request and observe its duration.
    pub fn record_request(&self, path: &'static str, status: StatusCode, elapsed: Duration) {
        let status = status.as_u16().to_string();
        metrics::with_local_recorder(&self.recorder, || {
            counter!(REQUESTS_TOTAL, "path" => path, "status" => status).increment(1);
            histogram!(REQUEST_DURATION_SECONDS, "path" => path).record(elapsed.as_secs_f64());
        });
    }

    /// Prometheus text exposition of all series.
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

impl std::fmt::Debug for RequestMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestMetrics").finish_non_exhaustive()
    }
}

/// Look up a sample value in rendered exposition text.
///
/// `series` is the full sample name (e.g. `http_request_duration_seconds_count`)
/// and every `label="value"` pair in `labels` must be present on the line.
pub fn sample_value(rendered: &str, series: &str, labels: &[(&str, &str)]) -> Option<f64> {
    rendered
        .lines()
        .filter(|line| !line.starts_with('#'))
        .filter_map(|line| {
            let (name_and_labels, value) = line.rsplit_once(' ')?;
            let (name, label_set) = match name_and_labels.split_once('{') {
                Some((name, rest)) => (name, rest),
                None => (name_and_labels, ""),
            };
            if name != series {
                return None;
            }
            let matches = labels
                .iter()
                .all(|(k, v)| label_set.contains(&format!("{}=\"{}\"", k, v)));
            if matches {
                value.parse().ok()
            } else {
                None
            }
        })
        .next()
}
