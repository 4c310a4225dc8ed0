//! Prometheus metrics implementation.
//!
//! Concrete implementation of the `Metrics` trait that delegates to the
//! helpers in `counters.rs` and `recorder.rs`, which talk to the global
//! `metrics` crate registry. Metrics are registered on first use and a single
//! global handle renders them in Prometheus text format.

use crate::domain::Metrics;
use std::time::Instant;

/// Prometheus-based metrics implementation.
///
/// Stateless: all metrics go through the global registry installed by
/// `recorder::init_metrics`.
pub struct PrometheusMetrics {
    // Empty - uses global metrics registry pattern
}

impl PrometheusMetrics {
    pub fn new() -> Self {
        tracing::info!("Creating Prometheus metrics");
        PrometheusMetrics {}
    }
}

impl Metrics for PrometheusMetrics {
    fn render(&self) -> String {
        super::render_metrics()
    }

    fn record_habit_created(&self) {
        tracing::debug!("Recording habit created event");
        super::increment_habit_created();
    }

    fn record_checkin(&self, streak: i32) {
        super::record_checkin(streak);
    }

    fn record_checkin_rejected(&self, reason: &'static str) {
        tracing::debug!("Recording rejected check-in: {}", reason);
        super::increment_checkin_rejected(reason);
    }

    fn record_http_request(&self, start: Instant, path: &str, method: &str, status: u16) {
        super::track_http_request(start, path, method, status);
    }
}
