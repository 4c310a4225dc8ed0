use std::sync::Arc;
use std::time::Instant;

/// Abstraction for application metrics (counters, histograms).
pub trait Metrics: Send + Sync + 'static {
    // ---
    /// Render current metrics in Prometheus text format.
    fn render(&self) -> String;

    /// Record a "habit created" event.
    fn record_habit_created(&self);

    /// Record a successful check-in and the streak it produced.
    fn record_checkin(&self, streak: i32);

    /// Record a check-in refused for `reason` (duplicate, disabled, ...).
    fn record_checkin_rejected(&self, reason: &'static str);

    /// Record HTTP request duration and labels.
    fn record_http_request(&self, start: Instant, path: &str, method: &str, status: u16);
}

/// Type alias for any backend that implements Metrics.
pub type MetricsPtr = Arc<dyn Metrics>;
