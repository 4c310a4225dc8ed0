use crate::domain::Metrics;
use std::time::Instant;

/// No-op metrics implementation for testing.
pub struct NoopMetrics;

impl NoopMetrics {
    pub fn new() -> Self {
        NoopMetrics
    }
}

impl Metrics for NoopMetrics {
    // ---
    fn render(&self) -> String {
        String::new()
    }
    fn record_habit_created(&self) {}
    fn record_checkin(&self, _: i32) {}
    fn record_checkin_rejected(&self, _: &'static str) {}
    fn record_http_request(&self, _: Instant, _: &str, _: &str, _: u16) {}
}
