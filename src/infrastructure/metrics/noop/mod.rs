mod noop_metrics;

pub use noop_metrics::NoopMetrics;
use std::sync::Arc;

/// Creates a metrics implementation that discards everything.
///
/// Selected when `HABIT_METRICS_TYPE` is unset or not `prom`; `/metrics`
/// then serves an empty body.
pub fn create() -> anyhow::Result<crate::domain::MetricsPtr> {
    Ok(Arc::new(NoopMetrics::new()))
}
