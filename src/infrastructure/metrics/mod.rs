pub mod noop;
pub mod prometheus;

// Re-export the factory functions for easy access
pub use noop::create as create_noop_metrics;
pub use prometheus::create as create_prom_metrics;

use crate::config::MetricsKind;
use crate::domain::MetricsPtr;

/// Builds the metrics implementation selected by configuration.
pub fn create_metrics(kind: MetricsKind) -> anyhow::Result<MetricsPtr> {
    // ---
    match kind {
        MetricsKind::Prometheus => create_prom_metrics(),
        MetricsKind::Noop => create_noop_metrics(),
    }
}
