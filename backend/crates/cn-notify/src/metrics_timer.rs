use crate::Metrics;

use std::time::Instant;

/// Helper for timing dispatches
pub struct MetricsTimer {
    start: Instant,
    metrics: Metrics,
}

impl MetricsTimer {
    pub fn new(metrics: Metrics) -> Self {
        Self {
            start: Instant::now(),
            metrics,
        }
    }

    /// Record elapsed time
    pub fn finish(self) {
        let duration = self.start.elapsed();
        self.metrics.dispatch_latency(duration);
    }
}
