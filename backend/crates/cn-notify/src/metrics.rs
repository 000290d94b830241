use metrics::{counter, gauge, histogram};

/// Metrics collector for subscription and dispatch activity
#[derive(Clone)]
pub struct Metrics {
    prefix: &'static str,
}

impl Metrics {
    pub fn new() -> Self {
        Self { prefix: "cn_notify" }
    }

    /// Record a new subscription
    pub fn subscription_registered(&self, active: usize) {
        counter!(format!("{}.subscriptions.registered", self.prefix)).increment(1);
        gauge!(format!("{}.subscriptions.active", self.prefix)).set(active as f64);
    }

    /// Record a removed subscription
    pub fn subscription_deregistered(&self, active: usize) {
        counter!(format!("{}.subscriptions.deregistered", self.prefix)).increment(1);
        gauge!(format!("{}.subscriptions.active", self.prefix)).set(active as f64);
    }

    /// Record a registry teardown
    pub fn registry_shutdown(&self, closed: usize) {
        counter!(format!("{}.subscriptions.deregistered", self.prefix)).increment(closed as u64);
        gauge!(format!("{}.subscriptions.active", self.prefix)).set(0.0);
    }

    /// Record one dispatch and how many channels received it
    pub fn update_dispatched(&self, route: &str, event_type: &str, delivered: usize) {
        counter!(format!("{}.dispatch.{}", self.prefix, route)).increment(1);
        counter!(format!("{}.updates.delivered", self.prefix)).increment(delivered as u64);
        counter!(format!("{}.updates.delivered.{}", self.prefix, event_type))
            .increment(delivered as u64);
    }

    /// Record a subscriber skipped because its contact lookup failed
    pub fn lookup_failed(&self, kind: &str) {
        counter!(format!("{}.lookups.failed", self.prefix)).increment(1);
        counter!(format!("{}.lookups.failed.{}", self.prefix, kind)).increment(1);
    }

    /// Record dispatch latency
    pub fn dispatch_latency(&self, duration: std::time::Duration) {
        histogram!(format!("{}.dispatch.latency_ms", self.prefix))
            .record(duration.as_millis() as f64);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
