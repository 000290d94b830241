
use cn_core::UserId;
use cn_db::{ContactStore, DbError, Result as DbErrorResult};

use std::collections::HashSet;
use std::panic::Location;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use error_location::ErrorLocation;
use metrics::{
    Counter, Gauge, GaugeFn, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit,
};

/// Store whose reads fail for one owner and are empty for everyone else
pub(crate) struct FailingForOwnerStore {
    pub(crate) failing_owner: UserId,
    pub(crate) contacts: HashSet<UserId>,
}

#[async_trait]
impl ContactStore for FailingForOwnerStore {
    async fn read_contact_ids(&self, user_id: UserId) -> DbErrorResult<HashSet<UserId>> {
        if user_id == self.failing_owner {
            return Err(DbError::Unavailable {
                message: "connection pool closed".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(self.contacts.clone())
    }
}

const ACTIVE_GAUGE: &str = "cn_notify.subscriptions.active";

/// Gauge cell storing an `f64` as bits
#[derive(Default)]
pub(crate) struct GaugeCell(AtomicU64);

impl GaugeCell {
    pub(crate) fn value(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::SeqCst))
    }

    fn adjust(&self, delta: f64) {
        let _ = self
            .0
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |bits| {
                Some((f64::from_bits(bits) + delta).to_bits())
            });
    }
}

impl GaugeFn for GaugeCell {
    fn increment(&self, value: f64) {
        self.adjust(value);
    }

    fn decrement(&self, value: f64) {
        self.adjust(-value);
    }

    fn set(&self, value: f64) {
        self.0.store(value.to_bits(), Ordering::SeqCst);
    }
}

/// Recorder that keeps only the active-subscriptions gauge
#[derive(Default)]
pub(crate) struct ActiveGaugeRecorder {
    pub(crate) active: Arc<GaugeCell>,
}

impl Recorder for ActiveGaugeRecorder {
    fn describe_counter(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn describe_gauge(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn describe_histogram(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {
    }

    fn register_counter(&self, _key: &Key, _metadata: &Metadata<'_>) -> Counter {
        Counter::noop()
    }

    fn register_gauge(&self, key: &Key, _metadata: &Metadata<'_>) -> Gauge {
        if key.name() == ACTIVE_GAUGE {
            Gauge::from_arc(Arc::clone(&self.active))
        } else {
            Gauge::noop()
        }
    }

    fn register_histogram(&self, _key: &Key, _metadata: &Metadata<'_>) -> Histogram {
        Histogram::noop()
    }
}
