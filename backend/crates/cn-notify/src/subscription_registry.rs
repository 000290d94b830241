use crate::update_channel::{ChannelHandle, update_channel};
use crate::{Metrics, Subscription, SubscriptionId, UpdateStream};

use cn_core::UserId;

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::info;
use parking_lot::Mutex;

/// Registry of every live subscription.
///
/// A single mutex covers the entry map and the id counter. It is held only to
/// insert, remove or copy entries, never while pushing or awaiting. The
/// active-subscriptions gauge is written under it so it tracks the map.
pub struct SubscriptionRegistry {
    inner: Arc<Mutex<RegistryInner>>,
    metrics: Metrics,
}

struct RegistryInner {
    /// Last id handed out; ids start at 1
    last_id: u64,
    /// Live subscriptions ordered by id
    subscriptions: BTreeMap<SubscriptionId, RegistryEntry>,
}

struct RegistryEntry {
    owner_id: UserId,
    subscribed_at: DateTime<Utc>,
    channel: ChannelHandle,
}

impl RegistryEntry {
    fn to_subscription(&self, id: SubscriptionId) -> Subscription {
        Subscription {
            id,
            owner_id: self.owner_id,
            subscribed_at: self.subscribed_at,
            sink: self.channel.sink(),
        }
    }
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(RegistryInner {
                last_id: 0,
                subscriptions: BTreeMap::new(),
            })),
            metrics: Metrics::new(),
        }
    }

    /// Register a new subscription for `owner_id`. Never fails.
    pub fn register(&self, owner_id: UserId) -> (SubscriptionId, UpdateStream) {
        let (subscription_id, stream, total) = {
            let mut inner = self.inner.lock();

            inner.last_id += 1;
            let subscription_id = SubscriptionId::new(inner.last_id);
            let (channel, stream) = update_channel(subscription_id, owner_id, self.clone());

            inner.subscriptions.insert(
                subscription_id,
                RegistryEntry {
                    owner_id,
                    subscribed_at: Utc::now(),
                    channel,
                },
            );

            let total = inner.subscriptions.len();
            self.metrics.subscription_registered(total);

            (subscription_id, stream, total)
        };

        info!("Registered subscription {subscription_id} for user {owner_id} ({total} total)");

        (subscription_id, stream)
    }

    /// Remove a subscription and end its stream.
    /// Returns false if it was already gone; removing twice is not an error.
    pub fn deregister(&self, subscription_id: SubscriptionId) -> bool {
        let (removed, remaining) = {
            let mut inner = self.inner.lock();
            let removed = inner.subscriptions.remove(&subscription_id);
            let remaining = inner.subscriptions.len();
            if removed.is_some() {
                self.metrics.subscription_deregistered(remaining);
            }
            (removed, remaining)
        };

        let Some(entry) = removed else {
            return false;
        };

        entry.channel.close();
        info!(
            "Deregistered subscription {subscription_id} for user {} ({remaining} total remaining)",
            entry.owner_id
        );

        true
    }

    /// Copy of all live subscriptions, ordered by id.
    /// Later registrations and removals don't affect the returned vector.
    pub fn snapshot(&self) -> Vec<Subscription> {
        let inner = self.inner.lock();
        inner
            .subscriptions
            .iter()
            .map(|(id, entry)| entry.to_subscription(*id))
            .collect()
    }

    /// Copy of the live subscriptions owned by one user, ordered by id
    pub fn subscriptions_for(&self, owner_id: UserId) -> Vec<Subscription> {
        let inner = self.inner.lock();
        inner
            .subscriptions
            .iter()
            .filter(|(_, entry)| entry.owner_id == owner_id)
            .map(|(id, entry)| entry.to_subscription(*id))
            .collect()
    }

    /// Whether a subscription is still registered
    pub fn contains(&self, subscription_id: SubscriptionId) -> bool {
        self.inner.lock().subscriptions.contains_key(&subscription_id)
    }

    /// Number of live subscriptions owned by one user
    pub fn owner_count(&self, owner_id: UserId) -> usize {
        let inner = self.inner.lock();
        inner
            .subscriptions
            .values()
            .filter(|entry| entry.owner_id == owner_id)
            .count()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().subscriptions.is_empty()
    }

    /// Deregister every subscription; all streams end.
    /// The registry stays usable and keeps counting ids from where it was.
    pub fn shutdown(&self) -> usize {
        let drained = {
            let mut inner = self.inner.lock();
            let drained = std::mem::take(&mut inner.subscriptions);
            self.metrics.registry_shutdown(drained.len());
            drained
        };

        let count = drained.len();
        for entry in drained.into_values() {
            entry.channel.close();
        }

        info!("Subscription registry shut down, closed {count} subscriptions");

        count
    }
}

impl Default for SubscriptionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SubscriptionRegistry {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            metrics: self.metrics.clone(),
        }
    }
}
