#![allow(dead_code)]

use cn_config::NotifierConfig;
use cn_core::{ContactProfile, Update, UserId};
use cn_db::{ContactStore, InMemoryContactStore, Result as DbErrorResult};
use cn_notify::ContactNotifier;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

pub fn create_notifier(store: &InMemoryContactStore) -> ContactNotifier {
    ContactNotifier::new(Arc::new(store.clone()), NotifierConfig::default())
}

pub fn profile_update(user_id: UserId, name: &str) -> Update {
    Update::updated_contact(ContactProfile::new(user_id, name).expect("valid profile"))
}

/// Wraps an in-memory store; lookups for `slow_owner` sleep first
pub struct SlowContactStore {
    pub inner: InMemoryContactStore,
    pub slow_owner: UserId,
    pub delay: Duration,
}

#[async_trait]
impl ContactStore for SlowContactStore {
    async fn read_contact_ids(&self, user_id: UserId) -> DbErrorResult<HashSet<UserId>> {
        if user_id == self.slow_owner {
            tokio::time::sleep(self.delay).await;
        }
        self.inner.read_contact_ids(user_id).await
    }
}

/// Wraps an in-memory store; lookups for `gated_owner` wait until `gate` is notified
pub struct GatedContactStore {
    pub inner: InMemoryContactStore,
    pub gated_owner: UserId,
    pub gate: Arc<Notify>,
    pub entered: Arc<Notify>,
}

#[async_trait]
impl ContactStore for GatedContactStore {
    async fn read_contact_ids(&self, user_id: UserId) -> DbErrorResult<HashSet<UserId>> {
        if user_id == self.gated_owner {
            self.entered.notify_one();
            self.gate.notified().await;
        }
        self.inner.read_contact_ids(user_id).await
    }
}
