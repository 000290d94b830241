use crate::{ContactStore, Result as DbErrorResult};

use cn_core::UserId;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

/// Contact store held entirely in memory
#[derive(Clone, Default)]
pub struct InMemoryContactStore {
    contacts: Arc<RwLock<HashMap<UserId, HashSet<UserId>>>>,
}

impl InMemoryContactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `contact_id` to `owner_id`'s contact list. Returns false if already present.
    pub async fn add_contact(&self, owner_id: UserId, contact_id: UserId) -> bool {
        let mut contacts = self.contacts.write().await;
        contacts.entry(owner_id).or_default().insert(contact_id)
    }

    /// Remove `contact_id` from `owner_id`'s contact list. Returns false if absent.
    pub async fn remove_contact(&self, owner_id: UserId, contact_id: UserId) -> bool {
        let mut contacts = self.contacts.write().await;
        let Some(owned) = contacts.get_mut(&owner_id) else {
            return false;
        };

        let removed = owned.remove(&contact_id);
        if owned.is_empty() {
            contacts.remove(&owner_id);
        }
        removed
    }

    /// Replace `owner_id`'s whole contact list
    pub async fn set_contacts(
        &self,
        owner_id: UserId,
        contact_ids: impl IntoIterator<Item = UserId>,
    ) {
        let mut contacts = self.contacts.write().await;
        let contact_ids: HashSet<UserId> = contact_ids.into_iter().collect();
        if contact_ids.is_empty() {
            contacts.remove(&owner_id);
        } else {
            contacts.insert(owner_id, contact_ids);
        }
    }

    /// Account deletion: drop the user's own list and every reference to them
    pub async fn remove_user(&self, user_id: UserId) {
        let mut contacts = self.contacts.write().await;
        contacts.remove(&user_id);
        contacts.retain(|_, owned| {
            owned.remove(&user_id);
            !owned.is_empty()
        });
    }
}

#[async_trait]
impl ContactStore for InMemoryContactStore {
    async fn read_contact_ids(&self, user_id: UserId) -> DbErrorResult<HashSet<UserId>> {
        let contacts = self.contacts.read().await;
        Ok(contacts.get(&user_id).cloned().unwrap_or_default())
    }
}
