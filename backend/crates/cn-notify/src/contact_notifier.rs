use crate::{BroadcastDispatcher, SubscriptionId, SubscriptionRegistry, UpdateStream};

use cn_config::NotifierConfig;
use cn_core::{ContactProfile, Update, UserId};
use cn_db::ContactStore;

use std::sync::Arc;

use log::info;

/// Entry point for the surrounding backend: sessions subscribe here and
/// storage-mutating code publishes here.
#[derive(Clone)]
pub struct ContactNotifier {
    registry: SubscriptionRegistry,
    dispatcher: BroadcastDispatcher,
}

impl ContactNotifier {
    pub fn new(store: Arc<dyn ContactStore>, config: NotifierConfig) -> Self {
        Self::with_registry(SubscriptionRegistry::new(), store, config)
    }

    pub fn with_registry(
        registry: SubscriptionRegistry,
        store: Arc<dyn ContactStore>,
        config: NotifierConfig,
    ) -> Self {
        let dispatcher = BroadcastDispatcher::new(registry.clone(), store, config);
        Self {
            registry,
            dispatcher,
        }
    }

    pub fn registry(&self) -> &SubscriptionRegistry {
        &self.registry
    }

    /// Open a live update stream for an authenticated user.
    /// The stream ends when it is dropped, unsubscribed, or the notifier shuts down.
    pub fn subscribe(&self, owner_id: UserId) -> UpdateStream {
        let (_, stream) = self.registry.register(owner_id);
        stream
    }

    /// Close one subscription, e.g. when the transport reports a disconnect
    pub fn unsubscribe(&self, subscription_id: SubscriptionId) -> bool {
        self.registry.deregister(subscription_id)
    }

    /// Notify everyone who has `subject_user_id` as a contact.
    ///
    /// Call only after the triggering storage change is committed, so that
    /// contact lookups made during dispatch observe it.
    pub async fn publish_contact_change(&self, subject_user_id: UserId, update: Update) -> usize {
        self.dispatcher
            .notify_contact_changed(subject_user_id, update)
            .await
    }

    /// Deliver to every session of `owner_id`, bypassing contact filtering
    pub fn publish_direct(&self, owner_id: UserId, update: Update) -> usize {
        self.dispatcher.notify_direct(owner_id, update)
    }

    /// A user's public profile changed
    pub async fn publish_profile_updated(&self, profile: ContactProfile) -> usize {
        let user_id = profile.user_id;
        self.publish_contact_change(user_id, Update::updated_contact(profile))
            .await
    }

    /// `user_id` was removed as a contact (or removed their own account).
    ///
    /// Goes through contact filtering: only owners who still list `user_id`
    /// when the dispatch runs will hear about it.
    pub async fn publish_contact_deleted(&self, user_id: UserId) -> usize {
        self.publish_contact_change(user_id, Update::deleted_contact(user_id))
            .await
    }

    /// A user deleted their account.
    ///
    /// Tells every owner who still lists the user, then closes the user's own
    /// sessions. The session list is read after the broadcast, so a session
    /// opened while it was in flight is closed too; one opened after this
    /// returns is not, so stop accepting the user's logins first. Run it while
    /// the relationship rows are still readable and purge them afterwards.
    /// Returns how many owner sessions were told.
    pub async fn publish_account_deleted(&self, user_id: UserId) -> usize {
        let notified = self.publish_contact_deleted(user_id).await;

        let closed = self
            .registry
            .subscriptions_for(user_id)
            .into_iter()
            .filter(|subscription| self.registry.deregister(subscription.id))
            .count();

        info!(
            "Account {user_id} deleted: notified {notified} sessions, closed {closed} own sessions"
        );

        notified
    }

    pub fn subscription_count(&self) -> usize {
        self.registry.len()
    }

    /// End every stream. Safe to call more than once.
    pub fn shutdown(&self) -> usize {
        self.registry.shutdown()
    }
}
