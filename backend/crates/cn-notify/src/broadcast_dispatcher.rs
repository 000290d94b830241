use crate::{
    Metrics, MetricsTimer, NotifyError, Result as NotifyErrorResult, Subscription,
    SubscriptionRegistry, create_dispatch_span,
};

use cn_config::NotifierConfig;
use cn_core::{Update, UserId};
use cn_db::ContactStore;

use std::panic::Location;
use std::sync::Arc;

use error_location::ErrorLocation;
use futures::{StreamExt, future, stream};
use log::{debug, warn};
use tracing::Instrument;

const ROUTE_CONTACT_CHANGED: &str = "contact_changed";
const ROUTE_DIRECT: &str = "direct";

/// Routes updates to the subscriptions that should see them.
///
/// Contact membership is read from the store on every dispatch and never
/// cached, so delivery always follows the contact list as currently committed.
pub struct BroadcastDispatcher {
    registry: SubscriptionRegistry,
    store: Arc<dyn ContactStore>,
    config: NotifierConfig,
    metrics: Metrics,
}

impl BroadcastDispatcher {
    pub fn new(
        registry: SubscriptionRegistry,
        store: Arc<dyn ContactStore>,
        config: NotifierConfig,
    ) -> Self {
        Self {
            registry,
            store,
            config,
            metrics: Metrics::new(),
        }
    }

    /// Push `update` to every subscription whose owner currently has
    /// `subject_user_id` as a contact. Returns how many channels received it.
    ///
    /// A subscriber whose contact lookup fails or times out is skipped for this
    /// update only; the rest of the dispatch carries on.
    pub async fn notify_contact_changed(&self, subject_user_id: UserId, update: Update) -> usize {
        let span = create_dispatch_span(
            &subject_user_id.to_string(),
            update.event_type(),
            ROUTE_CONTACT_CHANGED,
        );

        self.dispatch_contact_changed(subject_user_id, update)
            .instrument(span)
            .await
    }

    /// Push `update` to every subscription owned by `owner_id`, once per
    /// subscription, without consulting the contact store.
    pub fn notify_direct(&self, owner_id: UserId, update: Update) -> usize {
        let span = create_dispatch_span(&owner_id.to_string(), update.event_type(), ROUTE_DIRECT);
        let _entered = span.enter();

        let delivered = self
            .registry
            .subscriptions_for(owner_id)
            .iter()
            .filter(|subscription| subscription.push(update.clone()))
            .count();

        debug!(
            "Direct {} to user {owner_id} reached {delivered} subscriptions",
            update.event_type()
        );
        self.metrics
            .update_dispatched(ROUTE_DIRECT, update.event_type(), delivered);

        delivered
    }

    async fn dispatch_contact_changed(&self, subject_user_id: UserId, update: Update) -> usize {
        let timer = MetricsTimer::new(self.metrics.clone());
        let subscriptions = self.registry.snapshot();
        let candidates = subscriptions.len();
        let update = &update;

        let delivered = stream::iter(subscriptions)
            .map(|subscription| self.deliver_if_contact(subscription, subject_user_id, update))
            .buffer_unordered(self.config.max_concurrent_lookups.max(1))
            .filter(|pushed| future::ready(*pushed))
            .count()
            .await;

        debug!(
            "Contact change {} for user {subject_user_id} reached {delivered}/{candidates} subscriptions",
            update.event_type()
        );
        self.metrics
            .update_dispatched(ROUTE_CONTACT_CHANGED, update.event_type(), delivered);
        timer.finish();

        delivered
    }

    async fn deliver_if_contact(
        &self,
        subscription: Subscription,
        subject_user_id: UserId,
        update: &Update,
    ) -> bool {
        match self.is_contact_of(subscription.owner_id, subject_user_id).await {
            Ok(true) => subscription.push(update.clone()),
            Ok(false) => false,
            Err(error) => {
                warn!(
                    "Skipping subscription {} for {}: {error}",
                    subscription.id,
                    update.event_type()
                );
                self.metrics.lookup_failed(error.kind());
                false
            }
        }
    }

    async fn is_contact_of(
        &self,
        owner_id: UserId,
        subject_user_id: UserId,
    ) -> NotifyErrorResult<bool> {
        let lookup = self.store.read_contact_ids(owner_id);

        let contacts = tokio::time::timeout(self.config.lookup_timeout(), lookup)
            .await
            .map_err(|_| NotifyError::LookupTimeout {
                owner_id,
                timeout_secs: self.config.lookup_timeout_secs,
                location: ErrorLocation::from(Location::caller()),
            })?
            .map_err(|source| NotifyError::ContactLookup {
                owner_id,
                source,
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(contacts.contains(&subject_user_id))
    }
}

impl Clone for BroadcastDispatcher {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            store: Arc::clone(&self.store),
            config: self.config.clone(),
            metrics: self.metrics.clone(),
        }
    }
}
