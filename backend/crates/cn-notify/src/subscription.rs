use crate::{SubscriptionId, UpdateSink};

use cn_core::{Update, UserId};

use chrono::{DateTime, Utc};

/// Point-in-time view of one live subscription, as handed out by registry snapshots
#[derive(Debug, Clone)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub owner_id: UserId,
    pub subscribed_at: DateTime<Utc>,
    pub sink: UpdateSink,
}

impl Subscription {
    /// Push an update to this subscription. Returns false if it has been deregistered.
    pub fn push(&self, update: Update) -> bool {
        self.sink.push(update)
    }
}
