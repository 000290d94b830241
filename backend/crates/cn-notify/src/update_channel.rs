use crate::{SubscriptionId, SubscriptionRegistry};

use cn_core::{Update, UserId};

use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Context, Poll};

use futures::{Stream, StreamExt};
use tokio::sync::mpsc;

/// Create the two halves of a subscriber channel.
///
/// The buffer is unbounded: pushing never waits on the consumer.
pub(crate) fn update_channel(
    subscription_id: SubscriptionId,
    owner_id: UserId,
    registry: SubscriptionRegistry,
) -> (ChannelHandle, UpdateStream) {
    let (sender, receiver) = mpsc::unbounded_channel();
    let closed = Arc::new(AtomicBool::new(false));

    let handle = ChannelHandle {
        sender,
        closed: Arc::clone(&closed),
    };
    let stream = UpdateStream {
        subscription_id,
        owner_id,
        receiver,
        closed,
        registry,
    };

    (handle, stream)
}

/// Producer side, owned by the registry entry.
/// The only strong sender: dropping it ends the consumer's stream.
pub(crate) struct ChannelHandle {
    sender: mpsc::UnboundedSender<Update>,
    closed: Arc<AtomicBool>,
}

impl ChannelHandle {
    pub(crate) fn sink(&self) -> UpdateSink {
        UpdateSink {
            sender: self.sender.downgrade(),
            closed: Arc::clone(&self.closed),
        }
    }

    /// Mark closed and drop the sender, waking a waiting consumer
    pub(crate) fn close(self) {
        self.closed.store(true, Ordering::Release);
    }
}

/// Non-owning push handle. Pushing through it after deregistration is a no-op.
#[derive(Debug, Clone)]
pub struct UpdateSink {
    sender: mpsc::WeakUnboundedSender<Update>,
    closed: Arc<AtomicBool>,
}

impl UpdateSink {
    /// Enqueue an update without blocking. Returns false if the channel is torn down.
    pub fn push(&self, update: Update) -> bool {
        if self.is_closed() {
            return false;
        }

        match self.sender.upgrade() {
            Some(sender) => sender.send(update).is_ok(),
            None => false,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

/// Consumer side of a subscription, owned by the subscribing session.
///
/// Yields updates in push order and ends once the subscription is deregistered.
/// Updates still buffered at that point are discarded. Dropping the stream
/// deregisters its subscription.
pub struct UpdateStream {
    subscription_id: SubscriptionId,
    owner_id: UserId,
    receiver: mpsc::UnboundedReceiver<Update>,
    closed: Arc<AtomicBool>,
    registry: SubscriptionRegistry,
}

impl UpdateStream {
    pub fn subscription_id(&self) -> SubscriptionId {
        self.subscription_id
    }

    pub fn owner_id(&self) -> UserId {
        self.owner_id
    }

    /// Wait for the next update. `None` once the subscription is gone.
    pub async fn recv(&mut self) -> Option<Update> {
        self.next().await
    }

    /// Take the next buffered update without waiting
    pub fn try_recv(&mut self) -> Option<Update> {
        if self.is_closed() {
            self.release();
            return None;
        }

        self.receiver.try_recv().ok()
    }

    /// Whether the subscription has been deregistered
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Deregister this subscription and end the stream
    pub fn unsubscribe(self) {
        self.registry.deregister(self.subscription_id);
    }

    /// Refuse further sends and drop anything still buffered
    fn release(&mut self) {
        self.receiver.close();
        while self.receiver.try_recv().is_ok() {}
    }
}

impl Stream for UpdateStream {
    type Item = Update;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        if this.is_closed() {
            this.release();
            return Poll::Ready(None);
        }

        match this.receiver.poll_recv(cx) {
            // Deregistered while this update was in flight
            Poll::Ready(Some(_)) if this.is_closed() => {
                this.release();
                Poll::Ready(None)
            }
            other => other,
        }
    }
}

impl Drop for UpdateStream {
    fn drop(&mut self) {
        self.registry.deregister(self.subscription_id);
    }
}

impl std::fmt::Debug for UpdateStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateStream")
            .field("subscription_id", &self.subscription_id)
            .field("owner_id", &self.owner_id)
            .field("closed", &self.is_closed())
            .finish()
    }
}
