pub mod broadcast_dispatcher;
pub mod contact_notifier;
pub mod error;
pub mod metrics;
pub mod metrics_timer;
pub mod subscription;
pub mod subscription_id;
pub mod subscription_registry;
pub mod update_channel;

pub use broadcast_dispatcher::BroadcastDispatcher;
pub use contact_notifier::ContactNotifier;
pub use error::{NotifyError, Result};
pub use metrics::Metrics;
pub use metrics_timer::MetricsTimer;
pub use subscription::Subscription;
pub use subscription_id::SubscriptionId;
pub use subscription_registry::SubscriptionRegistry;
pub use update_channel::{UpdateSink, UpdateStream};

#[cfg(test)]
mod tests;

use tracing::info_span;

/// Create a tracing span for one dispatch.
/// All log entries emitted while routing the update will include these fields.
pub fn create_dispatch_span(
    target_user_id: &str,
    event_type: &str,
    route: &str,
) -> tracing::Span {
    info_span!(
        "cn_dispatch",
        target_user_id = %target_user_id,
        event_type = %event_type,
        route = %route,
    )
}
