use crate::Result as DbErrorResult;

use cn_core::UserId;

use std::collections::HashSet;

use async_trait::async_trait;

/// Read side of the durable contact relationships.
///
/// Implementations must be strongly consistent with writes already committed
/// by this process: a read issued after a commit observes it. Reads may be
/// slow (network or disk round trip).
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// All users currently in `user_id`'s contact list
    async fn read_contact_ids(&self, user_id: UserId) -> DbErrorResult<HashSet<UserId>>;
}
