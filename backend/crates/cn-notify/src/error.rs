use cn_core::UserId;
use cn_db::DbError;

use error_location::ErrorLocation;
use thiserror::Error;

/// Failure to evaluate one subscriber during a dispatch.
///
/// Never surfaced to publishers: the subscriber is skipped for that event and
/// the error is logged.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Contact lookup for {owner_id} failed: {source} {location}")]
    ContactLookup {
        owner_id: UserId,
        #[source]
        source: DbError,
        location: ErrorLocation,
    },

    #[error("Contact lookup for {owner_id} timed out after {timeout_secs}s {location}")]
    LookupTimeout {
        owner_id: UserId,
        timeout_secs: u64,
        location: ErrorLocation,
    },
}

impl NotifyError {
    /// Short label for metrics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ContactLookup { .. } => "contact_lookup",
            Self::LookupTimeout { .. } => "lookup_timeout",
        }
    }
}

pub type Result<T> = std::result::Result<T, NotifyError>;
