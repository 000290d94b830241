use crate::{CoreError, Result as CoreErrorResult, UserId};

use std::panic::Location;

use chrono::{DateTime, Utc};
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

/// Public profile data other users see for a contact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactProfile {
    pub user_id: UserId,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub status_message: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl ContactProfile {
    #[track_caller]
    pub fn new(user_id: UserId, display_name: impl Into<String>) -> CoreErrorResult<Self> {
        let display_name = display_name.into().trim().to_string();
        if display_name.is_empty() {
            return Err(CoreError::Validation {
                message: "display_name cannot be empty".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(Self {
            user_id,
            display_name,
            avatar_url: None,
            status_message: None,
            updated_at: Utc::now(),
        })
    }

    pub fn with_avatar_url(mut self, avatar_url: impl Into<String>) -> Self {
        self.avatar_url = Some(avatar_url.into());
        self
    }

    pub fn with_status_message(mut self, status_message: impl Into<String>) -> Self {
        self.status_message = Some(status_message.into());
        self
    }
}
