use crate::{ContactProfile, UserId};

use serde::{Deserialize, Serialize};

pub const UPDATED_CONTACT: &str = "updated_contact";
pub const DELETED_CONTACT: &str = "deleted_contact";

/// Payload carried on a subscriber's update stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Update {
    /// A contact's visible profile data changed
    UpdatedContact(ContactProfile),
    /// The contact relationship, or the contact's account, was removed
    DeletedContact { user_id: UserId },
    /// Arbitrary update addressed to one user, outside contact-list filtering
    Direct {
        event_type: String,
        payload: serde_json::Value,
    },
}

impl Update {
    pub fn updated_contact(profile: ContactProfile) -> Self {
        Self::UpdatedContact(profile)
    }

    pub fn deleted_contact(user_id: UserId) -> Self {
        Self::DeletedContact { user_id }
    }

    pub fn direct(event_type: impl Into<String>, payload: serde_json::Value) -> Self {
        Self::Direct {
            event_type: event_type.into(),
            payload,
        }
    }

    /// The user this update is about, if it concerns a contact
    pub fn subject_user_id(&self) -> Option<UserId> {
        match self {
            Self::UpdatedContact(profile) => Some(profile.user_id),
            Self::DeletedContact { user_id } => Some(*user_id),
            Self::Direct { .. } => None,
        }
    }

    /// Event type for metrics/logging
    pub fn event_type(&self) -> &str {
        match self {
            Self::UpdatedContact(_) => UPDATED_CONTACT,
            Self::DeletedContact { .. } => DELETED_CONTACT,
            Self::Direct { event_type, .. } => event_type,
        }
    }
}
