pub mod error;
pub mod models;

pub use error::{CoreError, Result};
pub use models::contact_profile::ContactProfile;
pub use models::update::{DELETED_CONTACT, UPDATED_CONTACT, Update};
pub use models::user_id::UserId;

#[cfg(test)]
mod tests;
