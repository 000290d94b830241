pub mod contact_profile;
pub mod update;
pub mod user_id;
