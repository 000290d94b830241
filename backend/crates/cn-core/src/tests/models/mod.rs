mod contact_profile;
mod update;
mod user_id;
