use crate::{ContactProfile, DELETED_CONTACT, UPDATED_CONTACT, Update, UserId};

use serde_json::json;

#[test]
fn given_updated_contact_when_inspected_then_subject_is_profile_owner() {
    let user_id = UserId::new();
    let update = Update::updated_contact(ContactProfile::new(user_id, "Alice").unwrap());

    assert_eq!(update.subject_user_id(), Some(user_id));
    assert_eq!(update.event_type(), UPDATED_CONTACT);
}

#[test]
fn given_deleted_contact_when_inspected_then_subject_is_removed_user() {
    let user_id = UserId::new();
    let update = Update::deleted_contact(user_id);

    assert_eq!(update.subject_user_id(), Some(user_id));
    assert_eq!(update.event_type(), DELETED_CONTACT);
}

#[test]
fn given_direct_update_when_inspected_then_has_no_subject() {
    let update = Update::direct("contact_request", json!({ "from": "someone" }));

    assert_eq!(update.subject_user_id(), None);
    assert_eq!(update.event_type(), "contact_request");
}

#[test]
fn given_deleted_contact_when_serialized_then_tagged_with_type() {
    let user_id = UserId::new();
    let update = Update::deleted_contact(user_id);

    let value = serde_json::to_value(&update).unwrap();

    assert_eq!(value["type"], "deleted_contact");
    assert_eq!(value["user_id"], user_id.to_string());
}

#[test]
fn given_updated_contact_when_serialized_then_profile_fields_are_flattened() {
    let profile = ContactProfile::new(UserId::new(), "Alice").unwrap();
    let update = Update::updated_contact(profile.clone());

    let value = serde_json::to_value(&update).unwrap();
    let decoded: Update = serde_json::from_value(value.clone()).unwrap();

    assert_eq!(value["type"], "updated_contact");
    assert_eq!(value["display_name"], "Alice");
    assert_eq!(decoded, Update::UpdatedContact(profile));
}
