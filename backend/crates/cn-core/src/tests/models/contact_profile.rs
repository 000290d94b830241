use crate::{ContactProfile, CoreError, UserId};

#[test]
fn given_display_name_when_created_then_trimmed() {
    let user_id = UserId::new();

    let profile = ContactProfile::new(user_id, "  Alice  ").unwrap();

    assert_eq!(profile.user_id, user_id);
    assert_eq!(profile.display_name, "Alice");
    assert!(profile.avatar_url.is_none());
    assert!(profile.status_message.is_none());
}

#[test]
fn given_blank_display_name_when_created_then_validation_error() {
    let result = ContactProfile::new(UserId::new(), "   ");

    assert!(matches!(result, Err(CoreError::Validation { .. })));
}

#[test]
fn given_builder_fields_when_set_then_present() {
    let profile = ContactProfile::new(UserId::new(), "Bob")
        .unwrap()
        .with_avatar_url("https://cdn.example.com/bob.png")
        .with_status_message("away");

    assert_eq!(
        profile.avatar_url.as_deref(),
        Some("https://cdn.example.com/bob.png")
    );
    assert_eq!(profile.status_message.as_deref(), Some("away"));
}
