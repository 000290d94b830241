use crate::{CoreError, UserId};

use uuid::Uuid;

#[test]
fn given_valid_uuid_string_when_parsed_then_round_trips_through_display() {
    let uuid = Uuid::new_v4();

    let user_id = UserId::parse(&uuid.to_string()).unwrap();

    assert_eq!(user_id.as_uuid(), &uuid);
    assert_eq!(user_id.to_string(), uuid.to_string());
}

#[test]
fn given_garbage_when_parsed_then_invalid_user_id() {
    let result = UserId::parse("not-a-user");

    assert!(matches!(result, Err(CoreError::InvalidUserId { .. })));
}

#[test]
fn given_same_uuid_when_compared_then_equal() {
    let uuid = Uuid::new_v4();

    assert_eq!(UserId::from_uuid(uuid), UserId::from(uuid));
    assert_ne!(UserId::new(), UserId::new());
}
