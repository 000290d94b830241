use crate::{ContactStore, DbError, SqliteContactStore};

use cn_core::UserId;

use std::collections::HashSet;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tempfile::TempDir;

/// Creates an in-memory SQLite pool
async fn create_test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::new()
        .filename(":memory:")
        .create_if_missing(true);

    SqlitePoolOptions::new()
        .max_connections(1) // In-memory needs single connection
        .connect_with(options)
        .await
        .expect("Failed to create test pool")
}

async fn create_test_store() -> (SqliteContactStore, SqlitePool) {
    let pool = create_test_pool().await;
    let store = SqliteContactStore::from_pool(pool.clone())
        .await
        .expect("Failed to run migrations");
    (store, pool)
}

#[tokio::test]
async fn given_added_contacts_when_read_then_returned() {
    let (store, _pool) = create_test_store().await;
    let owner = UserId::new();
    let alice = UserId::new();
    let bob = UserId::new();

    assert!(store.add_contact(owner, alice).await.unwrap());
    assert!(store.add_contact(owner, bob).await.unwrap());
    assert!(!store.add_contact(owner, bob).await.unwrap());

    let contacts = store.read_contact_ids(owner).await.unwrap();
    assert_eq!(contacts, HashSet::from([alice, bob]));
}

#[tokio::test]
async fn given_removed_contact_when_read_then_absent() {
    let (store, _pool) = create_test_store().await;
    let owner = UserId::new();
    let alice = UserId::new();
    store.add_contact(owner, alice).await.unwrap();

    assert!(store.remove_contact(owner, alice).await.unwrap());
    assert!(!store.remove_contact(owner, alice).await.unwrap());

    assert!(store.read_contact_ids(owner).await.unwrap().is_empty());
}

#[tokio::test]
async fn given_removed_user_when_read_then_gone_from_both_sides() {
    let (store, _pool) = create_test_store().await;
    let deleted = UserId::new();
    let friend = UserId::new();
    store.add_contact(friend, deleted).await.unwrap();
    store.add_contact(deleted, friend).await.unwrap();

    let removed = store.remove_user(deleted).await.unwrap();

    assert_eq!(removed, 2);
    assert!(store.read_contact_ids(friend).await.unwrap().is_empty());
    assert!(store.read_contact_ids(deleted).await.unwrap().is_empty());
}

#[tokio::test]
async fn given_corrupt_contact_row_when_read_then_invalid_user_id() {
    let (store, pool) = create_test_store().await;
    let owner = UserId::new();

    // Use sqlx::query (not query!) to avoid offline mode issues in tests
    sqlx::query("INSERT INTO cn_contacts (owner_id, contact_id, created_at) VALUES (?, ?, ?)")
        .bind(owner.to_string())
        .bind("not-a-uuid")
        .bind("2026-01-01T00:00:00Z")
        .execute(&pool)
        .await
        .unwrap();

    let result = store.read_contact_ids(owner).await;

    assert!(matches!(result, Err(DbError::InvalidUserId { .. })));
}

#[tokio::test]
async fn given_file_path_when_connect_then_contacts_persist_across_reopen() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested").join("contacts.db");
    let owner = UserId::new();
    let alice = UserId::new();

    let store = SqliteContactStore::connect(&path).await.unwrap();
    store.add_contact(owner, alice).await.unwrap();
    drop(store);

    let reopened = SqliteContactStore::connect(&path).await.unwrap();
    let contacts = reopened.read_contact_ids(owner).await.unwrap();

    assert_eq!(contacts, HashSet::from([alice]));
}

#[tokio::test]
async fn given_closed_store_when_read_then_unavailable() {
    let (store, _pool) = create_test_store().await;
    let owner = UserId::new();
    store.add_contact(owner, UserId::new()).await.unwrap();

    store.close().await;

    let error = store.read_contact_ids(owner).await.unwrap_err();
    assert!(
        matches!(error, DbError::Unavailable { .. }),
        "expected Unavailable, got {error:?}"
    );
}
