use crate::{ContactStore, DbError, Result as DbErrorResult};

use cn_core::UserId;

use std::collections::HashSet;
use std::panic::Location;
use std::path::Path;

use async_trait::async_trait;
use chrono::Utc;
use error_location::ErrorLocation;
use log::info;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

const MAX_CONNECTIONS: u32 = 5;

/// Contact store backed by a SQLite database
#[derive(Clone)]
pub struct SqliteContactStore {
    pool: SqlitePool,
}

impl SqliteContactStore {
    /// Open (creating if missing) the database at `path` and run migrations
    pub async fn connect(path: impl AsRef<Path>) -> DbErrorResult<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| DbError::Initialization {
                    message: format!("Failed to create database directory: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await?;

        info!("Opened contact store at {}", path.display());

        Self::from_pool(pool).await
    }

    /// Wrap an existing pool, running migrations against it
    pub async fn from_pool(pool: SqlitePool) -> DbErrorResult<Self> {
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    /// Close the pool. Later reads fail with `DbError::Unavailable`.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed contact store");
    }

    /// Add `contact_id` to `owner_id`'s contact list. Returns false if already present.
    pub async fn add_contact(&self, owner_id: UserId, contact_id: UserId) -> DbErrorResult<bool> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO cn_contacts (owner_id, contact_id, created_at) VALUES (?, ?, ?)",
        )
        .bind(owner_id.to_string())
        .bind(contact_id.to_string())
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Remove `contact_id` from `owner_id`'s contact list. Returns false if absent.
    pub async fn remove_contact(
        &self,
        owner_id: UserId,
        contact_id: UserId,
    ) -> DbErrorResult<bool> {
        let result = sqlx::query("DELETE FROM cn_contacts WHERE owner_id = ? AND contact_id = ?")
            .bind(owner_id.to_string())
            .bind(contact_id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Account deletion: drop the user's own list and every reference to them.
    /// Returns the number of relationships removed.
    pub async fn remove_user(&self, user_id: UserId) -> DbErrorResult<u64> {
        let user_id = user_id.to_string();
        let result = sqlx::query("DELETE FROM cn_contacts WHERE owner_id = ? OR contact_id = ?")
            .bind(&user_id)
            .bind(&user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl ContactStore for SqliteContactStore {
    async fn read_contact_ids(&self, user_id: UserId) -> DbErrorResult<HashSet<UserId>> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT contact_id FROM cn_contacts WHERE owner_id = ?")
                .bind(user_id.to_string())
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter()
            .map(|(contact_id,)| {
                UserId::parse(&contact_id).map_err(|_| DbError::InvalidUserId {
                    column: "cn_contacts.contact_id",
                    value: contact_id.clone(),
                    location: ErrorLocation::from(Location::caller()),
                })
            })
            .collect()
    }
}
