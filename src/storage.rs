//! Durable device-local key-value storage.
//!
//! String keys map to string values (JSON blobs in practice). Writes
//! overwrite; there is no versioning and no locking.

use rusqlite::OptionalExtension;

use crate::db::DbPool;
use crate::error::Result;
use crate::repositories::with_conn;

#[derive(Clone)]
pub struct LocalStorage {
    pool: DbPool,
}

impl LocalStorage {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn get_item(&self, key: &str) -> Result<Option<String>> {
        let key = key.to_string();
        with_conn(&self.pool, move |conn| {
            let value = conn
                .query_row(
                    "SELECT value FROM local_storage WHERE key = ?",
                    [&key],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(value)
        })
        .await
    }

    pub async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let key = key.to_string();
        let value = value.to_string();
        with_conn(&self.pool, move |conn| {
            conn.execute(
                "INSERT INTO local_storage (key, value) VALUES (?, ?)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                [&key, &value],
            )?;
            Ok(())
        })
        .await
    }

    pub async fn remove_item(&self, key: &str) -> Result<()> {
        let key = key.to_string();
        with_conn(&self.pool, move |conn| {
            conn.execute("DELETE FROM local_storage WHERE key = ?", [&key])?;
            Ok(())
        })
        .await
    }
}
