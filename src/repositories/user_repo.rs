use rusqlite::OptionalExtension;

use crate::db::DbPool;
use crate::error::Result;
use crate::models::{FromSqliteRow, UserProfile};

use super::with_conn;

#[derive(Clone)]
pub struct UserRepository {
    pool: DbPool,
}

impl UserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<UserProfile>> {
        let id = id.to_string();
        with_conn(&self.pool, move |conn| {
            let mut stmt = conn
                .prepare("SELECT id, first_name, last_name, email FROM users WHERE id = ?")?;
            let result = stmt.query_row([&id], UserProfile::from_row).optional()?;
            Ok(result)
        })
        .await
    }

    /// Insert the profile row, or overwrite names and email if it exists.
    pub async fn upsert(&self, profile: &UserProfile) -> Result<()> {
        let profile = profile.clone();
        with_conn(&self.pool, move |conn| {
            conn.execute(
                "INSERT INTO users (id, first_name, last_name, email) VALUES (?, ?, ?, ?)
                 ON CONFLICT(id) DO UPDATE SET
                    first_name = excluded.first_name,
                    last_name = excluded.last_name,
                    email = excluded.email",
                rusqlite::params![
                    profile.id,
                    profile.first_name,
                    profile.last_name,
                    profile.email
                ],
            )?;
            Ok(())
        })
        .await
    }
}
