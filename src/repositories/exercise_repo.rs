use rusqlite::OptionalExtension;

use crate::db::DbPool;
use crate::error::Result;
use crate::models::exercise::SEARCH_LIMIT;
use crate::models::{query_all, CategoryFilter, Exercise, FromSqliteRow};

use super::{placeholders, with_conn};

/// The shared exercise library and each user's favorites.
#[derive(Clone)]
pub struct ExerciseRepository {
    pool: DbPool,
}

impl ExerciseRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Exercise>> {
        with_conn(&self.pool, move |conn| {
            let mut stmt = conn.prepare("SELECT * FROM exercise_library WHERE id = ?")?;
            let result = stmt.query_row([id], Exercise::from_row).optional()?;
            Ok(result)
        })
        .await
    }

    /// Library rows whose id is in `ids`, in no particular order.
    pub async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<Exercise>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids = ids.to_vec();
        with_conn(&self.pool, move |conn| {
            let sql = format!(
                "SELECT * FROM exercise_library WHERE id IN ({})",
                placeholders(ids.len())
            );
            let exercises = query_all(conn, &sql, rusqlite::params_from_iter(ids.iter()))?;
            Ok(exercises)
        })
        .await
    }

    /// Case-insensitive substring search on name, ordered by name, at most 51 rows.
    pub async fn search(&self, term: &str, filter: &CategoryFilter) -> Result<Vec<Exercise>> {
        let pattern = format!("%{}%", escape_like(term));
        let categories = filter.categories();

        with_conn(&self.pool, move |conn| {
            let mut sql = String::from("SELECT * FROM exercise_library WHERE name LIKE ? ESCAPE '\\'");
            let mut params: Vec<rusqlite::types::Value> = vec![pattern.into()];

            if let Some(categories) = categories {
                sql.push_str(&format!(" AND category IN ({})", placeholders(categories.len())));
                params.extend(categories.into_iter().map(Into::into));
            }
            sql.push_str(" ORDER BY name ASC LIMIT ?");
            params.push(SEARCH_LIMIT.into());

            let exercises = query_all(conn, &sql, rusqlite::params_from_iter(params))?;
            Ok(exercises)
        })
        .await
    }

    // Favorites
    pub async fn favorite_ids(&self, user_id: &str) -> Result<Vec<i64>> {
        let user_id = user_id.to_string();
        with_conn(&self.pool, move |conn| {
            let mut stmt =
                conn.prepare("SELECT exercise_id FROM favorite_exercises WHERE user_id = ?")?;
            let ids = stmt
                .query_map([&user_id], |row| row.get(0))?
                .collect::<rusqlite::Result<Vec<i64>>>()?;
            Ok(ids)
        })
        .await
    }

    pub async fn favorites(&self, user_id: &str) -> Result<Vec<Exercise>> {
        let user_id = user_id.to_string();
        with_conn(&self.pool, move |conn| {
            let exercises = query_all(
                conn,
                "SELECT e.* FROM exercise_library e
                 JOIN favorite_exercises f ON f.exercise_id = e.id
                 WHERE f.user_id = ?
                 ORDER BY e.name ASC",
                [&user_id],
            )?;
            Ok(exercises)
        })
        .await
    }

    pub async fn is_favorite(&self, user_id: &str, exercise_id: i64) -> Result<bool> {
        let user_id = user_id.to_string();
        with_conn(&self.pool, move |conn| {
            let found: bool = conn.query_row(
                "SELECT COUNT(*) > 0 FROM favorite_exercises WHERE user_id = ? AND exercise_id = ?",
                rusqlite::params![user_id, exercise_id],
                |row| row.get(0),
            )?;
            Ok(found)
        })
        .await
    }

    pub async fn add_favorite(&self, user_id: &str, exercise_id: i64) -> Result<()> {
        let user_id = user_id.to_string();
        with_conn(&self.pool, move |conn| {
            conn.execute(
                "INSERT OR IGNORE INTO favorite_exercises (user_id, exercise_id) VALUES (?, ?)",
                rusqlite::params![user_id, exercise_id],
            )?;
            Ok(())
        })
        .await
    }

    pub async fn remove_favorite(&self, user_id: &str, exercise_id: i64) -> Result<bool> {
        let user_id = user_id.to_string();
        with_conn(&self.pool, move |conn| {
            let rows = conn.execute(
                "DELETE FROM favorite_exercises WHERE user_id = ? AND exercise_id = ?",
                rusqlite::params![user_id, exercise_id],
            )?;
            Ok(rows > 0)
        })
        .await
    }

    /// Flip membership and return whether the exercise is now a favorite.
    pub async fn toggle_favorite(&self, user_id: &str, exercise_id: i64) -> Result<bool> {
        if self.is_favorite(user_id, exercise_id).await? {
            self.remove_favorite(user_id, exercise_id).await?;
            Ok(false)
        } else {
            self.add_favorite(user_id, exercise_id).await?;
            Ok(true)
        }
    }
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
