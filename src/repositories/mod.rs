//! Row-level access to the backend tables.
//!
//! Every public method is one request to the backend. Nothing here spans
//! requests, so callers composing several methods get no atomicity.

pub mod auth_repo;
pub mod exercise_repo;
pub mod session_repo;
pub mod user_repo;
pub mod workout_repo;

pub use auth_repo::AuthRepository;
pub use exercise_repo::ExerciseRepository;
pub use session_repo::SessionRepository;
pub use user_repo::UserRepository;
pub use workout_repo::WorkoutRepository;

use rusqlite::Connection;

use crate::db::DbPool;
use crate::error::{AppError, Result};

/// Run `f` against a pooled connection on the blocking thread pool.
pub(crate) async fn with_conn<T, F>(pool: &DbPool, f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut conn = pool.get()?;
        f(&mut conn)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))?
}

/// `?, ?, ?` with `n` placeholders, for `IN (...)` filters.
pub(crate) fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}
