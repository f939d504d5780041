use chrono::Utc;
use rusqlite::OptionalExtension;
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::Result;
use crate::models::{
    query_all, ExerciseSet, FromSqliteRow, NewExerciseSet, SessionExercise,
    SessionExerciseWithSets, SessionSummary, WorkoutSession,
};

use super::{placeholders, with_conn};

/// Workout sessions, their per-session exercise copies, and recorded sets.
#[derive(Clone)]
pub struct SessionRepository {
    pool: DbPool,
}

impl SessionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    // Workout Sessions
    pub async fn create(&self, user_id: &str, workout_id: &str) -> Result<WorkoutSession> {
        let session = WorkoutSession {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            workout_id: workout_id.to_string(),
            started_at: Utc::now(),
            ended_at: None,
            completed: false,
        };
        let session_clone = session.clone();

        with_conn(&self.pool, move |conn| {
            conn.execute(
                "INSERT INTO workout_sessions (id, user_id, workout_id, started_at, ended_at, completed)
                 VALUES (?, ?, ?, ?, NULL, 0)",
                rusqlite::params![
                    session_clone.id,
                    session_clone.user_id,
                    session_clone.workout_id,
                    session_clone.started_at
                ],
            )?;
            Ok(())
        })
        .await?;

        Ok(session)
    }

    pub async fn find_by_id(&self, id: &str, user_id: &str) -> Result<Option<WorkoutSession>> {
        let id = id.to_string();
        let user_id = user_id.to_string();
        with_conn(&self.pool, move |conn| {
            let mut stmt =
                conn.prepare("SELECT * FROM workout_sessions WHERE id = ? AND user_id = ?")?;
            let result = stmt
                .query_row([&id, &user_id], WorkoutSession::from_row)
                .optional()?;
            Ok(result)
        })
        .await
    }

    /// Newest first, named after their template.
    pub async fn list_summaries(&self, user_id: &str) -> Result<Vec<SessionSummary>> {
        let user_id = user_id.to_string();
        with_conn(&self.pool, move |conn| {
            let sessions = query_all(
                conn,
                "SELECT s.id, w.name, s.started_at, s.ended_at, s.completed
                 FROM workout_sessions s
                 JOIN workouts w ON w.id = s.workout_id
                 WHERE s.user_id = ?
                 ORDER BY s.started_at DESC, s.rowid DESC",
                [&user_id],
            )?;
            Ok(sessions)
        })
        .await
    }

    pub async fn find_by_workout(&self, workout_id: &str) -> Result<Vec<WorkoutSession>> {
        let workout_id = workout_id.to_string();
        with_conn(&self.pool, move |conn| {
            let sessions = query_all(
                conn,
                "SELECT * FROM workout_sessions WHERE workout_id = ? ORDER BY started_at",
                [&workout_id],
            )?;
            Ok(sessions)
        })
        .await
    }

    pub async fn find_incomplete_ids(&self, workout_id: &str) -> Result<Vec<String>> {
        let workout_id = workout_id.to_string();
        with_conn(&self.pool, move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id FROM workout_sessions WHERE workout_id = ? AND completed = 0",
            )?;
            let ids = stmt
                .query_map([&workout_id], |row| row.get(0))?
                .collect::<rusqlite::Result<Vec<String>>>()?;
            Ok(ids)
        })
        .await
    }

    pub async fn complete(&self, id: &str) -> Result<bool> {
        let id = id.to_string();
        let now = Utc::now();
        with_conn(&self.pool, move |conn| {
            let rows = conn.execute(
                "UPDATE workout_sessions SET completed = 1, ended_at = ? WHERE id = ?",
                rusqlite::params![now, id],
            )?;
            Ok(rows > 0)
        })
        .await
    }

    /// Deleting a session removes its session exercises and sets with it.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let id = id.to_string();
        with_conn(&self.pool, move |conn| {
            let rows = conn.execute("DELETE FROM workout_sessions WHERE id = ?", [&id])?;
            Ok(rows > 0)
        })
        .await
    }

    pub async fn delete_by_workout(&self, workout_id: &str) -> Result<usize> {
        let workout_id = workout_id.to_string();
        with_conn(&self.pool, move |conn| {
            let rows = conn.execute(
                "DELETE FROM workout_sessions WHERE workout_id = ?",
                [&workout_id],
            )?;
            Ok(rows)
        })
        .await
    }

    // Session Exercises
    pub async fn find_exercise(
        &self,
        session_id: &str,
        exercise_id: i64,
    ) -> Result<Option<SessionExercise>> {
        let session_id = session_id.to_string();
        with_conn(&self.pool, move |conn| {
            let mut stmt = conn.prepare(
                "SELECT * FROM session_exercises WHERE session_id = ? AND exercise_id = ? ORDER BY rowid LIMIT 1",
            )?;
            let result = stmt
                .query_row(rusqlite::params![session_id, exercise_id], SessionExercise::from_row)
                .optional()?;
            Ok(result)
        })
        .await
    }

    /// Ordered by `order_index`, ties in insertion order.
    pub async fn find_exercises(&self, session_id: &str) -> Result<Vec<SessionExercise>> {
        let session_id = session_id.to_string();
        with_conn(&self.pool, move |conn| {
            let exercises = query_all(
                conn,
                "SELECT * FROM session_exercises WHERE session_id = ? ORDER BY order_index, rowid",
                [&session_id],
            )?;
            Ok(exercises)
        })
        .await
    }

    pub async fn insert_exercise(
        &self,
        session_id: &str,
        exercise_id: i64,
        order_index: i64,
    ) -> Result<SessionExercise> {
        let mut rows = self
            .insert_exercises(vec![(session_id.to_string(), exercise_id, order_index)])
            .await?;
        Ok(rows.remove(0))
    }

    /// Bulk insert of `(session_id, exercise_id, order_index)` rows; all or nothing.
    pub async fn insert_exercises(
        &self,
        rows: Vec<(String, i64, i64)>,
    ) -> Result<Vec<SessionExercise>> {
        let rows: Vec<SessionExercise> = rows
            .into_iter()
            .map(|(session_id, exercise_id, order_index)| SessionExercise {
                id: Uuid::new_v4().to_string(),
                session_id,
                exercise_id,
                order_index,
            })
            .collect();
        let rows_clone = rows.clone();

        with_conn(&self.pool, move |conn| {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO session_exercises (id, session_id, exercise_id, order_index) VALUES (?, ?, ?, ?)",
                )?;
                for row in &rows_clone {
                    stmt.execute(rusqlite::params![
                        row.id,
                        row.session_id,
                        row.exercise_id,
                        row.order_index
                    ])?;
                }
            }
            tx.commit()?;
            Ok(())
        })
        .await?;

        Ok(rows)
    }

    /// Drop every exercise of a session; their sets go with them.
    pub async fn delete_exercises(&self, session_id: &str) -> Result<usize> {
        let session_id = session_id.to_string();
        with_conn(&self.pool, move |conn| {
            let rows = conn.execute(
                "DELETE FROM session_exercises WHERE session_id = ?",
                [&session_id],
            )?;
            Ok(rows)
        })
        .await
    }

    /// Delete rows for `exercise_id` within the given sessions only.
    pub async fn delete_exercise_from_sessions(
        &self,
        session_ids: &[String],
        exercise_id: i64,
    ) -> Result<usize> {
        if session_ids.is_empty() {
            return Ok(0);
        }
        let session_ids = session_ids.to_vec();
        with_conn(&self.pool, move |conn| {
            let sql = format!(
                "DELETE FROM session_exercises WHERE exercise_id = ? AND session_id IN ({})",
                placeholders(session_ids.len())
            );
            let mut params: Vec<rusqlite::types::Value> = vec![exercise_id.into()];
            params.extend(session_ids.into_iter().map(Into::into));
            let rows = conn.execute(&sql, rusqlite::params_from_iter(params))?;
            Ok(rows)
        })
        .await
    }

    pub async fn update_exercise_order(
        &self,
        session_id: &str,
        exercise_id: i64,
        order_index: i64,
    ) -> Result<usize> {
        let session_id = session_id.to_string();
        with_conn(&self.pool, move |conn| {
            let rows = conn.execute(
                "UPDATE session_exercises SET order_index = ? WHERE session_id = ? AND exercise_id = ?",
                rusqlite::params![order_index, session_id, exercise_id],
            )?;
            Ok(rows)
        })
        .await
    }

    pub async fn set_exercise_order(&self, id: &str, order_index: i64) -> Result<bool> {
        let id = id.to_string();
        with_conn(&self.pool, move |conn| {
            let rows = conn.execute(
                "UPDATE session_exercises SET order_index = ? WHERE id = ?",
                rusqlite::params![order_index, id],
            )?;
            Ok(rows > 0)
        })
        .await
    }

    /// Session exercises with their child sets in one request.
    ///
    /// Sets come back in insertion order; callers sort them for display.
    pub async fn find_exercises_with_sets(
        &self,
        session_id: &str,
    ) -> Result<Vec<SessionExerciseWithSets>> {
        let session_id = session_id.to_string();
        with_conn(&self.pool, move |conn| {
            let exercises: Vec<SessionExercise> = query_all(
                conn,
                "SELECT * FROM session_exercises WHERE session_id = ? ORDER BY order_index, rowid",
                [&session_id],
            )?;
            let sets: Vec<ExerciseSet> = query_all(
                conn,
                "SELECT es.* FROM exercise_sets es
                 JOIN session_exercises se ON se.id = es.session_exercise_id
                 WHERE se.session_id = ?
                 ORDER BY es.rowid",
                [&session_id],
            )?;

            let nested = exercises
                .into_iter()
                .map(|se| {
                    let exercise_sets = sets
                        .iter()
                        .filter(|s| s.session_exercise_id == se.id)
                        .cloned()
                        .collect();
                    SessionExerciseWithSets {
                        id: se.id,
                        exercise_id: se.exercise_id,
                        order_index: se.order_index,
                        exercise_sets,
                    }
                })
                .collect();
            Ok(nested)
        })
        .await
    }

    // Exercise Sets
    pub async fn delete_sets(&self, session_exercise_id: &str) -> Result<usize> {
        let session_exercise_id = session_exercise_id.to_string();
        with_conn(&self.pool, move |conn| {
            let rows = conn.execute(
                "DELETE FROM exercise_sets WHERE session_exercise_id = ?",
                [&session_exercise_id],
            )?;
            Ok(rows)
        })
        .await
    }

    /// Bulk insert; missing partial reps are stored as 0.
    pub async fn insert_sets(
        &self,
        session_exercise_id: &str,
        sets: &[NewExerciseSet],
    ) -> Result<Vec<ExerciseSet>> {
        let rows: Vec<ExerciseSet> = sets
            .iter()
            .map(|set| ExerciseSet {
                id: Uuid::new_v4().to_string(),
                session_exercise_id: session_exercise_id.to_string(),
                reps: set.reps,
                weight: set.weight,
                partial_reps: set.partial_reps.unwrap_or(0),
                created_at: Utc::now(),
            })
            .collect();
        let rows_clone = rows.clone();

        with_conn(&self.pool, move |conn| {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO exercise_sets (id, session_exercise_id, reps, weight, partial_reps, created_at)
                     VALUES (?, ?, ?, ?, ?, ?)",
                )?;
                for row in &rows_clone {
                    stmt.execute(rusqlite::params![
                        row.id,
                        row.session_exercise_id,
                        row.reps,
                        row.weight,
                        row.partial_reps,
                        row.created_at
                    ])?;
                }
            }
            tx.commit()?;
            Ok(())
        })
        .await?;

        Ok(rows)
    }
}
