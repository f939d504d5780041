use chrono::Utc;
use rusqlite::OptionalExtension;
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::Result;
use crate::models::{
    query_all, FromSqliteRow, Workout, WorkoutExercise, WorkoutFields, WorkoutSummary,
};

use super::with_conn;

/// Templates (`workouts`) and their ordered exercise lists (`workout_exercises`).
#[derive(Clone)]
pub struct WorkoutRepository {
    pool: DbPool,
}

impl WorkoutRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    // Templates
    pub async fn create(&self, user_id: &str, fields: &WorkoutFields) -> Result<Workout> {
        let workout = Workout {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            name: fields.name.clone(),
            description: fields.description.clone(),
            created_at: Utc::now(),
        };
        let workout_clone = workout.clone();

        with_conn(&self.pool, move |conn| {
            conn.execute(
                "INSERT INTO workouts (id, user_id, name, description, created_at) VALUES (?, ?, ?, ?, ?)",
                rusqlite::params![
                    workout_clone.id,
                    workout_clone.user_id,
                    workout_clone.name,
                    workout_clone.description,
                    workout_clone.created_at
                ],
            )?;
            Ok(())
        })
        .await?;

        Ok(workout)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Workout>> {
        let id = id.to_string();
        with_conn(&self.pool, move |conn| {
            let mut stmt = conn.prepare("SELECT * FROM workouts WHERE id = ?")?;
            let result = stmt.query_row([&id], Workout::from_row).optional()?;
            Ok(result)
        })
        .await
    }

    /// Newest first, each with its exercise count.
    pub async fn list_summaries(&self, user_id: &str) -> Result<Vec<WorkoutSummary>> {
        let user_id = user_id.to_string();
        with_conn(&self.pool, move |conn| {
            let summaries = query_all(
                conn,
                "SELECT w.id, w.name, w.description, w.created_at,
                        COUNT(we.id) AS exercise_count
                 FROM workouts w
                 LEFT JOIN workout_exercises we ON we.workout_id = w.id
                 WHERE w.user_id = ?
                 GROUP BY w.id
                 ORDER BY w.created_at DESC, w.rowid DESC",
                [&user_id],
            )?;
            Ok(summaries)
        })
        .await
    }

    pub async fn update(&self, id: &str, fields: &WorkoutFields) -> Result<bool> {
        let id = id.to_string();
        let fields = fields.clone();
        with_conn(&self.pool, move |conn| {
            let rows = conn.execute(
                "UPDATE workouts SET name = ?, description = ? WHERE id = ?",
                rusqlite::params![fields.name, fields.description, id],
            )?;
            Ok(rows > 0)
        })
        .await
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let id = id.to_string();
        with_conn(&self.pool, move |conn| {
            let rows = conn.execute("DELETE FROM workouts WHERE id = ?", [&id])?;
            Ok(rows > 0)
        })
        .await
    }

    // Template exercises
    /// Ordered by `order_index`, ties in insertion order.
    pub async fn find_exercises(&self, workout_id: &str) -> Result<Vec<WorkoutExercise>> {
        let workout_id = workout_id.to_string();
        with_conn(&self.pool, move |conn| {
            let exercises = query_all(
                conn,
                "SELECT * FROM workout_exercises WHERE workout_id = ? ORDER BY order_index, rowid",
                [&workout_id],
            )?;
            Ok(exercises)
        })
        .await
    }

    pub async fn max_order_index(&self, workout_id: &str) -> Result<Option<i64>> {
        let workout_id = workout_id.to_string();
        with_conn(&self.pool, move |conn| {
            let max: Option<i64> = conn.query_row(
                "SELECT MAX(order_index) FROM workout_exercises WHERE workout_id = ?",
                [&workout_id],
                |row| row.get(0),
            )?;
            Ok(max)
        })
        .await
    }

    pub async fn insert_exercise(
        &self,
        workout_id: &str,
        exercise_id: i64,
        order_index: i64,
    ) -> Result<WorkoutExercise> {
        let row = WorkoutExercise {
            id: Uuid::new_v4().to_string(),
            workout_id: workout_id.to_string(),
            exercise_id,
            order_index,
        };
        let row_clone = row.clone();

        with_conn(&self.pool, move |conn| {
            conn.execute(
                "INSERT INTO workout_exercises (id, workout_id, exercise_id, order_index) VALUES (?, ?, ?, ?)",
                rusqlite::params![
                    row_clone.id,
                    row_clone.workout_id,
                    row_clone.exercise_id,
                    row_clone.order_index
                ],
            )?;
            Ok(())
        })
        .await?;

        Ok(row)
    }

    pub async fn delete_exercise(&self, workout_id: &str, exercise_id: i64) -> Result<usize> {
        let workout_id = workout_id.to_string();
        with_conn(&self.pool, move |conn| {
            let rows = conn.execute(
                "DELETE FROM workout_exercises WHERE workout_id = ? AND exercise_id = ?",
                rusqlite::params![workout_id, exercise_id],
            )?;
            Ok(rows)
        })
        .await
    }

    pub async fn delete_exercises(&self, workout_id: &str) -> Result<usize> {
        let workout_id = workout_id.to_string();
        with_conn(&self.pool, move |conn| {
            let rows = conn.execute(
                "DELETE FROM workout_exercises WHERE workout_id = ?",
                [&workout_id],
            )?;
            Ok(rows)
        })
        .await
    }

    pub async fn update_exercise_order(
        &self,
        workout_id: &str,
        exercise_id: i64,
        order_index: i64,
    ) -> Result<usize> {
        let workout_id = workout_id.to_string();
        with_conn(&self.pool, move |conn| {
            let rows = conn.execute(
                "UPDATE workout_exercises SET order_index = ? WHERE workout_id = ? AND exercise_id = ?",
                rusqlite::params![order_index, workout_id, exercise_id],
            )?;
            Ok(rows)
        })
        .await
    }
}
