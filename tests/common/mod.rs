#![allow(dead_code)]

use rive::db::{create_memory_pool, DbPool};
use rive::migrations::run_migrations_for_tests;
use rive::models::Workout;
use rive::services::TemplateService;

pub fn setup_test_db() -> DbPool {
    let pool = create_memory_pool().expect("Failed to create test database");
    run_migrations_for_tests(&pool).expect("Failed to run migrations");
    pool
}

pub fn exercise_id(pool: &DbPool, name: &str) -> i64 {
    let conn = pool.get().unwrap();
    conn.query_row(
        "SELECT id FROM exercise_library WHERE name = ?",
        [name],
        |row| row.get(0),
    )
    .unwrap()
}

pub async fn create_template(
    pool: &DbPool,
    user_id: &str,
    name: &str,
    exercises: &[&str],
) -> Workout {
    let service = TemplateService::new(pool.clone());
    let workout = service.create_template(user_id, name, None).await.unwrap();
    for exercise in exercises {
        service
            .add_exercise_to_template(&workout.id, exercise_id(pool, exercise), None)
            .await
            .unwrap();
    }
    workout
}

/// Make the backend reject writes. `op` is INSERT, UPDATE or DELETE.
pub fn fail_writes(pool: &DbPool, table: &str, op: &str) {
    fail_writes_when(pool, table, op, "1");
}

/// Like `fail_writes`, limited to rows matching `condition` (in terms of `NEW`/`OLD`).
pub fn fail_writes_when(pool: &DbPool, table: &str, op: &str, condition: &str) {
    let conn = pool.get().unwrap();
    conn.execute_batch(&format!(
        "CREATE TRIGGER fail_{op}_{table} BEFORE {op} ON {table} WHEN {condition}
         BEGIN SELECT RAISE(ABORT, 'simulated backend failure'); END;"
    ))
    .unwrap();
}

pub fn count(pool: &DbPool, sql: &str, params: impl rusqlite::Params) -> i64 {
    let conn = pool.get().unwrap();
    conn.query_row(sql, params, |row| row.get(0)).unwrap()
}

/// `(exercise_id, order_index)` rows of a session, ordered.
pub fn session_rows(pool: &DbPool, session_id: &str) -> Vec<(i64, i64)> {
    let conn = pool.get().unwrap();
    let mut stmt = conn
        .prepare(
            "SELECT exercise_id, order_index FROM session_exercises
             WHERE session_id = ? ORDER BY order_index, rowid",
        )
        .unwrap();
    stmt.query_map([session_id], |row| Ok((row.get(0)?, row.get(1)?)))
        .unwrap()
        .collect::<rusqlite::Result<Vec<_>>>()
        .unwrap()
}

/// `(exercise_id, order_index)` rows of a template, ordered.
pub fn template_rows(pool: &DbPool, workout_id: &str) -> Vec<(i64, i64)> {
    let conn = pool.get().unwrap();
    let mut stmt = conn
        .prepare(
            "SELECT exercise_id, order_index FROM workout_exercises
             WHERE workout_id = ? ORDER BY order_index, rowid",
        )
        .unwrap();
    stmt.query_map([workout_id], |row| Ok((row.get(0)?, row.get(1)?)))
        .unwrap()
        .collect::<rusqlite::Result<Vec<_>>>()
        .unwrap()
}
