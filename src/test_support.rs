use crate::db::{create_memory_pool, DbPool};
use crate::migrations::run_migrations_for_tests;
use crate::models::{Workout, WorkoutFields};
use crate::repositories::WorkoutRepository;

pub fn setup_test_db() -> DbPool {
    let pool = create_memory_pool().expect("Failed to create test database");
    run_migrations_for_tests(&pool).expect("Failed to run migrations");
    pool
}

/// Id of a seeded library exercise.
pub fn exercise_id(pool: &DbPool, name: &str) -> i64 {
    let conn = pool.get().unwrap();
    conn.query_row(
        "SELECT id FROM exercise_library WHERE name = ?",
        [name],
        |row| row.get(0),
    )
    .unwrap()
}

/// Template holding the named library exercises at order 1..=n.
pub async fn create_template(
    pool: &DbPool,
    user_id: &str,
    name: &str,
    exercises: &[&str],
) -> Workout {
    let repo = WorkoutRepository::new(pool.clone());
    let workout = repo
        .create(user_id, &WorkoutFields::parse(name, None).unwrap())
        .await
        .unwrap();
    for (i, exercise) in exercises.iter().enumerate() {
        let id = exercise_id(pool, exercise);
        repo.insert_exercise(&workout.id, id, i as i64 + 1)
            .await
            .unwrap();
    }
    workout
}
