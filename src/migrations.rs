//! Embedded database migrations
//!
//! Two schemas ship with the binary: the backend tables reached through the
//! repositories, and the device-local key-value table used for drafts.

use crate::db::DbPool;

/// Backend migrations in order, each as (filename, sql_content)
pub const MIGRATIONS: &[(&str, &str)] = &[
    (
        "001_create_users.sql",
        include_str!("../migrations/001_create_users.sql"),
    ),
    (
        "002_create_auth.sql",
        include_str!("../migrations/002_create_auth.sql"),
    ),
    (
        "003_create_exercise_library.sql",
        include_str!("../migrations/003_create_exercise_library.sql"),
    ),
    (
        "004_create_workouts.sql",
        include_str!("../migrations/004_create_workouts.sql"),
    ),
    (
        "005_create_workout_sessions.sql",
        include_str!("../migrations/005_create_workout_sessions.sql"),
    ),
    (
        "006_create_favorite_exercises.sql",
        include_str!("../migrations/006_create_favorite_exercises.sql"),
    ),
    (
        "007_seed_exercise_library.sql",
        include_str!("../migrations/007_seed_exercise_library.sql"),
    ),
];

/// Device-local storage migrations.
pub const LOCAL_MIGRATIONS: &[(&str, &str)] = &[(
    "local/001_create_local_storage.sql",
    include_str!("../migrations/local/001_create_local_storage.sql"),
)];

/// Run all pending backend migrations on the database pool.
///
/// Applied migrations are tracked in a `_migrations` table and skipped on
/// subsequent runs.
pub fn run_migrations(pool: &DbPool) -> anyhow::Result<()> {
    apply(pool, MIGRATIONS)
}

/// Run all pending local-storage migrations.
pub fn run_local_migrations(pool: &DbPool) -> anyhow::Result<()> {
    apply(pool, LOCAL_MIGRATIONS)
}

fn apply(pool: &DbPool, migrations: &[(&str, &str)]) -> anyhow::Result<()> {
    tracing::info!("Running migrations...");

    let conn = pool.get()?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS _migrations (
            name TEXT PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    for (filename, sql) in migrations {
        let already_applied: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM _migrations WHERE name = ?",
                [filename],
                |row| row.get(0),
            )
            .unwrap_or(false);

        if already_applied {
            tracing::debug!("Skipping already applied migration: {}", filename);
            continue;
        }

        tracing::info!("Running migration: {}", filename);

        conn.execute_batch(sql)?;
        conn.execute("INSERT INTO _migrations (name) VALUES (?)", [filename])?;
    }

    tracing::info!("Migrations completed");
    Ok(())
}

/// Run every migration, backend and local, without tracking.
///
/// Suitable for in-memory test databases that are created fresh each time.
pub fn run_migrations_for_tests(pool: &DbPool) -> Result<(), Box<dyn std::error::Error>> {
    let conn = pool.get()?;

    for (_filename, sql) in MIGRATIONS.iter().chain(LOCAL_MIGRATIONS) {
        conn.execute_batch(sql)?;
    }

    Ok(())
}
