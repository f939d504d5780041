use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::{Exercise, FromSqliteRow, ValidSet};

/// One performance of a template. Incomplete sessions are mutable, completed ones are history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSession {
    pub id: String,
    pub user_id: String,
    pub workout_id: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub completed: bool,
}

impl FromSqliteRow for WorkoutSession {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            workout_id: row.get("workout_id")?,
            started_at: row.get("started_at")?,
            ended_at: row.get("ended_at")?,
            completed: row.get("completed")?,
        })
    }
}

/// Session list entry carrying the template name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub id: String,
    pub name: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub completed: bool,
}

impl FromSqliteRow for SessionSummary {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            started_at: row.get("started_at")?,
            ended_at: row.get("ended_at")?,
            completed: row.get("completed")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionExercise {
    pub id: String,
    pub session_id: String,
    pub exercise_id: i64,
    pub order_index: i64,
}

impl FromSqliteRow for SessionExercise {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            session_id: row.get("session_id")?,
            exercise_id: row.get("exercise_id")?,
            order_index: row.get("order_index")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseSet {
    pub id: String,
    pub session_exercise_id: String,
    pub reps: i32,
    pub weight: f64,
    pub partial_reps: i32,
    pub created_at: DateTime<Utc>,
}

impl FromSqliteRow for ExerciseSet {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            session_exercise_id: row.get("session_exercise_id")?,
            reps: row.get("reps")?,
            weight: row.get("weight")?,
            partial_reps: row.get("partial_reps")?,
            created_at: row.get("created_at")?,
        })
    }
}

/// A session exercise with its child sets, as returned by the nested read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionExerciseWithSets {
    pub id: String,
    pub exercise_id: i64,
    pub order_index: i64,
    pub exercise_sets: Vec<ExerciseSet>,
}

/// A set as presented: `set_number` is a 1-based display index, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetEntry {
    pub id: String,
    pub reps: i32,
    pub weight: f64,
    pub partial_reps: i32,
    pub set_number: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExerciseProgress {
    pub exercise_id: i64,
    pub exercise_name: String,
    pub sets: Vec<SetEntry>,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionDetails {
    pub id: String,
    pub started_at: DateTime<Utc>,
    pub workout_id: String,
    pub workout_name: String,
    pub exercises: Vec<Exercise>,
    pub progress: Vec<ExerciseProgress>,
    pub completed: bool,
}

/// Values written for one set when an exercise is saved in a session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NewExerciseSet {
    pub reps: i32,
    pub weight: f64,
    pub partial_reps: Option<i32>,
}

impl From<ValidSet> for NewExerciseSet {
    fn from(set: ValidSet) -> Self {
        Self {
            reps: set.reps,
            weight: set.weight,
            partial_reps: Some(set.partial_reps),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPeriod {
    #[default]
    Week,
    Month,
    All,
}

impl SessionPeriod {
    /// Whether a session started at `started_at` falls in the period containing `today`.
    ///
    /// Weeks run Sunday through Saturday.
    pub fn contains(&self, started_at: DateTime<Utc>, today: NaiveDate) -> bool {
        let date = started_at.date_naive();
        match self {
            SessionPeriod::Week => {
                let days_from_sunday = today.weekday().num_days_from_sunday() as i64;
                let start = today - Duration::days(days_from_sunday);
                let end = start + Duration::days(6);
                date >= start && date <= end
            }
            SessionPeriod::Month => date.year() == today.year() && date.month() == today.month(),
            SessionPeriod::All => true,
        }
    }

    pub fn filter(&self, sessions: &[SessionSummary], today: NaiveDate) -> Vec<SessionSummary> {
        sessions
            .iter()
            .filter(|s| self.contains(s.started_at, today))
            .cloned()
            .collect()
    }
}
