use chrono::NaiveDate;

use crate::aggregate;
use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{
    ExerciseSet, NewExerciseSet, SessionDetails, SessionPeriod, SessionSummary, WorkoutSession,
};
use crate::repositories::{ExerciseRepository, SessionRepository, WorkoutRepository};

#[derive(Clone)]
pub struct SessionService {
    sessions: SessionRepository,
    workouts: WorkoutRepository,
    exercises: ExerciseRepository,
}

impl SessionService {
    pub fn new(pool: DbPool) -> Self {
        Self {
            sessions: SessionRepository::new(pool.clone()),
            workouts: WorkoutRepository::new(pool.clone()),
            exercises: ExerciseRepository::new(pool),
        }
    }

    async fn owned_session(&self, user_id: &str, session_id: &str) -> Result<WorkoutSession> {
        self.sessions
            .find_by_id(session_id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Session not found".into()))
    }

    /// Open an incomplete session seeded with a copy of the template's exercises.
    pub async fn start_session(&self, user_id: &str, template_id: &str) -> Result<WorkoutSession> {
        let template = self
            .workouts
            .find_by_id(template_id)
            .await?
            .filter(|w| w.user_id == user_id)
            .ok_or_else(|| AppError::NotFound("Workout not found".into()))?;

        let session = self.sessions.create(user_id, &template.id).await?;
        let rows: Vec<(String, i64, i64)> = self
            .workouts
            .find_exercises(&template.id)
            .await?
            .into_iter()
            .map(|e| (session.id.clone(), e.exercise_id, e.order_index))
            .collect();
        let copied = rows.len();
        if !rows.is_empty() {
            self.sessions.insert_exercises(rows).await?;
        }

        tracing::info!(session_id = %session.id, workout_id = %template.id, exercises = copied, "Started workout session");
        Ok(session)
    }

    /// The user's sessions, newest first, narrowed to `period` around `today`.
    pub async fn list_sessions(
        &self,
        user_id: &str,
        period: SessionPeriod,
        today: NaiveDate,
    ) -> Result<Vec<SessionSummary>> {
        let sessions = self.sessions.list_summaries(user_id).await?;
        Ok(period.filter(&sessions, today))
    }

    /// The session with its ordered exercises and numbered sets.
    ///
    /// Exercises come from the session's own copy, so later template edits
    /// do not rewrite completed sessions.
    pub async fn session_details(&self, user_id: &str, session_id: &str) -> Result<SessionDetails> {
        let session = self.owned_session(user_id, session_id).await?;
        let workout = self
            .workouts
            .find_by_id(&session.workout_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Workout not found".into()))?;

        let recorded = self.sessions.find_exercises_with_sets(&session.id).await?;
        let ids: Vec<i64> = recorded.iter().map(|r| r.exercise_id).collect();
        let library = if ids.is_empty() {
            Vec::new()
        } else {
            self.exercises
                .find_by_ids(&aggregate::distinct_exercise_ids(&ids))
                .await?
        };
        let exercises = aggregate::project_exercises(&ids, &library);

        Ok(aggregate::session_details(
            session,
            workout.name,
            exercises,
            recorded,
        ))
    }

    /// Replace the recorded sets of one exercise in a session.
    ///
    /// The session-exercise row is created if missing, otherwise its order
    /// index is updated.
    pub async fn save_exercise_sets(
        &self,
        session_id: &str,
        exercise_id: i64,
        order_index: i64,
        sets: &[NewExerciseSet],
    ) -> Result<Vec<ExerciseSet>> {
        let session_exercise = match self.sessions.find_exercise(session_id, exercise_id).await? {
            Some(existing) => {
                self.sessions
                    .set_exercise_order(&existing.id, order_index)
                    .await?;
                existing
            }
            None => {
                self.sessions
                    .insert_exercise(session_id, exercise_id, order_index)
                    .await?
            }
        };

        self.sessions.delete_sets(&session_exercise.id).await?;
        if sets.is_empty() {
            tracing::debug!(session_id, exercise_id, "Cleared exercise sets");
            return Ok(Vec::new());
        }
        let saved = self.sessions.insert_sets(&session_exercise.id, sets).await?;
        tracing::info!(session_id, exercise_id, sets = saved.len(), "Saved exercise sets");
        Ok(saved)
    }

    pub async fn complete_session(&self, user_id: &str, session_id: &str) -> Result<()> {
        let session = self.owned_session(user_id, session_id).await?;
        self.sessions.complete(&session.id).await?;
        tracing::info!(session_id, "Completed workout session");
        Ok(())
    }

    /// Delete the session along with its exercises and sets.
    pub async fn cancel_session(&self, user_id: &str, session_id: &str) -> Result<()> {
        let session = self.owned_session(user_id, session_id).await?;
        self.sessions.delete(&session.id).await?;
        tracing::info!(session_id, "Cancelled workout session");
        Ok(())
    }
}
