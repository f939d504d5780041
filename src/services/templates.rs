use crate::aggregate;
use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{ExerciseOrder, Workout, WorkoutDetails, WorkoutFields, WorkoutSummary};
use crate::repositories::{ExerciseRepository, SessionRepository, WorkoutRepository};

/// How far a template change reached into the template's incomplete sessions.
///
/// Propagation failures are logged and counted here; they never fail the
/// template change itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Propagation {
    pub sessions: usize,
    pub failures: usize,
}

impl Propagation {
    pub fn is_complete(&self) -> bool {
        self.failures == 0
    }

    fn failed(sessions: usize) -> Self {
        Self {
            sessions,
            failures: sessions.max(1),
        }
    }
}

/// Template CRUD and the reconciliation of template edits into incomplete sessions.
#[derive(Clone)]
pub struct TemplateService {
    workouts: WorkoutRepository,
    sessions: SessionRepository,
    exercises: ExerciseRepository,
}

impl TemplateService {
    pub fn new(pool: DbPool) -> Self {
        Self {
            workouts: WorkoutRepository::new(pool.clone()),
            sessions: SessionRepository::new(pool.clone()),
            exercises: ExerciseRepository::new(pool),
        }
    }

    pub async fn create_template(
        &self,
        user_id: &str,
        name: &str,
        description: Option<&str>,
    ) -> Result<Workout> {
        let fields =
            WorkoutFields::parse(name, description).map_err(|e| AppError::Validation(e.into()))?;
        let workout = self.workouts.create(user_id, &fields).await?;
        tracing::info!(workout_id = %workout.id, "Created workout template");
        Ok(workout)
    }

    pub async fn list_templates(&self, user_id: &str) -> Result<Vec<WorkoutSummary>> {
        self.workouts.list_summaries(user_id).await
    }

    pub async fn update_template(
        &self,
        template_id: &str,
        name: &str,
        description: Option<&str>,
    ) -> Result<()> {
        let fields =
            WorkoutFields::parse(name, description).map_err(|e| AppError::Validation(e.into()))?;
        if !self.workouts.update(template_id, &fields).await? {
            return Err(AppError::NotFound("Workout not found".into()));
        }
        Ok(())
    }

    /// Number of sessions, of any state, recorded against the template.
    pub async fn count_sessions(&self, template_id: &str) -> Result<usize> {
        Ok(self.sessions.find_by_workout(template_id).await?.len())
    }

    /// Delete the template with its sessions and exercise list.
    ///
    /// Sessions are removed first since they do not cascade from the template.
    pub async fn delete_template(&self, template_id: &str) -> Result<()> {
        let sessions = self.sessions.delete_by_workout(template_id).await?;
        self.workouts.delete_exercises(template_id).await?;
        if !self.workouts.delete(template_id).await? {
            return Err(AppError::NotFound("Workout not found".into()));
        }
        tracing::info!(workout_id = %template_id, sessions, "Deleted workout template");
        Ok(())
    }

    /// The template with its exercises in order. Exercises missing from the
    /// library are dropped.
    pub async fn workout_details(&self, template_id: &str) -> Result<WorkoutDetails> {
        let workout = self
            .workouts
            .find_by_id(template_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Workout not found".into()))?;

        let rows = self.workouts.find_exercises(template_id).await?;
        let library = if rows.is_empty() {
            Vec::new()
        } else {
            let ids: Vec<i64> = rows.iter().map(|r| r.exercise_id).collect();
            self.exercises
                .find_by_ids(&aggregate::distinct_exercise_ids(&ids))
                .await?
        };

        Ok(aggregate::workout_details(workout, &rows, &library))
    }

    async fn next_order_index(&self, template_id: &str) -> Result<i64> {
        let max = self.workouts.max_order_index(template_id).await?;
        Ok(max.map_or(1, |max| max + 1))
    }

    async fn incomplete_sessions(&self, template_id: &str) -> Option<Vec<String>> {
        match self.sessions.find_incomplete_ids(template_id).await {
            Ok(ids) => Some(ids),
            Err(e) => {
                tracing::error!(workout_id = %template_id, "Error fetching incomplete sessions: {}", e);
                None
            }
        }
    }

    /// Append an exercise to the template and to each of its incomplete sessions.
    ///
    /// Without an explicit `order_index` the exercise goes after the current
    /// last one.
    pub async fn add_exercise_to_template(
        &self,
        template_id: &str,
        exercise_id: i64,
        order_index: Option<i64>,
    ) -> Result<Propagation> {
        let order_index = match order_index {
            Some(index) => index,
            None => self.next_order_index(template_id).await?,
        };

        if let Err(e) = self
            .workouts
            .insert_exercise(template_id, exercise_id, order_index)
            .await
        {
            tracing::error!(workout_id = %template_id, exercise_id, "Error adding exercise to workout: {}", e);
            return Err(e);
        }

        let Some(session_ids) = self.incomplete_sessions(template_id).await else {
            return Ok(Propagation::failed(0));
        };
        if session_ids.is_empty() {
            return Ok(Propagation::default());
        }

        let count = session_ids.len();
        let rows = session_ids
            .into_iter()
            .map(|session_id| (session_id, exercise_id, order_index))
            .collect();
        match self.sessions.insert_exercises(rows).await {
            Ok(_) => {
                tracing::debug!(workout_id = %template_id, sessions = count, "Added exercise to incomplete sessions");
                Ok(Propagation {
                    sessions: count,
                    failures: 0,
                })
            }
            Err(e) => {
                tracing::error!(workout_id = %template_id, exercise_id, "Error adding exercise to incomplete sessions: {}", e);
                Ok(Propagation::failed(count))
            }
        }
    }

    /// Add several exercises after the current ones, keeping their given order.
    pub async fn add_exercises_to_template(
        &self,
        template_id: &str,
        exercise_ids: &[i64],
    ) -> Result<Propagation> {
        let current = self.workouts.find_exercises(template_id).await?.len() as i64;
        let mut total = Propagation::default();
        for (i, exercise_id) in exercise_ids.iter().enumerate() {
            let propagation = self
                .add_exercise_to_template(template_id, *exercise_id, Some(current + i as i64 + 1))
                .await?;
            total.sessions = total.sessions.max(propagation.sessions);
            total.failures += propagation.failures;
        }
        Ok(total)
    }

    /// Remove every occurrence of the exercise from the template and from its
    /// incomplete sessions. Completed sessions keep their history.
    pub async fn remove_exercise_from_template(
        &self,
        template_id: &str,
        exercise_id: i64,
    ) -> Result<Propagation> {
        if let Err(e) = self.workouts.delete_exercise(template_id, exercise_id).await {
            tracing::error!(workout_id = %template_id, exercise_id, "Error removing exercise from workout: {}", e);
            return Err(e);
        }

        let Some(session_ids) = self.incomplete_sessions(template_id).await else {
            return Ok(Propagation::failed(0));
        };
        if session_ids.is_empty() {
            return Ok(Propagation::default());
        }

        let count = session_ids.len();
        match self
            .sessions
            .delete_exercise_from_sessions(&session_ids, exercise_id)
            .await
        {
            Ok(_) => Ok(Propagation {
                sessions: count,
                failures: 0,
            }),
            Err(e) => {
                tracing::error!(workout_id = %template_id, exercise_id, "Error removing exercise from incomplete sessions: {}", e);
                Ok(Propagation::failed(count))
            }
        }
    }

    /// Apply new order indices to the template, then mirror them into each
    /// incomplete session.
    ///
    /// The first template update that fails aborts the call; earlier updates
    /// stay applied. Session update failures are logged and skipped.
    pub async fn reorder_template_exercises(
        &self,
        template_id: &str,
        orders: &[ExerciseOrder],
    ) -> Result<Propagation> {
        for order in orders {
            if let Err(e) = self
                .workouts
                .update_exercise_order(template_id, order.exercise_id, order.order_index)
                .await
            {
                tracing::error!(workout_id = %template_id, exercise_id = order.exercise_id, "Error reordering workout exercises: {}", e);
                return Err(e);
            }
        }

        let Some(session_ids) = self.incomplete_sessions(template_id).await else {
            return Ok(Propagation::failed(0));
        };

        let mut propagation = Propagation {
            sessions: session_ids.len(),
            failures: 0,
        };
        for session_id in &session_ids {
            for order in orders {
                if let Err(e) = self
                    .sessions
                    .update_exercise_order(session_id, order.exercise_id, order.order_index)
                    .await
                {
                    tracing::error!(session_id = %session_id, exercise_id = order.exercise_id, "Error reordering session exercises: {}", e);
                    propagation.failures += 1;
                }
            }
        }
        Ok(propagation)
    }
}
