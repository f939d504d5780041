use crate::aggregate;
use crate::db::DbPool;
use crate::draft::{CompletedExercise, DraftMode, DraftSet, DraftState, DraftStore, WorkoutDraft};
use crate::error::{AppError, Result};
use crate::models::NewExerciseSet;
use crate::repositories::{SessionRepository, WorkoutRepository};
use crate::storage::LocalStorage;

use super::TemplateService;

/// Creating, resuming, saving and discarding workout drafts.
#[derive(Clone)]
pub struct DraftService {
    templates: TemplateService,
    workouts: WorkoutRepository,
    sessions: SessionRepository,
    store: DraftStore,
}

impl DraftService {
    /// `pool` is the backend, `local_pool` the device-local store.
    pub fn new(pool: DbPool, local_pool: DbPool) -> Self {
        Self {
            templates: TemplateService::new(pool.clone()),
            workouts: WorkoutRepository::new(pool.clone()),
            sessions: SessionRepository::new(pool),
            store: DraftStore::new(LocalStorage::new(local_pool)),
        }
    }

    /// Create the template a new workout is recorded into and start an empty draft for it.
    ///
    /// There is a single draft slot: any earlier unsaved draft is replaced.
    pub async fn begin(
        &self,
        user_id: &str,
        name: &str,
        description: Option<&str>,
    ) -> Result<WorkoutDraft> {
        let workout = self.templates.create_template(user_id, name, description).await?;
        self.store.clear().await?;
        self.store.set_active_workout_id(&workout.id).await?;
        WorkoutDraft::open(self.store.clone(), &workout.id).await
    }

    /// The draft left behind by an interrupted workout, if any.
    pub async fn resume(&self) -> Result<Option<WorkoutDraft>> {
        match self.store.active_workout_id().await? {
            Some(workout_id) => Ok(Some(
                WorkoutDraft::open(self.store.clone(), &workout_id).await?,
            )),
            None => Ok(None),
        }
    }

    /// Load a saved workout into a draft for editing.
    ///
    /// Sets come from the most recent completed session of the template.
    pub async fn edit(&self, user_id: &str, workout_id: &str) -> Result<WorkoutDraft> {
        let details = self.templates.workout_details(workout_id).await?;

        let latest = self
            .sessions
            .find_by_workout(workout_id)
            .await?
            .into_iter()
            .filter(|s| s.completed && s.user_id == user_id)
            .max_by_key(|s| s.started_at);
        let recorded = match &latest {
            Some(session) => self.sessions.find_exercises_with_sets(&session.id).await?,
            None => Vec::new(),
        };

        let mut state = DraftState::default();
        state.completed_sets = details
            .exercises
            .iter()
            .map(|exercise| {
                let sets = recorded
                    .iter()
                    .find(|r| r.exercise_id == exercise.id)
                    .map(|r| aggregate::number_sets(r.exercise_sets.clone()))
                    .unwrap_or_default();
                CompletedExercise {
                    exercise_id: Some(exercise.id),
                    exercise_name: exercise.name.clone(),
                    sets: sets
                        .into_iter()
                        .map(|s| DraftSet {
                            exercise_id: Some(exercise.id),
                            reps: s.reps,
                            weight: s.weight,
                            partial_reps: s.partial_reps,
                        })
                        .collect(),
                }
            })
            .collect();
        state.sync_exercise_list();

        Ok(WorkoutDraft::editing(
            self.store.clone(),
            workout_id,
            state,
            latest.map(|s| s.id),
        ))
    }

    /// Write the draft to the backend and clear the local slot.
    ///
    /// The template's exercise list becomes the draft's exercises, replacing
    /// the old list when editing. The entered sets are recorded as a completed
    /// session, or replace the edited session's sets. Returns the session id.
    pub async fn save(&self, user_id: &str, draft: WorkoutDraft) -> Result<String> {
        let (workout_id, state, mode, store) = draft.into_parts();
        let exercises: Vec<(i64, &CompletedExercise)> = state
            .completed_sets
            .iter()
            .filter_map(|c| c.exercise_id.map(|id| (id, c)))
            .collect();
        if exercises.is_empty() {
            return Err(AppError::Validation(
                "Add at least one exercise before saving".into(),
            ));
        }

        if matches!(mode, DraftMode::Editing { .. }) {
            if let Err(e) = self.workouts.delete_exercises(&workout_id).await {
                tracing::error!(workout_id = %workout_id, "Error deleting workout exercises: {}", e);
                return Err(e);
            }
        }
        for (i, (exercise_id, _)) in exercises.iter().enumerate() {
            if let Err(e) = self
                .workouts
                .insert_exercise(&workout_id, *exercise_id, i as i64 + 1)
                .await
            {
                tracing::error!(workout_id = %workout_id, exercise_id, "Error saving exercise to workout: {}", e);
                return Err(e);
            }
        }

        let session_id = match mode {
            DraftMode::Editing {
                session_id: Some(session_id),
            } => {
                self.sessions.delete_exercises(&session_id).await?;
                session_id
            }
            _ => {
                let session = self.sessions.create(user_id, &workout_id).await?;
                session.id
            }
        };

        let rows = exercises
            .iter()
            .enumerate()
            .map(|(i, (exercise_id, _))| (session_id.clone(), *exercise_id, i as i64 + 1))
            .collect();
        let session_exercises = self.sessions.insert_exercises(rows).await?;
        for (session_exercise, (_, completed)) in session_exercises.iter().zip(&exercises) {
            if completed.sets.is_empty() {
                continue;
            }
            let sets: Vec<NewExerciseSet> =
                completed.sets.iter().map(|s| s.as_valid().into()).collect();
            if let Err(e) = self.sessions.insert_sets(&session_exercise.id, &sets).await {
                tracing::error!(session_id = %session_id, "Error saving sets to workout: {}", e);
                return Err(e);
            }
        }
        self.sessions.complete(&session_id).await?;

        store.clear().await?;
        tracing::info!(workout_id = %workout_id, session_id = %session_id, exercises = exercises.len(), "Saved workout");
        Ok(session_id)
    }

    /// Abandon the draft. A new workout's template is deleted; a failure to
    /// delete it is logged and the local slot is cleared regardless.
    pub async fn cancel(&self, draft: WorkoutDraft) -> Result<()> {
        let (workout_id, _, mode, store) = draft.into_parts();
        if mode == DraftMode::New {
            match self.templates.delete_template(&workout_id).await {
                Ok(()) => tracing::info!(workout_id = %workout_id, "Deleted abandoned workout"),
                Err(e) => tracing::error!(workout_id = %workout_id, "Error deleting workout: {}", e),
            }
        }
        store.clear().await
    }
}
