//! The in-progress workout form and its local persistence.

pub mod form;
pub mod store;

pub use form::{CommitError, CompletedExercise, DraftSet, DraftState, ExerciseRef};
pub use store::DraftStore;

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftMode {
    /// Building a new workout; every change is written to the local slot.
    New,
    /// Editing a saved workout. State comes from the backend and is not
    /// persisted locally. `session_id` is the recorded session being edited.
    Editing { session_id: Option<String> },
}

/// A draft bound to the template it will be saved into.
pub struct WorkoutDraft {
    workout_id: String,
    state: DraftState,
    mode: DraftMode,
    store: DraftStore,
}

impl WorkoutDraft {
    /// Resume the locally saved draft for `workout_id`.
    pub async fn open(store: DraftStore, workout_id: &str) -> Result<Self> {
        let state = store.load().await?;
        Ok(Self {
            workout_id: workout_id.to_string(),
            state,
            mode: DraftMode::New,
            store,
        })
    }

    pub(crate) fn editing(
        store: DraftStore,
        workout_id: &str,
        state: DraftState,
        session_id: Option<String>,
    ) -> Self {
        Self {
            workout_id: workout_id.to_string(),
            state,
            mode: DraftMode::Editing { session_id },
            store,
        }
    }

    pub fn workout_id(&self) -> &str {
        &self.workout_id
    }

    pub fn state(&self) -> &DraftState {
        &self.state
    }

    pub fn mode(&self) -> &DraftMode {
        &self.mode
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, DraftMode::Editing { .. })
    }

    /// Apply `f` to the form, then persist the whole record unless editing.
    pub async fn update<R>(&mut self, f: impl FnOnce(&mut DraftState) -> R) -> Result<R> {
        let result = f(&mut self.state);
        if !self.is_editing() {
            self.store.save(&self.state).await?;
        }
        Ok(result)
    }

    pub(crate) fn into_parts(self) -> (String, DraftState, DraftMode, DraftStore) {
        (self.workout_id, self.state, self.mode, self.store)
    }
}
