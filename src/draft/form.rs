use serde::{Deserialize, Serialize};

use crate::models::{SetErrors, SetInput, ValidSet};

/// One set added to the exercise being built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftSet {
    pub exercise_id: Option<i64>,
    pub reps: i32,
    pub weight: f64,
    pub partial_reps: i32,
}

impl DraftSet {
    fn new(exercise_id: Option<i64>, set: ValidSet) -> Self {
        Self {
            exercise_id,
            reps: set.reps,
            weight: set.weight,
            partial_reps: set.partial_reps,
        }
    }

    pub fn as_valid(&self) -> ValidSet {
        ValidSet {
            reps: self.reps,
            weight: self.weight,
            partial_reps: self.partial_reps,
        }
    }
}

/// An exercise committed to the draft together with its sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedExercise {
    pub exercise_id: Option<i64>,
    pub exercise_name: String,
    pub sets: Vec<DraftSet>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseRef {
    pub id: Option<i64>,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitError {
    /// Reps, weight or partial reps are typed in but not added as a set.
    UnsavedSetInput,
    NoExercise,
    NoSets,
}

/// The in-progress workout form.
///
/// Serialized as the local draft record. `exercises_in_workout` mirrors
/// `completed_sets` index for index. Which set or exercise is being edited is
/// screen state and never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DraftState {
    pub completed_sets: Vec<CompletedExercise>,
    pub exercise_id: Option<i64>,
    pub exercise_name: String,
    pub exercises_in_workout: Vec<ExerciseRef>,
    pub reps: Option<i32>,
    pub weight: Option<f64>,
    pub partial_reps: Option<i32>,
    pub sets: Vec<DraftSet>,
    #[serde(skip)]
    editing_set: Option<usize>,
    #[serde(skip)]
    editing_exercise: Option<usize>,
}

impl DraftState {
    /// Rebuild `exercises_in_workout` from `completed_sets`.
    pub(crate) fn sync_exercise_list(&mut self) {
        self.exercises_in_workout = self
            .completed_sets
            .iter()
            .map(|c| ExerciseRef {
                id: c.exercise_id,
                name: c.exercise_name.clone(),
            })
            .collect();
    }

    pub fn is_empty(&self) -> bool {
        self.completed_sets.is_empty()
            && self.sets.is_empty()
            && self.exercise_id.is_none()
            && !self.has_unsaved_changes()
    }

    pub fn editing_set(&self) -> Option<usize> {
        self.editing_set
    }

    pub fn editing_exercise(&self) -> Option<usize> {
        self.editing_exercise
    }

    pub fn input(&self) -> SetInput {
        SetInput::new(self.reps, self.weight, self.partial_reps)
    }

    pub fn select_exercise(&mut self, id: i64, name: &str) {
        self.exercise_id = Some(id);
        self.exercise_name = name.to_string();
    }

    pub fn set_reps(&mut self, reps: Option<i32>) {
        self.reps = reps;
    }

    pub fn set_weight(&mut self, weight: Option<f64>) {
        self.weight = weight;
    }

    pub fn set_partial_reps(&mut self, partial_reps: Option<i32>) {
        self.partial_reps = partial_reps;
    }

    fn clear_inputs(&mut self) {
        self.reps = None;
        self.weight = None;
        self.partial_reps = None;
    }

    fn reset_fields(&mut self) {
        self.exercise_id = None;
        self.exercise_name.clear();
        self.clear_inputs();
    }

    /// Validate the typed values and append them as a set.
    pub fn add_set(&mut self) -> Result<(), SetErrors> {
        let set = self.input().validate()?;
        self.sets.push(DraftSet::new(self.exercise_id, set));
        self.clear_inputs();
        Ok(())
    }

    /// Load set `index` into the inputs for editing.
    pub fn edit_set(&mut self, index: usize) -> bool {
        let Some(set) = self.sets.get(index) else {
            return false;
        };
        self.reps = Some(set.reps);
        self.weight = Some(set.weight);
        self.partial_reps = Some(set.partial_reps);
        self.editing_set = Some(index);
        true
    }

    pub fn save_edited_set(&mut self) -> Result<(), SetErrors> {
        let Some(index) = self.editing_set else {
            return Ok(());
        };
        let set = self.input().validate()?;
        if let Some(slot) = self.sets.get_mut(index) {
            *slot = DraftSet::new(self.exercise_id, set);
        }
        self.editing_set = None;
        self.clear_inputs();
        Ok(())
    }

    pub fn cancel_edit_set(&mut self) {
        self.editing_set = None;
        self.clear_inputs();
    }

    /// Remove set `index`. Removing the last set of an exercise being edited
    /// removes that exercise from the draft as well.
    pub fn delete_set(&mut self, index: usize) {
        if index >= self.sets.len() {
            return;
        }
        self.sets.remove(index);
        let editing = self.editing_set;
        match editing {
            Some(i) if i == index => self.cancel_edit_set(),
            Some(i) if i > index => self.editing_set = Some(i - 1),
            _ => {}
        }

        if self.sets.is_empty() {
            if let Some(exercise) = self.editing_exercise.take() {
                self.reset_fields();
                self.delete_exercise(exercise);
            }
        }
    }

    pub fn delete_exercise(&mut self, index: usize) {
        if index < self.completed_sets.len() {
            self.completed_sets.remove(index);
        }
        if index < self.exercises_in_workout.len() {
            self.exercises_in_workout.remove(index);
        }
    }

    /// Reopen committed exercise `index` in the form.
    pub fn edit_exercise(&mut self, index: usize) -> bool {
        let Some(exercise) = self.completed_sets.get(index) else {
            return false;
        };
        self.exercise_id = exercise.exercise_id;
        self.exercise_name = exercise.exercise_name.clone();
        self.sets = exercise
            .sets
            .iter()
            .map(|s| DraftSet {
                exercise_id: exercise.exercise_id,
                ..*s
            })
            .collect();
        self.editing_exercise = Some(index);
        true
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.input().has_values()
    }

    /// Move the exercise being built into the committed list.
    ///
    /// Replaces the entry in place when an existing exercise is being edited,
    /// otherwise appends.
    pub fn commit_exercise(&mut self) -> Result<(), CommitError> {
        if self.has_unsaved_changes() {
            return Err(CommitError::UnsavedSetInput);
        }
        if self.exercise_id.is_none() {
            return Err(CommitError::NoExercise);
        }
        if self.sets.is_empty() {
            return Err(CommitError::NoSets);
        }

        let exercise_id = self.exercise_id;
        let committed = CompletedExercise {
            exercise_id,
            exercise_name: self.exercise_name.clone(),
            sets: std::mem::take(&mut self.sets)
                .into_iter()
                .map(|s| DraftSet { exercise_id, ..s })
                .collect(),
        };
        let entry = ExerciseRef {
            id: exercise_id,
            name: self.exercise_name.clone(),
        };

        match self.editing_exercise.take() {
            Some(index) if index < self.completed_sets.len() => {
                self.completed_sets[index] = committed;
                if let Some(slot) = self.exercises_in_workout.get_mut(index) {
                    *slot = entry;
                }
            }
            _ => {
                self.completed_sets.push(committed);
                self.exercises_in_workout.push(entry);
            }
        }

        self.editing_set = None;
        self.reset_fields();
        Ok(())
    }
}
