use serde::Serialize;

use crate::db::DbPool;
use crate::error::Result;
use crate::models::{CategoryFilter, Exercise};
use crate::repositories::{ExerciseRepository, WorkoutRepository};

/// A selectable library exercise as the picker shows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExerciseOption {
    pub exercise: Exercise,
    pub display_name: String,
    pub favorite: bool,
}

#[derive(Clone)]
pub struct LibraryService {
    exercises: ExerciseRepository,
    workouts: WorkoutRepository,
}

impl LibraryService {
    pub fn new(pool: DbPool) -> Self {
        Self {
            exercises: ExerciseRepository::new(pool.clone()),
            workouts: WorkoutRepository::new(pool),
        }
    }

    /// Search the library, flagging the user's favorites.
    ///
    /// With `template_id`, exercises already on that template are left out.
    pub async fn search(
        &self,
        user_id: &str,
        term: &str,
        filter: &CategoryFilter,
        template_id: Option<&str>,
    ) -> Result<Vec<ExerciseOption>> {
        let mut found = self.exercises.search(term.trim(), filter).await?;

        if let Some(template_id) = template_id {
            let rows = self.workouts.find_exercises(template_id).await?;
            found.retain(|e| !rows.iter().any(|r| r.exercise_id == e.id));
        }

        let favorites = self.exercises.favorite_ids(user_id).await?;
        Ok(found
            .into_iter()
            .map(|exercise| ExerciseOption {
                display_name: exercise.display_name(),
                favorite: favorites.contains(&exercise.id),
                exercise,
            })
            .collect())
    }

    pub async fn favorites(&self, user_id: &str) -> Result<Vec<Exercise>> {
        self.exercises.favorites(user_id).await
    }

    /// Returns whether the exercise is a favorite after the toggle.
    pub async fn toggle_favorite(&self, user_id: &str, exercise_id: i64) -> Result<bool> {
        let favorite = self.exercises.toggle_favorite(user_id, exercise_id).await?;
        tracing::debug!(user_id, exercise_id, favorite, "Toggled favorite exercise");
        Ok(favorite)
    }
}
