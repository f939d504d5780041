//! Pure shaping of rows fetched by separate queries into nested view objects.
//!
//! Fetching lives in the services; everything here is deterministic over its
//! inputs.

use std::collections::HashMap;

use crate::models::{
    Exercise, ExerciseProgress, ExerciseSet, SessionDetails, SessionExerciseWithSets, SetEntry,
    Workout, WorkoutDetails, WorkoutExercise, WorkoutSession,
};

/// Distinct ids in first-seen order.
pub fn distinct_exercise_ids(ids: &[i64]) -> Vec<i64> {
    let mut distinct = Vec::with_capacity(ids.len());
    for id in ids {
        if !distinct.contains(id) {
            distinct.push(*id);
        }
    }
    distinct
}

/// Map ordered exercise ids through the library lookup, keeping their order.
///
/// Ids missing from `library` are skipped.
pub fn project_exercises(exercise_ids: &[i64], library: &[Exercise]) -> Vec<Exercise> {
    let by_id: HashMap<i64, &Exercise> = library.iter().map(|e| (e.id, e)).collect();
    exercise_ids
        .iter()
        .filter_map(|id| by_id.get(id).map(|e| (*e).clone()))
        .collect()
}

pub fn workout_details(
    workout: Workout,
    rows: &[WorkoutExercise],
    library: &[Exercise],
) -> WorkoutDetails {
    let ids: Vec<i64> = rows.iter().map(|r| r.exercise_id).collect();
    WorkoutDetails {
        exercises: project_exercises(&ids, library),
        id: workout.id,
        name: workout.name,
        description: workout.description,
        created_at: workout.created_at,
    }
}

/// Sort sets by `created_at` and number them from 1.
///
/// The sort is stable: sets sharing a timestamp keep the order the backend
/// returned them in.
pub fn number_sets(mut sets: Vec<ExerciseSet>) -> Vec<SetEntry> {
    sets.sort_by_key(|s| s.created_at);
    sets.into_iter()
        .enumerate()
        .map(|(i, s)| SetEntry {
            id: s.id,
            reps: s.reps,
            weight: s.weight,
            partial_reps: s.partial_reps,
            set_number: i + 1,
        })
        .collect()
}

/// One progress entry per template exercise, filled from the recorded sets.
///
/// Session exercises that are not in `exercises` are ignored. An exercise
/// counts as completed once it has at least one set. When a session holds
/// several rows for the same exercise, the last row's sets win.
pub fn exercise_progress(
    exercises: &[Exercise],
    recorded: Vec<SessionExerciseWithSets>,
) -> Vec<ExerciseProgress> {
    let mut progress: Vec<ExerciseProgress> = exercises
        .iter()
        .map(|e| ExerciseProgress {
            exercise_id: e.id,
            exercise_name: e.name.clone(),
            sets: Vec::new(),
            completed: false,
        })
        .collect();

    for session_exercise in recorded {
        let Some(index) = exercises
            .iter()
            .position(|e| e.id == session_exercise.exercise_id)
        else {
            continue;
        };
        let sets = number_sets(session_exercise.exercise_sets);
        progress[index].completed = !sets.is_empty();
        progress[index].sets = sets;
    }

    progress
}

pub fn session_details(
    session: WorkoutSession,
    workout_name: String,
    exercises: Vec<Exercise>,
    recorded: Vec<SessionExerciseWithSets>,
) -> SessionDetails {
    let progress = exercise_progress(&exercises, recorded);
    SessionDetails {
        id: session.id,
        started_at: session.started_at,
        workout_id: session.workout_id,
        workout_name,
        exercises,
        progress,
        completed: session.completed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn exercise(id: i64, name: &str) -> Exercise {
        Exercise {
            id,
            name: name.to_string(),
            category: "Chest".to_string(),
        }
    }

    fn row(exercise_id: i64, order_index: i64) -> WorkoutExercise {
        WorkoutExercise {
            id: format!("we{}", exercise_id),
            workout_id: "w1".to_string(),
            exercise_id,
            order_index,
        }
    }

    fn set(id: &str, offset_secs: i64) -> ExerciseSet {
        ExerciseSet {
            id: id.to_string(),
            session_exercise_id: "se1".to_string(),
            reps: 5,
            weight: 100.0,
            partial_reps: 0,
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap()
                + Duration::seconds(offset_secs),
        }
    }

    #[test]
    fn test_project_keeps_row_order_and_skips_missing() {
        let library = vec![exercise(1, "bench_press"), exercise(2, "dip")];

        let projected = project_exercises(&[2, 99, 1], &library);

        let ids: Vec<_> = projected.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_distinct_exercise_ids() {
        assert_eq!(distinct_exercise_ids(&[3, 1, 3]), vec![3, 1]);
    }

    #[test]
    fn test_workout_details_projects_rows() {
        let workout = Workout {
            id: "w1".to_string(),
            user_id: "u1".to_string(),
            name: "Push Day".to_string(),
            description: None,
            created_at: Utc::now(),
        };
        let rows = vec![row(2, 1), row(1, 2)];
        let library = vec![exercise(1, "bench_press"), exercise(2, "dip")];

        let details = workout_details(workout, &rows, &library);

        assert_eq!(details.name, "Push Day");
        let names: Vec<_> = details.exercises.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["dip", "bench_press"]);
    }

    #[test]
    fn test_number_sets_sorts_by_created_at() {
        let sets = vec![set("late", 30), set("early", 0), set("middle", 10)];

        let numbered = number_sets(sets);

        let ids: Vec<_> = numbered.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["early", "middle", "late"]);
        let numbers: Vec<_> = numbered.iter().map(|s| s.set_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn test_number_sets_ties_keep_input_order() {
        let sets = vec![set("first", 0), set("second", 0), set("third", 0)];

        let numbered = number_sets(sets);

        let ids: Vec<_> = numbered.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_exercise_progress() {
        let exercises = vec![exercise(1, "bench_press"), exercise(2, "dip")];
        let recorded = vec![
            SessionExerciseWithSets {
                id: "se1".to_string(),
                exercise_id: 1,
                order_index: 1,
                exercise_sets: vec![set("a", 5), set("b", 0)],
            },
            SessionExerciseWithSets {
                id: "se9".to_string(),
                exercise_id: 42,
                order_index: 9,
                exercise_sets: vec![set("x", 0)],
            },
        ];

        let progress = exercise_progress(&exercises, recorded);

        assert_eq!(progress.len(), 2);
        assert!(progress[0].completed);
        assert_eq!(progress[0].sets[0].id, "b");
        assert!(!progress[1].completed);
        assert!(progress[1].sets.is_empty());
    }

    #[test]
    fn test_exercise_progress_duplicate_rows_last_wins() {
        let exercises = vec![exercise(1, "bench_press")];
        let recorded = vec![
            SessionExerciseWithSets {
                id: "se1".to_string(),
                exercise_id: 1,
                order_index: 1,
                exercise_sets: vec![set("a", 0), set("b", 5)],
            },
            SessionExerciseWithSets {
                id: "se2".to_string(),
                exercise_id: 1,
                order_index: 2,
                exercise_sets: vec![set("c", 0)],
            },
        ];

        let progress = exercise_progress(&exercises, recorded);

        assert_eq!(progress.len(), 1);
        let ids: Vec<_> = progress[0].sets.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["c"]);
    }
}
