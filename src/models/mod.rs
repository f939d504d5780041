pub mod exercise;
pub mod from_row;
pub mod set_input;
pub mod user;
pub mod workout;
pub mod workout_session;

pub use exercise::{CategoryFilter, Exercise};
pub use from_row::{query_all, FromSqliteRow};
pub use set_input::{FieldError, SetErrors, SetInput, ValidSet};
pub use user::{AuthSession, AuthUser, Credentials, UserProfile};
pub use workout::{
    ExerciseOrder, Workout, WorkoutDetails, WorkoutExercise, WorkoutFields, WorkoutSummary,
};
pub use workout_session::{
    ExerciseProgress, ExerciseSet, NewExerciseSet, SessionDetails, SessionExercise,
    SessionExerciseWithSets, SessionPeriod, SessionSummary, SetEntry, WorkoutSession,
};
