//! Set entry for one exercise on the session screen.

use serde::{Deserialize, Serialize};

use crate::models::{Exercise, NewExerciseSet, SetEntry};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum WeightIncrement {
    Small,
    #[default]
    Medium,
    Large,
}

impl WeightIncrement {
    pub fn step(&self) -> f64 {
        match self {
            WeightIncrement::Small => 2.5,
            WeightIncrement::Medium => 5.0,
            WeightIncrement::Large => 10.0,
        }
    }
}

/// A set as entered in the tracker. Values may still be missing.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TrackedSet {
    pub reps: Option<i32>,
    pub weight: Option<f64>,
    pub partial_reps: Option<i32>,
}

impl From<&SetEntry> for TrackedSet {
    fn from(entry: &SetEntry) -> Self {
        Self {
            reps: Some(entry.reps),
            weight: Some(entry.weight),
            partial_reps: Some(entry.partial_reps),
        }
    }
}

pub struct ExerciseTracker {
    exercise: Exercise,
    sets: Vec<TrackedSet>,
    current: TrackedSet,
    increment: WeightIncrement,
}

impl ExerciseTracker {
    /// Start from the sets already recorded for this exercise in the session.
    pub fn new(exercise: Exercise, recorded: &[SetEntry]) -> Self {
        Self {
            exercise,
            sets: recorded.iter().map(TrackedSet::from).collect(),
            current: TrackedSet::default(),
            increment: WeightIncrement::default(),
        }
    }

    pub fn exercise(&self) -> &Exercise {
        &self.exercise
    }

    pub fn sets(&self) -> &[TrackedSet] {
        &self.sets
    }

    pub fn current(&self) -> &TrackedSet {
        &self.current
    }

    /// 1-based number of the set being entered.
    pub fn next_set_number(&self) -> usize {
        self.sets.len() + 1
    }

    pub fn set_increment(&mut self, increment: WeightIncrement) {
        self.increment = increment;
    }

    pub fn set_reps(&mut self, reps: Option<i32>) {
        self.current.reps = reps;
    }

    /// Typed weights are truncated to one decimal place.
    pub fn set_weight(&mut self, weight: Option<f64>) {
        self.current.weight = weight.map(|w| (w * 10.0).floor() / 10.0);
    }

    pub fn set_partial_reps(&mut self, partial_reps: Option<i32>) {
        self.current.partial_reps = partial_reps;
    }

    pub fn step_reps(&mut self, up: bool) {
        self.current.reps = step_count(self.current.reps, up);
    }

    pub fn step_partial_reps(&mut self, up: bool) {
        self.current.partial_reps = step_count(self.current.partial_reps, up);
    }

    /// Move the weight by the selected increment, never below zero.
    pub fn step_weight(&mut self, up: bool) {
        let step = self.increment.step();
        let current = self.current.weight.unwrap_or(0.0);
        let next = if up { current + step } else { current - step };
        if next >= 0.0 {
            self.current.weight = Some(next);
        }
    }

    pub fn add_set(&mut self) -> Result<(), &'static str> {
        if self.current.reps.is_none() || self.current.weight.is_none() {
            return Err("Please enter reps and weight");
        }
        self.sets.push(std::mem::take(&mut self.current));
        Ok(())
    }

    /// Pre-fill the next set from the last one entered.
    pub fn copy_last_set(&mut self) {
        if let Some(last) = self.sets.last() {
            self.current = *last;
        }
    }

    pub fn remove_set(&mut self, index: usize) {
        if index < self.sets.len() {
            self.sets.remove(index);
        }
    }

    /// The sets to save for this exercise.
    pub fn finish(self) -> Vec<NewExerciseSet> {
        self.sets
            .into_iter()
            .filter_map(|s| {
                Some(NewExerciseSet {
                    reps: s.reps?,
                    weight: s.weight?,
                    partial_reps: s.partial_reps,
                })
            })
            .collect()
    }
}

fn step_count(value: Option<i32>, up: bool) -> Option<i32> {
    let current = value.unwrap_or(0);
    if up {
        Some(current + 1)
    } else if current > 0 {
        Some(current - 1)
    } else {
        value
    }
}
