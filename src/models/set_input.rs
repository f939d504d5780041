use serde::{Deserialize, Serialize};

/// Raw, possibly incomplete values typed into a set form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SetInput {
    pub reps: Option<i32>,
    pub weight: Option<f64>,
    pub partial_reps: Option<i32>,
}

/// A set that passed validation. Missing partial reps become 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidSet {
    pub reps: i32,
    pub weight: f64,
    pub partial_reps: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    Empty,
    Invalid,
}

/// Field-level messages shown inline next to the set inputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetErrors {
    pub reps: Option<FieldError>,
    pub weight: Option<FieldError>,
    pub partial_reps: Option<FieldError>,
}

impl SetErrors {
    pub fn is_empty(&self) -> bool {
        self.reps.is_none() && self.weight.is_none() && self.partial_reps.is_none()
    }

    pub fn reps_message(&self) -> Option<&'static str> {
        self.reps.map(|e| match e {
            FieldError::Empty => "Reps are required",
            FieldError::Invalid => "Reps must be greater than 0",
        })
    }

    pub fn weight_message(&self) -> Option<&'static str> {
        self.weight.map(|e| match e {
            FieldError::Empty => "Weight is required",
            FieldError::Invalid => "Weight must be greater than 0",
        })
    }

    pub fn partial_reps_message(&self) -> Option<&'static str> {
        self.partial_reps
            .map(|_| "Partial reps cannot be negative")
    }
}

impl SetInput {
    pub fn new(reps: Option<i32>, weight: Option<f64>, partial_reps: Option<i32>) -> Self {
        Self {
            reps,
            weight,
            partial_reps,
        }
    }

    pub fn validate(&self) -> Result<ValidSet, SetErrors> {
        let mut errors = SetErrors::default();

        match self.reps {
            None => errors.reps = Some(FieldError::Empty),
            Some(r) if r <= 0 => errors.reps = Some(FieldError::Invalid),
            Some(_) => {}
        }

        match self.weight {
            None => errors.weight = Some(FieldError::Empty),
            Some(w) if !w.is_finite() || w <= 0.0 => errors.weight = Some(FieldError::Invalid),
            Some(_) => {}
        }

        if matches!(self.partial_reps, Some(p) if p < 0) {
            errors.partial_reps = Some(FieldError::Invalid);
        }

        match (self.reps, self.weight) {
            (Some(reps), Some(weight)) if errors.is_empty() => Ok(ValidSet {
                reps,
                weight,
                partial_reps: self.partial_reps.unwrap_or(0),
            }),
            _ => Err(errors),
        }
    }

    /// True when any field holds a value that has not been added as a set.
    pub fn has_values(&self) -> bool {
        self.reps.is_some_and(|r| r != 0)
            || self.weight.is_some_and(|w| w != 0.0)
            || self.partial_reps.is_some_and(|p| p > 0)
    }
}
