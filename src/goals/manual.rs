//! Changes to manually tracked goal values.

use serde::{Deserialize, Serialize};

use super::error::{GoalError, GoalResult};
use super::types::ManualGoal;

/// A change requested for a manual goal's value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "action", content = "value")]
pub enum ManualChange {
    /// Add one occurrence
    Increase,
    /// Remove one occurrence
    Decrease,
    /// Replace the value (e.g. an entered duration)
    Set(f64),
}

impl ManualChange {
    /// Compute the new value for goal `id` from its stored value.
    pub fn apply(&self, id: i64, old: Option<f64>) -> GoalResult<f64> {
        match self {
            ManualChange::Increase => Ok(old.unwrap_or(0.0) + 1.0),
            ManualChange::Decrease => match old {
                Some(value) if value >= 1.0 => Ok(value - 1.0),
                _ => Err(GoalError::CannotDecrease { id }),
            },
            ManualChange::Set(value) => Ok(*value),
        }
    }
}

impl ManualGoal {
    /// Apply a change to the tracked value.
    ///
    /// On error the value is left untouched.
    pub fn apply(&mut self, change: ManualChange) -> GoalResult<f64> {
        let value = change.apply(self.settings.id, self.value)?;
        self.value = Some(value);
        Ok(value)
    }

    /// Add one to the value.
    pub fn increase(&mut self) -> GoalResult<f64> {
        self.apply(ManualChange::Increase)
    }

    /// Subtract one from the value; fails if it is missing or below one.
    pub fn decrease(&mut self) -> GoalResult<f64> {
        self.apply(ManualChange::Decrease)
    }

    /// Replace the value.
    pub fn set_value(&mut self, value: f64) -> GoalResult<f64> {
        self.apply(ManualChange::Set(value))
    }

    /// Whether a decrease would succeed.
    pub fn is_decreasable(&self) -> bool {
        self.value.map(|value| value >= 1.0).unwrap_or(false)
    }
}
