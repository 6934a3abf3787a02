//! Goal engine error types.

use thiserror::Error;

use super::aggregation::{AggregationType, GoalKind};

/// Errors raised while building goals or changing manual goal values.
///
/// Evaluating a goal that was constructed successfully never fails.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GoalError {
    /// The aggregation cannot be used with this kind of goal.
    #[error("Unsupported aggregation {aggregation} for {kind} goals")]
    UnsupportedAggregation {
        kind: GoalKind,
        aggregation: AggregationType,
    },

    /// Month outside of [1, 12] (or the every-month marker where it is not allowed).
    #[error("Invalid month {0}: month has to be in [1,12]")]
    InvalidMonth(i64),

    /// Year outside of the supported calendar range.
    #[error("Invalid year {0}")]
    InvalidYear(i32),

    /// A monthly computation was requested for a goal without a month.
    #[error("Monthly goal has no month set")]
    MissingMonth,

    /// Unrecognized aggregation identifier.
    #[error("Unknown aggregation type: {0}")]
    UnknownAggregation(String),

    /// Unrecognized goal kind identifier.
    #[error("Unknown goal type: {0}")]
    UnknownGoalKind(String),

    /// A manual value change was requested for a ride goal.
    #[error("Goal {id} is not a manual goal")]
    NotManual { id: i64 },

    /// Manual goal value is missing or below one.
    #[error("Goal {id} cannot be decreased below zero")]
    CannotDecrease { id: i64 },
}

/// Result type for goal operations.
pub type GoalResult<T> = Result<T, GoalError>;
