//! Goal tracking module.
//!
//! Evaluates rider goals against recorded rides or manually tracked values:
//! - Ride goals aggregate ride counts and distances per year or month
//! - Manual goals compare a hand-maintained count or duration
//! - Formatting helpers for compact listings and the goal overview

pub mod aggregation;
pub mod error;
pub mod evaluation;
pub mod format;
pub mod loader;
pub mod manager;
pub mod manual;
pub mod types;

// Re-exports for convenience
pub use aggregation::{
    format_condition, format_float, is_acceptable_aggregation, AggregationType, GoalKind,
};
pub use error::{GoalError, GoalResult};
pub use evaluation::DateWindow;
pub use format::{format_goals_concise, ConciseGoal, GoalDisplayData, GoalInfoData, GoalOverview};
pub use loader::initialize_goals;
pub use manager::GoalManager;
pub use manual::ManualChange;
pub use types::{
    Goal, GoalConstraints, GoalEvaluation, GoalRecord, GoalScope, GoalSettings, ManualGoal,
    RideGoal, RideRecord, EVERY_MONTH,
};
