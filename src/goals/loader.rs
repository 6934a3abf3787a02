//! Turning stored goal records into concrete goals.

use super::aggregation::GoalKind;
use super::error::{GoalError, GoalResult};
use super::types::{Goal, GoalRecord, ManualGoal, RideGoal, EVERY_MONTH};

/// Build goals from stored records.
///
/// Ride goals stored with the every-month marker are expanded into twelve
/// monthly goals. Manual goals cannot use the marker. Fails on the first
/// invalid record.
pub fn initialize_goals(records: &[GoalRecord]) -> GoalResult<Vec<Goal>> {
    let mut goals = Vec::with_capacity(records.len());

    for record in records {
        match record.month {
            Some(EVERY_MONTH) => {
                if record.goal_type == GoalKind::Manual {
                    return Err(GoalError::InvalidMonth(EVERY_MONTH));
                }
                for month in 1..=12 {
                    let goal = RideGoal::new(record.settings_for_month(Some(month)))?;
                    goals.push(Goal::Ride(goal));
                }
            }
            _ => goals.push(Goal::from_record(record)?),
        }
    }

    tracing::debug!(records = records.len(), goals = goals.len(), "Initialized goals");

    Ok(goals)
}

/// Build a manual goal from a stored record.
pub fn manual_goal_from_record(record: &GoalRecord) -> GoalResult<ManualGoal> {
    match Goal::from_record(record)? {
        Goal::Manual(goal) => Ok(goal),
        Goal::Ride(_) => Err(GoalError::NotManual { id: record.id }),
    }
}
