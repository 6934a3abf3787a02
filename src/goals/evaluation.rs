//! Goal evaluation against rides and manual values.

use chrono::NaiveDate;

use super::aggregation::AggregationType;
use super::error::{GoalError, GoalResult};
use super::types::{Goal, GoalEvaluation, GoalSettings, ManualGoal, RideGoal, RideRecord};

/// Half-open date range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    /// First day included
    pub start: NaiveDate,
    /// First day excluded
    pub end: NaiveDate,
}

impl DateWindow {
    /// January 1st through December 31st of `year`.
    pub fn yearly(year: i32) -> GoalResult<Self> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1).ok_or(GoalError::InvalidYear(year))?;
        let end = NaiveDate::from_ymd_opt(year, 12, 31)
            .and_then(|last| last.succ_opt())
            .ok_or(GoalError::InvalidYear(year))?;
        Ok(Self { start, end })
    }

    /// First day of `month` up to (excluding) the first day of the next month.
    pub fn monthly(year: i32, month: u32) -> GoalResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(GoalError::InvalidMonth(month as i64));
        }
        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or(GoalError::InvalidYear(year))?;
        let next_month_start = if month == 12 {
            year.checked_add(1)
                .and_then(|next_year| NaiveDate::from_ymd_opt(next_year, 1, 1))
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        };
        let end = next_month_start.ok_or(GoalError::InvalidYear(year))?;
        Ok(Self { start, end })
    }

    /// Monthly window of the settings; fails for yearly settings.
    pub fn month_of(settings: &GoalSettings) -> GoalResult<Self> {
        let month = settings.month.ok_or(GoalError::MissingMonth)?;
        Self::monthly(settings.year, month)
    }

    /// Window matching the scope of the settings.
    pub fn for_settings(settings: &GoalSettings) -> GoalResult<Self> {
        match settings.month {
            None => Self::yearly(settings.year),
            Some(_) => Self::month_of(settings),
        }
    }

    /// Whether the date falls inside the window.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }
}

/// Reduce ride distances according to the aggregation.
///
/// `rides` must not be empty.
fn aggregate(aggregation: AggregationType, rides: &[&RideRecord]) -> f64 {
    let distances = rides.iter().map(|ride| ride.distance);
    match aggregation {
        // Duration is rejected for ride goals at construction
        AggregationType::Count | AggregationType::Duration => rides.len() as f64,
        AggregationType::TotalDistance => distances.sum(),
        AggregationType::AvgDistance => distances.sum::<f64>() / rides.len() as f64,
        AggregationType::MaxDistance => distances.fold(f64::NEG_INFINITY, f64::max),
    }
}

/// Apply the reached check and progress rule to an aggregated value.
pub fn evaluate_value(settings: &GoalSettings, current: f64) -> GoalEvaluation {
    let progress = if settings.is_upper_bound {
        if current == 0.0 {
            0.0
        } else {
            current / settings.threshold
        }
    } else {
        settings.threshold - current
    };

    GoalEvaluation::new(settings.check(current), current, progress)
}

impl RideGoal {
    /// Rides passing the constraint and date filters.
    pub fn relevant_rides<'r>(&self, rides: &'r [RideRecord]) -> Vec<&'r RideRecord> {
        let constraints = self.settings.constraints.as_ref();
        rides
            .iter()
            .filter(|ride| constraints.map(|c| c.matches(ride)).unwrap_or(true))
            .filter(|ride| self.window.contains(ride.date))
            .collect()
    }

    /// Evaluate the goal against a set of rides.
    ///
    /// With no matching rides the result is not reached with a current value
    /// of zero; progress is zero for upper bounds and NaN for lower bounds.
    pub fn evaluate(&self, rides: &[RideRecord]) -> GoalEvaluation {
        let relevant = self.relevant_rides(rides);

        let evaluation = if relevant.is_empty() {
            let progress = if self.settings.is_upper_bound {
                0.0
            } else {
                f64::NAN
            };
            GoalEvaluation::new(false, 0.0, progress)
        } else {
            evaluate_value(&self.settings, aggregate(self.settings.aggregation, &relevant))
        };

        tracing::debug!(
            goal_id = self.settings.id,
            rides = relevant.len(),
            current = evaluation.current,
            reached = evaluation.reached,
            "Evaluated ride goal"
        );

        evaluation
    }

    /// Whether the goal is reached for the given rides.
    pub fn has_been_reached(&self, rides: &[RideRecord]) -> bool {
        self.evaluate(rides).reached
    }
}

impl ManualGoal {
    /// Evaluate the tracked value; a missing value counts as zero.
    pub fn evaluate(&self) -> GoalEvaluation {
        let evaluation = evaluate_value(&self.settings, self.value.unwrap_or(0.0));

        tracing::debug!(
            goal_id = self.settings.id,
            current = evaluation.current,
            reached = evaluation.reached,
            "Evaluated manual goal"
        );

        evaluation
    }
}

impl Goal {
    /// Evaluate the goal; manual goals ignore the rides.
    pub fn evaluate(&self, rides: &[RideRecord]) -> GoalEvaluation {
        match self {
            Goal::Ride(goal) => goal.evaluate(rides),
            Goal::Manual(goal) => goal.evaluate(),
        }
    }
}
