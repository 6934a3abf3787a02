//! Display projections of goals.

use serde::{Deserialize, Serialize};

use super::aggregation::format_float;
use super::types::{Goal, GoalEvaluation, GoalScope, RideRecord};

/// Compact goal listing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConciseGoal {
    pub name: String,
    /// Scope and variant, e.g. `"YearlyRideGoal"`
    pub type_label: String,
    /// Condition text, e.g. `"5 rides"`
    pub condition_text: String,
    /// Stored reached flag as 0/1
    pub reached: u8,
}

/// Project goals into compact listing entries using their stored reached flag.
pub fn format_goals_concise(goals: &[Goal]) -> Vec<ConciseGoal> {
    goals
        .iter()
        .map(|goal| ConciseGoal {
            name: goal.name().to_string(),
            type_label: goal.type_label(),
            condition_text: goal.condition_text(),
            reached: u8::from(goal.settings().reached),
        })
        .collect()
}

/// Evaluated goal details for the overview page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalInfoData {
    pub name: String,
    /// Condition text
    pub goal: String,
    pub threshold: f64,
    /// Current value rounded to two decimals
    pub value: f64,
    /// Percent for upper bounds, remaining margin for lower bounds
    pub progress: f64,
    pub reached: u8,
    pub description: Option<String>,
    pub active: bool,
    pub is_manual: bool,
    pub decreasable: bool,
}

/// A goal card on the overview page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalDisplayData {
    pub goal_id: String,
    pub info: GoalInfoData,
    /// Whether progress is drawn as a bar (upper bounds only)
    pub progress_bar: bool,
}

impl GoalDisplayData {
    /// Combine a goal with its evaluation.
    pub fn new(goal: &Goal, evaluation: &GoalEvaluation) -> Self {
        let settings = goal.settings();
        let progress = if settings.is_upper_bound {
            (evaluation.progress * 100.0).round()
        } else {
            evaluation.progress
        };
        let decreasable = match goal {
            Goal::Manual(manual) => manual.is_decreasable(),
            Goal::Ride(_) => false,
        };

        Self {
            goal_id: settings.id.to_string(),
            info: GoalInfoData {
                name: settings.name.clone(),
                goal: goal.condition_text(),
                threshold: settings.threshold,
                value: (evaluation.current * 100.0).round() / 100.0,
                progress,
                reached: u8::from(evaluation.reached),
                description: settings.description.clone(),
                active: settings.active,
                is_manual: goal.is_manual(),
                decreasable,
            },
            progress_bar: settings.is_upper_bound,
        }
    }

    /// Current value formatted for display.
    pub fn value_text(&self) -> String {
        format_float(self.info.value)
    }
}

/// Goals of one year and one month of it, evaluated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GoalOverview {
    pub year_goals: Vec<GoalDisplayData>,
    pub month_goals: Vec<GoalDisplayData>,
    /// Goals whose evaluated reached state differs from the stored flag.
    /// Every-month goals are left out since their months share one flag.
    pub reached_changes: Vec<(i64, bool)>,
}

impl GoalOverview {
    /// Evaluate yearly goals and the goals of `month` against the rides.
    pub fn build(goals: &[Goal], month: u32, rides: &[RideRecord]) -> Self {
        let mut overview = Self::default();

        for goal in goals {
            let target = match goal.scope() {
                GoalScope::Yearly => &mut overview.year_goals,
                GoalScope::Monthly(m) if m == month => &mut overview.month_goals,
                GoalScope::Monthly(_) => continue,
            };

            let evaluation = goal.evaluate(rides);
            let settings = goal.settings();
            if !settings.every_month && evaluation.reached != settings.reached {
                overview.reached_changes.push((goal.id(), evaluation.reached));
            }
            target.push(GoalDisplayData::new(goal, &evaluation));
        }

        overview
    }
}
