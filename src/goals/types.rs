//! Goal type definitions.
//!
//! A goal is either evaluated against recorded rides ([`RideGoal`]) or against
//! a value the rider tracks by hand ([`ManualGoal`]). Both share the settings
//! stored in [`GoalSettings`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::aggregation::{is_acceptable_aggregation, AggregationType, GoalKind};
use super::error::{GoalError, GoalResult};

/// Stored month value meaning "every month of the year".
pub const EVERY_MONTH: i64 = 0;

/// A ride as seen by the goal engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RideRecord {
    /// Day the ride took place
    pub date: NaiveDate,
    /// Ride distance in meters
    pub distance: f64,
    /// Terrain / ride type name (e.g. "MTB")
    ///
    /// The database requires a terrain type, so a ride stored without one
    /// is read back as `"Road"`.
    pub ride_type: Option<String>,
    /// Name of the bike used
    pub bike: Option<String>,
}

impl RideRecord {
    /// Create a ride without bike or ride type.
    pub fn new(date: NaiveDate, distance: f64) -> Self {
        Self {
            date,
            distance,
            ride_type: None,
            bike: None,
        }
    }

    /// Set the bike name.
    pub fn with_bike(mut self, bike: impl Into<String>) -> Self {
        self.bike = Some(bike.into());
        self
    }

    /// Set the ride type name.
    pub fn with_ride_type(mut self, ride_type: impl Into<String>) -> Self {
        self.ride_type = Some(ride_type.into());
        self
    }
}

/// Filters restricting which rides count toward a goal.
///
/// Both lists are optional; when both are set a ride has to match both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalConstraints {
    /// Accepted bike names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bike: Option<Vec<String>>,
    /// Accepted ride types
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ride_type: Option<Vec<String>>,
}

impl GoalConstraints {
    /// Whether no filter is set.
    pub fn is_empty(&self) -> bool {
        self.bike.is_none() && self.ride_type.is_none()
    }

    /// Whether a ride passes all configured filters.
    pub fn matches(&self, ride: &RideRecord) -> bool {
        fn contained(accepted: &Option<Vec<String>>, value: &Option<String>) -> bool {
            match accepted {
                None => true,
                Some(values) => value
                    .as_ref()
                    .map(|v| values.iter().any(|accepted| accepted == v))
                    .unwrap_or(false),
            }
        }

        contained(&self.bike, &ride.bike) && contained(&self.ride_type, &ride.ride_type)
    }
}

/// Temporal scope of a goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GoalScope {
    /// Whole calendar year
    Yearly,
    /// A single month (1-12)
    Monthly(u32),
}

impl GoalScope {
    /// Label used in compact goal listings.
    pub fn label(&self) -> &'static str {
        match self {
            GoalScope::Yearly => "Yearly",
            GoalScope::Monthly(_) => "Monthly",
        }
    }
}

/// Settings shared by all goal variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalSettings {
    /// Database identifier
    pub id: i64,
    /// Display name
    pub name: String,
    /// Optional free text description
    pub description: Option<String>,
    /// Year the goal applies to
    pub year: i32,
    /// Month the goal applies to, `None` for the whole year
    pub month: Option<u32>,
    /// Reduction applied to the goal data
    pub aggregation: AggregationType,
    /// Value to reach (upper bound) or stay below (lower bound)
    pub threshold: f64,
    /// Whether reaching means meeting or exceeding the threshold
    pub is_upper_bound: bool,
    /// Whether the goal is shown as active
    pub active: bool,
    /// Last known reached state; advisory only
    pub reached: bool,
    /// Ride filters
    pub constraints: Option<GoalConstraints>,
    /// Expanded from an every-month record, whose twelve months share one
    /// stored reached flag
    #[serde(default)]
    pub every_month: bool,
}

impl GoalSettings {
    /// Create yearly, active, upper-bound settings.
    pub fn new(
        id: i64,
        name: impl Into<String>,
        year: i32,
        aggregation: AggregationType,
        threshold: f64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            year,
            month: None,
            aggregation,
            threshold,
            is_upper_bound: true,
            active: true,
            reached: false,
            constraints: None,
            every_month: false,
        }
    }

    /// Restrict the settings to a single month.
    pub fn with_month(mut self, month: u32) -> Self {
        self.month = Some(month);
        self
    }

    /// Turn the threshold into a lower bound.
    pub fn lower_bound(mut self) -> Self {
        self.is_upper_bound = false;
        self
    }

    /// Attach ride filters.
    pub fn with_constraints(mut self, constraints: GoalConstraints) -> Self {
        self.constraints = Some(constraints);
        self
    }

    /// Temporal scope derived from the month.
    pub fn scope(&self) -> GoalScope {
        match self.month {
            None => GoalScope::Yearly,
            Some(month) => GoalScope::Monthly(month),
        }
    }

    /// Check that the settings form a valid goal of the given kind.
    pub(crate) fn validate(&self, kind: GoalKind) -> GoalResult<()> {
        if !is_acceptable_aggregation(kind, self.aggregation) {
            return Err(GoalError::UnsupportedAggregation {
                kind,
                aggregation: self.aggregation,
            });
        }

        if let Some(month) = self.month {
            if !(1..=12).contains(&month) {
                return Err(GoalError::InvalidMonth(month as i64));
            }
        }

        Ok(())
    }

    /// Whether a value satisfies the threshold.
    pub fn check(&self, value: f64) -> bool {
        if self.is_upper_bound {
            value >= self.threshold
        } else {
            value <= self.threshold
        }
    }
}

/// Result of evaluating a goal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalEvaluation {
    /// Whether the threshold is satisfied
    pub reached: bool,
    /// Aggregated value
    pub current: f64,
    /// Fraction of the threshold for upper bounds, remaining margin for lower bounds
    pub progress: f64,
}

impl GoalEvaluation {
    /// Create an evaluation.
    pub fn new(reached: bool, current: f64, progress: f64) -> Self {
        Self {
            reached,
            current,
            progress,
        }
    }
}

/// A goal evaluated against recorded rides.
#[derive(Debug, Clone, PartialEq)]
pub struct RideGoal {
    pub(crate) settings: GoalSettings,
    pub(crate) window: super::evaluation::DateWindow,
}

impl RideGoal {
    /// Create a ride goal, failing on invalid settings.
    pub fn new(settings: GoalSettings) -> GoalResult<Self> {
        settings.validate(GoalKind::Ride)?;
        let window = super::evaluation::DateWindow::for_settings(&settings)?;
        Ok(Self { settings, window })
    }

    /// Shared goal settings.
    pub fn settings(&self) -> &GoalSettings {
        &self.settings
    }
}

/// A goal evaluated against a manually tracked value.
#[derive(Debug, Clone, PartialEq)]
pub struct ManualGoal {
    pub(crate) settings: GoalSettings,
    pub(crate) value: Option<f64>,
}

impl ManualGoal {
    /// Create a manual goal, failing on invalid settings.
    pub fn new(settings: GoalSettings, value: Option<f64>) -> GoalResult<Self> {
        settings.validate(GoalKind::Manual)?;
        Ok(Self { settings, value })
    }

    /// Shared goal settings.
    pub fn settings(&self) -> &GoalSettings {
        &self.settings
    }

    /// Currently tracked value.
    pub fn value(&self) -> Option<f64> {
        self.value
    }
}

/// A goal of either variant.
#[derive(Debug, Clone, PartialEq)]
pub enum Goal {
    Ride(RideGoal),
    Manual(ManualGoal),
}

impl Goal {
    /// Shared goal settings.
    pub fn settings(&self) -> &GoalSettings {
        match self {
            Goal::Ride(goal) => &goal.settings,
            Goal::Manual(goal) => &goal.settings,
        }
    }

    /// Database identifier.
    pub fn id(&self) -> i64 {
        self.settings().id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.settings().name
    }

    /// Which variant this goal is.
    pub fn kind(&self) -> GoalKind {
        match self {
            Goal::Ride(_) => GoalKind::Ride,
            Goal::Manual(_) => GoalKind::Manual,
        }
    }

    /// Temporal scope.
    pub fn scope(&self) -> GoalScope {
        self.settings().scope()
    }

    /// Whether this is a manual goal.
    pub fn is_manual(&self) -> bool {
        matches!(self, Goal::Manual(_))
    }

    /// Scope and variant, e.g. `"MonthlyRideGoal"`.
    pub fn type_label(&self) -> String {
        format!("{}{}", self.scope().label(), self.kind().variant_name())
    }

    /// User-facing condition text, e.g. `"5 rides"`.
    pub fn condition_text(&self) -> String {
        let settings = self.settings();
        settings
            .aggregation
            .format_condition(settings.threshold, self.kind())
    }
}

impl From<RideGoal> for Goal {
    fn from(goal: RideGoal) -> Self {
        Goal::Ride(goal)
    }
}

impl From<ManualGoal> for Goal {
    fn from(goal: ManualGoal) -> Self {
        Goal::Manual(goal)
    }
}

/// A goal as stored in the database.
///
/// `month` is kept raw so that the every-month marker and invalid values can
/// be told apart when the record is turned into goals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalRecord {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub year: i32,
    pub month: Option<i64>,
    pub goal_type: GoalKind,
    pub aggregation: AggregationType,
    pub threshold: f64,
    pub is_upper_bound: bool,
    pub active: bool,
    pub has_been_reached: bool,
    pub constraints: Option<GoalConstraints>,
    pub value: Option<f64>,
}

impl GoalRecord {
    /// Create a yearly, active, upper-bound record.
    pub fn new(
        name: impl Into<String>,
        year: i32,
        goal_type: GoalKind,
        aggregation: AggregationType,
        threshold: f64,
    ) -> Self {
        Self {
            id: 0,
            name: name.into(),
            description: None,
            year,
            month: None,
            goal_type,
            aggregation,
            threshold,
            is_upper_bound: true,
            active: true,
            has_been_reached: false,
            constraints: None,
            value: None,
        }
    }

    /// Settings for a concrete month (or the whole year when `month` is `None`).
    pub fn settings_for_month(&self, month: Option<u32>) -> GoalSettings {
        GoalSettings {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            year: self.year,
            month,
            aggregation: self.aggregation,
            threshold: self.threshold,
            is_upper_bound: self.is_upper_bound,
            active: self.active,
            reached: self.has_been_reached,
            constraints: self.constraints.clone(),
            every_month: self.month == Some(EVERY_MONTH),
        }
    }
}

impl Goal {
    /// Build a single concrete goal from a stored record.
    ///
    /// The every-month marker is rejected here; use
    /// [`initialize_goals`](super::loader::initialize_goals) to expand it.
    pub fn from_record(record: &GoalRecord) -> GoalResult<Self> {
        let month = match record.month {
            None => None,
            Some(month) if (1..=12).contains(&month) => Some(month as u32),
            Some(month) => return Err(GoalError::InvalidMonth(month)),
        };
        let settings = record.settings_for_month(month);

        match record.goal_type {
            GoalKind::Ride => RideGoal::new(settings).map(Goal::Ride),
            GoalKind::Manual => ManualGoal::new(settings, record.value).map(Goal::Manual),
        }
    }
}
