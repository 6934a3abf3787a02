//! Aggregation kinds and their user-facing formatting.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::error::GoalError;

/// Distances at or above this many meters are shown in kilometers.
const KILOMETER_DISPLAY_THRESHOLD: f64 = 5000.0;

/// Which data source a goal is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalKind {
    /// Aggregated from recorded rides
    Ride,
    /// A value the rider maintains by hand
    Manual,
}

impl GoalKind {
    /// Identifier used in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalKind::Ride => "ride",
            GoalKind::Manual => "manual",
        }
    }

    /// Variant name used in compact goal listings.
    pub fn variant_name(&self) -> &'static str {
        match self {
            GoalKind::Ride => "RideGoal",
            GoalKind::Manual => "ManualGoal",
        }
    }
}

impl FromStr for GoalKind {
    type Err = GoalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ride" => Ok(GoalKind::Ride),
            "manual" => Ok(GoalKind::Manual),
            other => Err(GoalError::UnknownGoalKind(other.to_string())),
        }
    }
}

impl std::fmt::Display for GoalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reduction applied to the data a goal is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationType {
    /// Number of rides (or occurrences for manual goals)
    Count,
    /// Sum of ride distances
    TotalDistance,
    /// Mean ride distance
    AvgDistance,
    /// Longest single ride
    MaxDistance,
    /// Manually tracked duration in seconds
    Duration,
}

impl AggregationType {
    /// All aggregation kinds in declaration order.
    pub const ALL: [AggregationType; 5] = [
        AggregationType::Count,
        AggregationType::TotalDistance,
        AggregationType::AvgDistance,
        AggregationType::MaxDistance,
        AggregationType::Duration,
    ];

    /// Identifier used in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregationType::Count => "count",
            AggregationType::TotalDistance => "total_distance",
            AggregationType::AvgDistance => "avg_distance",
            AggregationType::MaxDistance => "max_distance",
            AggregationType::Duration => "duration",
        }
    }

    /// Human readable description.
    pub fn description(&self) -> &'static str {
        match self {
            AggregationType::Count => "Count rides",
            AggregationType::TotalDistance => "Total distance in time span",
            AggregationType::AvgDistance => "Average monthly distance",
            AggregationType::MaxDistance => "Maximum ride distance",
            AggregationType::Duration => "Total duration",
        }
    }

    /// Render the goal condition for a threshold, e.g. `"12.50 km"`.
    pub fn format_condition(&self, threshold: f64, kind: GoalKind) -> String {
        format_condition(*self, threshold, kind)
    }
}

impl FromStr for AggregationType {
    type Err = GoalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AggregationType::ALL
            .into_iter()
            .find(|aggregation| aggregation.as_str() == s)
            .ok_or_else(|| GoalError::UnknownAggregation(s.to_string()))
    }
}

impl std::fmt::Display for AggregationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Format a number without decimals if it is integral, otherwise with two.
pub fn format_float(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

/// Render the user-facing condition text for a goal.
pub fn format_condition(aggregation: AggregationType, threshold: f64, kind: GoalKind) -> String {
    match aggregation {
        AggregationType::Count => match kind {
            GoalKind::Ride => format!("{} rides", format_float(threshold)),
            GoalKind::Manual => format!("{} occurrences", format_float(threshold)),
        },
        AggregationType::TotalDistance | AggregationType::AvgDistance => {
            if threshold >= KILOMETER_DISPLAY_THRESHOLD {
                format!("{} km", format_float(threshold / 1000.0))
            } else {
                format!("{} m", format_float(threshold))
            }
        }
        AggregationType::MaxDistance => format!("{} km", format_float(threshold / 1000.0)),
        // No conversion to minutes or hours yet; stored goals are displayed in seconds.
        AggregationType::Duration => format!("{} seconds", format_float(threshold)),
    }
}

/// Whether a goal of the given kind may use the aggregation.
pub fn is_acceptable_aggregation(kind: GoalKind, aggregation: AggregationType) -> bool {
    match kind {
        GoalKind::Manual => matches!(
            aggregation,
            AggregationType::Count | AggregationType::Duration
        ),
        GoalKind::Ride => matches!(
            aggregation,
            AggregationType::Count
                | AggregationType::TotalDistance
                | AggregationType::AvgDistance
                | AggregationType::MaxDistance
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(5.0), "5");
        assert_eq!(format_float(12.5), "12.50");
        assert_eq!(format_float(41.0 / 3.0), "13.67");
        assert_eq!(format_float(0.0), "0");
    }

    #[test]
    fn test_count_condition_depends_on_kind() {
        assert_eq!(
            AggregationType::Count.format_condition(5.0, GoalKind::Ride),
            "5 rides"
        );
        assert_eq!(
            AggregationType::Count.format_condition(5.0, GoalKind::Manual),
            "5 occurrences"
        );
    }

    #[test]
    fn test_distance_condition_switches_units() {
        assert_eq!(
            AggregationType::TotalDistance.format_condition(4999.0, GoalKind::Ride),
            "4999 m"
        );
        assert_eq!(
            AggregationType::TotalDistance.format_condition(5000.0, GoalKind::Ride),
            "5 km"
        );
        assert_eq!(
            AggregationType::AvgDistance.format_condition(12340.0, GoalKind::Ride),
            "12.34 km"
        );
        assert_eq!(
            AggregationType::MaxDistance.format_condition(100.0, GoalKind::Ride),
            "0.10 km"
        );
        assert_eq!(
            AggregationType::Duration.format_condition(3600.0, GoalKind::Manual),
            "3600 seconds"
        );
    }

    #[test]
    fn test_acceptable_aggregations() {
        assert!(!is_acceptable_aggregation(
            GoalKind::Manual,
            AggregationType::TotalDistance
        ));
        assert!(!is_acceptable_aggregation(
            GoalKind::Ride,
            AggregationType::Duration
        ));

        for aggregation in [
            AggregationType::Count,
            AggregationType::TotalDistance,
            AggregationType::AvgDistance,
            AggregationType::MaxDistance,
        ] {
            assert!(is_acceptable_aggregation(GoalKind::Ride, aggregation));
        }
        for aggregation in [AggregationType::Count, AggregationType::Duration] {
            assert!(is_acceptable_aggregation(GoalKind::Manual, aggregation));
        }
    }

    #[test]
    fn test_parse_aggregation() {
        for aggregation in AggregationType::ALL {
            assert_eq!(
                aggregation.as_str().parse::<AggregationType>().unwrap(),
                aggregation
            );
        }
        assert!(matches!(
            "elevation".parse::<AggregationType>(),
            Err(GoalError::UnknownAggregation(_))
        ));
    }
}
