//! Unit tests for aggregation rules and goal listings.

use cycle_analytics::goals::{
    format_goals_concise, initialize_goals, is_acceptable_aggregation, AggregationType, GoalError,
    GoalKind, GoalRecord, EVERY_MONTH,
};

#[test]
fn test_acceptable_aggregation_table() {
    let ride_aggregations = [
        AggregationType::Count,
        AggregationType::TotalDistance,
        AggregationType::AvgDistance,
        AggregationType::MaxDistance,
    ];
    let manual_aggregations = [AggregationType::Count, AggregationType::Duration];

    for aggregation in AggregationType::ALL {
        assert_eq!(
            is_acceptable_aggregation(GoalKind::Ride, aggregation),
            ride_aggregations.contains(&aggregation)
        );
        assert_eq!(
            is_acceptable_aggregation(GoalKind::Manual, aggregation),
            manual_aggregations.contains(&aggregation)
        );
    }
}

#[test]
fn test_unsupported_aggregation_fails_loading() {
    let record = GoalRecord::new("Hours", 2022, GoalKind::Ride, AggregationType::Duration, 60.0);
    assert_eq!(
        initialize_goals(&[record]),
        Err(GoalError::UnsupportedAggregation {
            kind: GoalKind::Ride,
            aggregation: AggregationType::Duration,
        })
    );
}

#[test]
fn test_concise_listing_of_expanded_goal() {
    let mut record = GoalRecord::new(
        "Monthly distance",
        2022,
        GoalKind::Ride,
        AggregationType::TotalDistance,
        4000.0,
    );
    record.month = Some(EVERY_MONTH);

    let goals = initialize_goals(&[record]).unwrap();
    let concise = format_goals_concise(&goals);

    assert_eq!(concise.len(), 12);
    assert!(concise.iter().all(|goal| goal.type_label == "MonthlyRideGoal"));
    assert!(concise.iter().all(|goal| goal.condition_text == "4000 m"));
    assert!(concise.iter().all(|goal| goal.reached == 0));
}

#[test]
fn test_duration_condition_in_seconds() {
    let record = GoalRecord::new("Yoga", 2022, GoalKind::Manual, AggregationType::Duration, 5400.0);
    let goals = initialize_goals(&[record]).unwrap();
    let concise = format_goals_concise(&goals);
    assert_eq!(concise[0].type_label, "YearlyManualGoal");
    assert_eq!(concise[0].condition_text, "5400 seconds");
}
