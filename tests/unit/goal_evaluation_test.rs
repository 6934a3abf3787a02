//! Unit tests for ride and manual goal evaluation.

use chrono::NaiveDate;
use cycle_analytics::goals::{
    AggregationType, GoalConstraints, GoalError, GoalEvaluation, GoalSettings, ManualChange,
    ManualGoal, RideGoal, RideRecord,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn ride(y: i32, m: u32, d: u32, distance: f64) -> RideRecord {
    RideRecord::new(date(y, m, d), distance)
}

/// Three rides in January 2022 and three in February 2022.
fn first_quarter_rides() -> Vec<RideRecord> {
    vec![
        ride(2022, 1, 1, 10000.0),
        ride(2022, 1, 2, 20000.0),
        ride(2022, 1, 3, 30000.0),
        ride(2022, 2, 1, 15000.0),
        ride(2022, 2, 14, 25000.0),
        ride(2022, 2, 28, 35000.0),
    ]
}

fn count_goal(month: Option<u32>, threshold: f64) -> RideGoal {
    let mut settings = GoalSettings::new(1, "Rides", 2022, AggregationType::Count, threshold);
    settings.month = month;
    RideGoal::new(settings).unwrap()
}

#[test]
fn test_monthly_count_scenario() {
    let goal = count_goal(Some(1), 5.0);
    assert_eq!(
        goal.evaluate(&first_quarter_rides()),
        GoalEvaluation::new(false, 3.0, 0.6)
    );
}

#[test]
fn test_yearly_count_scenario() {
    let mut rides = first_quarter_rides();
    rides.push(ride(2021, 12, 31, 5000.0));

    let goal = count_goal(None, 5.0);
    let evaluation = goal.evaluate(&rides);
    assert_eq!(evaluation.current, 6.0);
    assert!(evaluation.reached);
    assert!((evaluation.progress - 1.2).abs() < 1e-12);
}

#[test]
fn test_month_boundary_is_half_open() {
    let rides = vec![ride(2022, 1, 31, 1000.0), ride(2022, 2, 1, 1000.0)];
    let goal = count_goal(Some(1), 1.0);
    assert_eq!(goal.relevant_rides(&rides), vec![&rides[0]]);

    let rides = vec![ride(2022, 12, 31, 1000.0), ride(2023, 1, 1, 1000.0)];
    let goal = count_goal(Some(12), 1.0);
    assert_eq!(goal.relevant_rides(&rides), vec![&rides[0]]);
}

#[test]
fn test_reached_rule_for_both_bounds() {
    let rides = first_quarter_rides();

    for threshold in [0.0, 3.0, 6.0, 7.0, 100000.0, 135000.0, 200000.0] {
        let settings =
            GoalSettings::new(2, "Distance", 2022, AggregationType::TotalDistance, threshold);
        let upper = RideGoal::new(settings.clone()).unwrap().evaluate(&rides);
        assert_eq!(upper.reached, upper.current >= threshold);

        let lower = RideGoal::new(settings.lower_bound()).unwrap().evaluate(&rides);
        assert_eq!(lower.reached, lower.current <= threshold);
        assert_eq!(lower.progress, threshold - lower.current);
    }
}

#[test]
fn test_distance_aggregations() {
    let rides = first_quarter_rides();
    let cases = [
        (AggregationType::TotalDistance, 135000.0),
        (AggregationType::AvgDistance, 22500.0),
        (AggregationType::MaxDistance, 35000.0),
    ];

    for (aggregation, expected) in cases {
        let settings = GoalSettings::new(3, "Distance", 2022, aggregation, 1000.0);
        let goal = RideGoal::new(settings).unwrap();
        assert_eq!(goal.evaluate(&rides).current, expected);
    }
}

#[test]
fn test_constraints_count_exactly_one() {
    let rides = vec![
        ride(2022, 3, 1, 1000.0).with_bike("Bike1").with_ride_type("MTB"),
        ride(2022, 3, 2, 1000.0).with_bike("Bike2").with_ride_type("MTB"),
    ];
    let constraints = GoalConstraints {
        bike: Some(vec!["Bike1".to_string()]),
        ride_type: Some(vec!["MTB".to_string()]),
    };
    let settings = GoalSettings::new(4, "MTB", 2022, AggregationType::Count, 2.0)
        .with_constraints(constraints);
    let goal = RideGoal::new(settings).unwrap();

    assert_eq!(goal.evaluate(&rides).current, 1.0);
}

#[test]
fn test_manual_goal_scenario() {
    let settings = GoalSettings::new(5, "Gym", 2022, AggregationType::Count, 5.0);
    let mut goal = ManualGoal::new(settings, None).unwrap();
    assert_eq!(goal.evaluate(), GoalEvaluation::new(false, 0.0, 0.0));

    assert_eq!(goal.increase(), Ok(1.0));
    assert_eq!(goal.value(), Some(1.0));
    assert_eq!(goal.evaluate(), GoalEvaluation::new(false, 1.0, 0.2));
}

#[test]
fn test_manual_decrease_at_zero_fails() {
    let settings = GoalSettings::new(6, "Gym", 2022, AggregationType::Count, 5.0);
    let mut goal = ManualGoal::new(settings, Some(0.0)).unwrap();
    assert_eq!(
        goal.apply(ManualChange::Decrease),
        Err(GoalError::CannotDecrease { id: 6 })
    );
}
