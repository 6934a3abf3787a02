//! Integration tests for the goal overview.
//!
//! Stores rides and goals in an on-disk database, loads them back and
//! evaluates the overview for a month.

use chrono::NaiveDate;
use cycle_analytics::goals::{
    format_goals_concise, AggregationType, GoalConstraints, GoalKind, GoalManager, GoalOverview,
    GoalRecord, ManualChange, RideRecord, EVERY_MONTH,
};
use cycle_analytics::storage::{Database, DatabaseError};
use tempfile::TempDir;

fn ride(y: i32, m: u32, d: u32, distance: f64, bike: &str, ride_type: &str) -> RideRecord {
    RideRecord::new(NaiveDate::from_ymd_opt(y, m, d).unwrap(), distance)
        .with_bike(bike)
        .with_ride_type(ride_type)
}

fn seed_rides(db: &Database) {
    for ride in [
        ride(2021, 12, 30, 40000.0, "Bike1", "MTB"),
        ride(2022, 1, 2, 20000.0, "Bike1", "MTB"),
        ride(2022, 1, 9, 30000.0, "Bike2", "MTB"),
        ride(2022, 1, 31, 50000.0, "Bike2", "Road"),
        ride(2022, 2, 1, 60000.0, "Bike1", "Road"),
    ] {
        db.insert_ride(&ride).unwrap();
    }
}

#[test]
fn test_overview_from_database() {
    let dir = TempDir::new().unwrap();
    let db = Database::open(&dir.path().join("data").join("rides.db")).unwrap();
    seed_rides(&db);
    let manager = GoalManager::new(db.connection());

    let yearly = manager
        .create(&GoalRecord::new(
            "Yearly distance",
            2022,
            GoalKind::Ride,
            AggregationType::TotalDistance,
            150000.0,
        ))
        .unwrap();

    let mut monthly_mtb = GoalRecord::new(
        "Monthly MTB rides",
        2022,
        GoalKind::Ride,
        AggregationType::Count,
        2.0,
    );
    monthly_mtb.month = Some(EVERY_MONTH);
    monthly_mtb.constraints = Some(GoalConstraints {
        bike: None,
        ride_type: Some(vec!["MTB".to_string()]),
    });
    let monthly = manager.create(&monthly_mtb).unwrap();

    let mut longest = GoalRecord::new(
        "Keep it short",
        2022,
        GoalKind::Ride,
        AggregationType::MaxDistance,
        45000.0,
    );
    longest.month = Some(1);
    longest.is_upper_bound = false;
    manager.create(&longest).unwrap();

    let mut gym = GoalRecord::new("Gym", 2022, GoalKind::Manual, AggregationType::Count, 3.0);
    gym.month = Some(1);
    let gym_id = manager.create(&gym).unwrap();
    manager
        .change_manual_value(gym_id, ManualChange::Increase)
        .unwrap();

    let goals = manager.load_goals(2022, true, false).unwrap();
    assert_eq!(goals.len(), 15);

    let rides = db.get_rides_in_year(2022).unwrap();
    assert_eq!(rides.len(), 4);

    let overview = GoalOverview::build(&goals, 1, &rides);
    assert_eq!(overview.year_goals.len(), 1);
    assert_eq!(overview.month_goals.len(), 3);

    let distance = &overview.year_goals[0];
    assert_eq!(distance.goal_id, yearly.to_string());
    assert_eq!(distance.info.value, 160000.0);
    assert_eq!(distance.info.goal, "150 km");
    assert_eq!(distance.info.reached, 1);

    let mtb = &overview.month_goals[0];
    assert_eq!(mtb.goal_id, monthly.to_string());
    assert_eq!(mtb.info.value, 2.0);
    assert_eq!(mtb.info.progress, 100.0);

    let short = &overview.month_goals[1];
    assert!(!short.progress_bar);
    assert_eq!(short.info.reached, 0);
    assert_eq!(short.info.progress, -5000.0);

    let gym = &overview.month_goals[2];
    assert!(gym.info.is_manual);
    assert!(gym.info.decreasable);
    assert_eq!(gym.info.value, 1.0);
    assert_eq!(gym.info.progress, 33.0);

    assert_eq!(overview.reached_changes, vec![(yearly, true)]);
    for (id, reached) in &overview.reached_changes {
        manager.set_reached(*id, *reached).unwrap();
    }
    assert!(manager.get(yearly).unwrap().unwrap().has_been_reached);
}

#[test]
fn test_every_month_flag_unchanged_across_months() {
    let dir = TempDir::new().unwrap();
    let db = Database::open(&dir.path().join("rides.db")).unwrap();
    seed_rides(&db);
    let manager = GoalManager::new(db.connection());

    let mut record = GoalRecord::new(
        "Monthly rides",
        2022,
        GoalKind::Ride,
        AggregationType::Count,
        2.0,
    );
    record.month = Some(EVERY_MONTH);
    let id = manager.create(&record).unwrap();

    let rides = db.get_rides_in_year(2022).unwrap();
    for (month, reached) in [(1, 1), (2, 0)] {
        let goals = manager.load_goals(2022, true, false).unwrap();
        let overview = GoalOverview::build(&goals, month, &rides);
        assert_eq!(overview.month_goals[0].info.reached, reached);
        for (id, reached) in &overview.reached_changes {
            manager.set_reached(*id, *reached).unwrap();
        }
        assert!(!manager.get(id).unwrap().unwrap().has_been_reached);
    }

    let goals = manager.load_goals(2022, true, false).unwrap();
    assert!(format_goals_concise(&goals).iter().all(|goal| goal.reached == 0));
}

#[test]
fn test_database_reopen_keeps_goals() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rides.db");

    let id = {
        let db = Database::open(&path).unwrap();
        let manager = GoalManager::new(db.connection());
        manager
            .create(&GoalRecord::new(
                "Stretching",
                2023,
                GoalKind::Manual,
                AggregationType::Duration,
                3600.0,
            ))
            .unwrap()
    };

    let db = Database::open(&path).unwrap();
    let manager = GoalManager::new(db.connection());
    assert_eq!(
        manager.change_manual_value(id, ManualChange::Set(1800.0)).unwrap(),
        1800.0
    );

    let goals = manager.load_goals(2023, true, false).unwrap();
    let evaluation = goals[0].evaluate(&[]);
    assert!(!evaluation.reached);
    assert_eq!(evaluation.progress, 0.5);

    assert!(matches!(
        manager.change_manual_value(id + 1, ManualChange::Decrease),
        Err(DatabaseError::NotFound(_))
    ));
}
