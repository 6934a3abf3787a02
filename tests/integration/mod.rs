//! Integration test modules.

mod goal_overview_test;
