//! Unit test modules.

mod aggregation_test;
mod goal_evaluation_test;
