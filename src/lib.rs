//! Cycle Analytics - Goal tracking for a personal cycling journal
//!
//! Evaluates yearly and monthly rider goals against recorded rides or
//! manually tracked values, and persists goals and rides in SQLite.

pub mod goals;
pub mod storage;

// Re-export commonly used types
pub use goals::{Goal, GoalEvaluation, GoalManager, GoalRecord, RideRecord};
pub use storage::config::AppConfig;
pub use storage::database::Database;
