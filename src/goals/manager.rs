//! Goal persistence.
//!
//! Loads stored goals, toggles their active state and applies manual value
//! changes. Manual changes run inside an immediate transaction so that two
//! concurrent increments cannot overwrite each other.

use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};

use super::error::GoalError;
use super::loader::{initialize_goals, manual_goal_from_record};
use super::manual::ManualChange;
use super::types::{Goal, GoalConstraints, GoalRecord};
use crate::storage::database::DatabaseError;

const GOAL_COLUMNS: &str = "id, name, description, year, month, goal_type, aggregation_type,
     threshold, is_upper_bound, active, has_been_reached, constraints, value";

/// Manager for stored goals.
pub struct GoalManager<'a> {
    conn: &'a Connection,
}

impl<'a> GoalManager<'a> {
    /// Create a new goal manager with a database connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Store a new goal and return its id.
    ///
    /// The record is validated first; the every-month marker is accepted
    /// for ride goals.
    pub fn create(&self, record: &GoalRecord) -> Result<i64, DatabaseError> {
        initialize_goals(std::slice::from_ref(record))?;

        let constraints = record
            .constraints
            .as_ref()
            .filter(|constraints| !constraints.is_empty())
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| DatabaseError::SerializationError(e.to_string()))?;

        self.conn
            .execute(
                "INSERT INTO goal
                 (name, description, year, month, goal_type, aggregation_type, threshold,
                  is_upper_bound, active, has_been_reached, constraints, value)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                params![
                    record.name,
                    record.description,
                    record.year,
                    record.month,
                    record.goal_type.as_str(),
                    record.aggregation.as_str(),
                    record.threshold,
                    record.is_upper_bound,
                    record.active,
                    record.has_been_reached,
                    constraints,
                    record.value,
                ],
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let id = self.conn.last_insert_rowid();
        tracing::info!(goal_id = id, name = %record.name, "Created goal");

        Ok(id)
    }

    /// Get a stored goal record by id.
    pub fn get(&self, id: i64) -> Result<Option<GoalRecord>, DatabaseError> {
        get_record(self.conn, id)
    }

    /// Load the stored goal records of a year, filtered by active state.
    pub fn get_records(
        &self,
        year: i32,
        include_active: bool,
        include_inactive: bool,
    ) -> Result<Vec<GoalRecord>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {GOAL_COLUMNS} FROM goal WHERE year = ?1 ORDER BY id ASC"
            ))
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let rows = stmt
            .query_map(params![year], GoalRow::from_row)
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let mut records = Vec::new();
        for row in rows {
            let record = row
                .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?
                .into_record()?;
            if (record.active && include_active) || (!record.active && include_inactive) {
                records.push(record);
            }
        }

        Ok(records)
    }

    /// Load the goals of a year, expanding every-month goals.
    pub fn load_goals(
        &self,
        year: i32,
        include_active: bool,
        include_inactive: bool,
    ) -> Result<Vec<Goal>, DatabaseError> {
        let records = self.get_records(year, include_active, include_inactive)?;
        Ok(initialize_goals(&records)?)
    }

    /// Get the distinct years that have goals.
    pub fn get_goal_years(&self) -> Result<Vec<i32>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT year FROM goal ORDER BY year DESC")
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let years = stmt
            .query_map([], |row| row.get(0))
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?
            .collect::<rusqlite::Result<Vec<i32>>>()
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        Ok(years)
    }

    /// Activate or deactivate a goal. Returns false if the goal does not exist.
    pub fn set_active(&self, id: i64, active: bool) -> Result<bool, DatabaseError> {
        let updated = self
            .conn
            .execute(
                "UPDATE goal SET active = ?1 WHERE id = ?2",
                params![active, id],
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        if updated > 0 {
            tracing::info!(goal_id = id, active, "Changed goal state");
        }

        Ok(updated > 0)
    }

    /// Store the reached flag of a goal.
    pub fn set_reached(&self, id: i64, reached: bool) -> Result<(), DatabaseError> {
        self.conn
            .execute(
                "UPDATE goal SET has_been_reached = ?1 WHERE id = ?2",
                params![reached, id],
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        Ok(())
    }

    /// Apply a change to a manual goal's value and return the new value.
    ///
    /// Fails with [`GoalError::CannotDecrease`] when decreasing a missing or
    /// zero value, and with [`GoalError::NotManual`] for ride goals.
    pub fn change_manual_value(&self, id: i64, change: ManualChange) -> Result<f64, DatabaseError> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;

        let record =
            get_record(&tx, id)?.ok_or_else(|| DatabaseError::NotFound(format!("goal {id}")))?;
        let mut goal = manual_goal_from_record(&record)?;

        let value = match goal.apply(change) {
            Ok(value) => value,
            Err(err) => {
                if let GoalError::CannotDecrease { .. } = err {
                    tracing::warn!(goal_id = id, "Rejected decrease below zero");
                }
                return Err(err.into());
            }
        };

        tx.execute("UPDATE goal SET value = ?1 WHERE id = ?2", params![value, id])
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
        tx.commit()
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;

        tracing::info!(goal_id = id, value, "Changed manual goal value");

        Ok(value)
    }

    /// Delete a goal.
    pub fn delete(&self, id: i64) -> Result<bool, DatabaseError> {
        let deleted = self
            .conn
            .execute("DELETE FROM goal WHERE id = ?1", params![id])
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
        Ok(deleted > 0)
    }
}

fn get_record(conn: &Connection, id: i64) -> Result<Option<GoalRecord>, DatabaseError> {
    conn.query_row(
        &format!("SELECT {GOAL_COLUMNS} FROM goal WHERE id = ?1"),
        params![id],
        GoalRow::from_row,
    )
    .optional()
    .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?
    .map(GoalRow::into_record)
    .transpose()
}

/// Intermediate row struct for goal queries.
struct GoalRow {
    id: i64,
    name: String,
    description: Option<String>,
    year: i32,
    month: Option<i64>,
    goal_type: String,
    aggregation_type: String,
    threshold: f64,
    is_upper_bound: bool,
    active: bool,
    has_been_reached: bool,
    constraints: Option<String>,
    value: Option<f64>,
}

impl GoalRow {
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            year: row.get(3)?,
            month: row.get(4)?,
            goal_type: row.get(5)?,
            aggregation_type: row.get(6)?,
            threshold: row.get(7)?,
            is_upper_bound: row.get(8)?,
            active: row.get(9)?,
            has_been_reached: row.get(10)?,
            constraints: row.get(11)?,
            value: row.get(12)?,
        })
    }

    fn into_record(self) -> Result<GoalRecord, DatabaseError> {
        let constraints = self
            .constraints
            .map(|json| serde_json::from_str::<GoalConstraints>(&json))
            .transpose()
            .map_err(|e| DatabaseError::DeserializationError(e.to_string()))?;

        Ok(GoalRecord {
            id: self.id,
            name: self.name,
            description: self.description,
            year: self.year,
            month: self.month,
            goal_type: self.goal_type.parse()?,
            aggregation: self.aggregation_type.parse()?,
            threshold: self.threshold,
            is_upper_bound: self.is_upper_bound,
            active: self.active,
            has_been_reached: self.has_been_reached,
            constraints,
            value: self.value,
        })
    }
}
