//! Database operations using rusqlite.
//!
//! Rides are stored with their bike and terrain type as lookup tables; the
//! goal engine reads them back as [`RideRecord`]s.

use crate::goals::{GoalError, RideRecord};
use crate::storage::schema::{CURRENT_VERSION, MIGRATION_V1_TO_V2, SCHEMA, SCHEMA_VERSION_TABLE};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult};
use std::path::Path;
use thiserror::Error;

/// Database wrapper for SQLite operations.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create a database at the given path.
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| DatabaseError::IoError(e.to_string()))?;
        }

        let conn =
            Connection::open(path).map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        let db = Self { conn };
        db.initialize()?;

        Ok(db)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        let db = Self { conn };
        db.initialize()?;

        Ok(db)
    }

    /// Initialize the database schema.
    fn initialize(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(SCHEMA_VERSION_TABLE)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

        let current_version = self.get_schema_version()?;

        if current_version < CURRENT_VERSION {
            self.migrate(current_version)?;
        }

        Ok(())
    }

    /// Get the current schema version.
    pub fn get_schema_version(&self) -> Result<i32, DatabaseError> {
        let result: SqliteResult<i32> = self.conn.query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |row| row.get(0),
        );

        match result {
            Ok(version) => Ok(version),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
            Err(e) => Err(DatabaseError::QueryFailed(e.to_string())),
        }
    }

    /// Run database migrations.
    fn migrate(&self, from_version: i32) -> Result<(), DatabaseError> {
        if from_version < 1 {
            self.apply_migration(SCHEMA, 1)?;
        }

        if from_version < 2 {
            self.apply_migration(MIGRATION_V1_TO_V2, 2)?;
        }

        tracing::info!("Database migrated to version {}", CURRENT_VERSION);

        Ok(())
    }

    fn apply_migration(&self, sql: &str, version: i32) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(sql)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

        self.conn
            .execute(
                "INSERT INTO schema_version (version, applied_at) VALUES (?, datetime('now'))",
                [version],
            )
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

        Ok(())
    }

    /// Get a reference to the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    // ========== Ride Operations ==========

    /// Get the id of a terrain type, creating it if needed.
    pub fn ensure_terrain_type(&self, text: &str) -> Result<i64, DatabaseError> {
        self.ensure_category("terrain_type", "text", text)
    }

    /// Get the id of a bike, creating it if needed.
    pub fn ensure_bike(&self, name: &str) -> Result<i64, DatabaseError> {
        self.ensure_category("bike", "name", name)
    }

    fn ensure_category(
        &self,
        table: &str,
        column: &str,
        value: &str,
    ) -> Result<i64, DatabaseError> {
        let existing: Option<i64> = self
            .conn
            .query_row(
                &format!("SELECT id FROM {table} WHERE {column} = ?1"),
                params![value],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        if let Some(id) = existing {
            return Ok(id);
        }

        self.conn
            .execute(
                &format!("INSERT INTO {table} ({column}) VALUES (?1)"),
                params![value],
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        Ok(self.conn.last_insert_rowid())
    }

    /// Insert a ride and return its id.
    ///
    /// A ride without a ride type is stored under the "Road" terrain type.
    pub fn insert_ride(&self, ride: &RideRecord) -> Result<i64, DatabaseError> {
        let terrain_id = self.ensure_terrain_type(ride.ride_type.as_deref().unwrap_or("Road"))?;
        let bike_id = ride
            .bike
            .as_deref()
            .map(|name| self.ensure_bike(name))
            .transpose()?;

        self.conn
            .execute(
                "INSERT INTO ride (ride_date, distance, id_bike, id_terrain_type)
                 VALUES (?1, ?2, ?3, ?4)",
                params![ride.date.to_string(), ride.distance, bike_id, terrain_id],
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        Ok(self.conn.last_insert_rowid())
    }

    /// Load all rides between two dates (inclusive).
    pub fn get_rides_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RideRecord>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT r.ride_date, r.distance, t.text, b.name
                 FROM ride r
                 JOIN terrain_type t ON t.id = r.id_terrain_type
                 LEFT JOIN bike b ON b.id = r.id_bike
                 WHERE r.ride_date >= ?1 AND r.ride_date <= ?2
                 ORDER BY r.ride_date ASC",
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let rows = stmt
            .query_map(params![start.to_string(), end.to_string()], |row| {
                Ok(RideRow {
                    ride_date: row.get(0)?,
                    distance: row.get(1)?,
                    ride_type: row.get(2)?,
                    bike: row.get(3)?,
                })
            })
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let mut rides = Vec::new();
        for row in rows {
            let row = row.map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
            rides.push(row.into_ride_record()?);
        }

        Ok(rides)
    }

    /// Load all rides of a calendar year.
    pub fn get_rides_in_year(&self, year: i32) -> Result<Vec<RideRecord>, DatabaseError> {
        let (start, end) = NaiveDate::from_ymd_opt(year, 1, 1)
            .zip(NaiveDate::from_ymd_opt(year, 12, 31))
            .ok_or_else(|| DatabaseError::Goal(GoalError::InvalidYear(year)))?;

        self.get_rides_between(start, end)
    }

    /// Get the distinct years that have rides.
    pub fn get_ride_years(&self) -> Result<Vec<i32>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT DISTINCT CAST(substr(ride_date, 1, 4) AS INTEGER) AS year
                 FROM ride ORDER BY year DESC",
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let years = stmt
            .query_map([], |row| row.get(0))
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?
            .collect::<SqliteResult<Vec<i32>>>()
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        Ok(years)
    }
}

/// Intermediate row struct for ride queries.
struct RideRow {
    ride_date: String,
    distance: f64,
    ride_type: String,
    bike: Option<String>,
}

impl RideRow {
    fn into_ride_record(self) -> Result<RideRecord, DatabaseError> {
        let date = NaiveDate::parse_from_str(&self.ride_date, "%Y-%m-%d")
            .map_err(|e| DatabaseError::DeserializationError(e.to_string()))?;

        Ok(RideRecord {
            date,
            distance: self.distance,
            ride_type: Some(self.ride_type),
            bike: self.bike,
        })
    }
}

/// Database errors.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    #[error(transparent)]
    Goal(#[from] GoalError),
}
