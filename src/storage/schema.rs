//! Database schema definitions.

/// SQL schema for creating all database tables.
pub const SCHEMA: &str = r#"
-- Bikes table
CREATE TABLE IF NOT EXISTS bike (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    brand TEXT,
    model TEXT,
    commission_date TEXT,
    decommission_date TEXT
);

-- Terrain / ride types table
CREATE TABLE IF NOT EXISTS terrain_type (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    text TEXT NOT NULL UNIQUE
);

-- Rides table
CREATE TABLE IF NOT EXISTS ride (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    ride_date TEXT NOT NULL,
    distance REAL NOT NULL,
    id_bike INTEGER REFERENCES bike(id),
    id_terrain_type INTEGER NOT NULL REFERENCES terrain_type(id)
);

CREATE INDEX IF NOT EXISTS idx_ride_date ON ride(ride_date);

-- Goals table
CREATE TABLE IF NOT EXISTS goal (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    year INTEGER NOT NULL,
    month INTEGER,
    name TEXT NOT NULL,
    aggregation_type TEXT NOT NULL,
    threshold REAL NOT NULL,
    is_upper_bound INTEGER NOT NULL,
    constraints TEXT,
    description TEXT,
    has_been_reached INTEGER NOT NULL DEFAULT 0,
    active INTEGER NOT NULL DEFAULT 1
);

CREATE INDEX IF NOT EXISTS idx_goal_year ON goal(year);
"#;

/// SQL for schema version tracking (migrations)
pub const SCHEMA_VERSION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL
);
"#;

/// Current schema version
pub const CURRENT_VERSION: i32 = 2;

/// SQL for migration from v1 to v2 (manual goals)
pub const MIGRATION_V1_TO_V2: &str = r#"
ALTER TABLE goal ADD COLUMN goal_type TEXT NOT NULL DEFAULT 'ride';
ALTER TABLE goal ADD COLUMN value REAL;
"#;
