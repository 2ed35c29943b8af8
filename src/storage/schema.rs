//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Listing-Harvest database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Track harvest runs
CREATE TABLE IF NOT EXISTS runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    started_at TEXT NOT NULL,
    finished_at TEXT,
    config_hash TEXT NOT NULL,
    city TEXT NOT NULL,
    listing_type TEXT NOT NULL,
    max_price INTEGER NOT NULL,
    pages_fetched INTEGER NOT NULL DEFAULT 0,
    stop_reason TEXT,
    status TEXT NOT NULL
);

-- Complete listings, tagged with the query they were found for
CREATE TABLE IF NOT EXISTS apartments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    run_id INTEGER NOT NULL REFERENCES runs(id),
    rooms REAL NOT NULL,
    space INTEGER NOT NULL,
    price INTEGER NOT NULL,
    title TEXT NOT NULL,
    address TEXT NOT NULL,
    city TEXT NOT NULL,
    type TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_apartments_search ON apartments(city, type);
CREATE INDEX IF NOT EXISTS idx_apartments_run ON apartments(run_id);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
