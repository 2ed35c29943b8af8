//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::dataset::{Apartment, Dataset};
use crate::listing::{ListingType, Rooms};
use crate::state::StopReason;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{NewRun, RunRecord, RunStatus, SearchStats};
use crate::HarvestError;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

const RUN_COLUMNS: &str = "id, started_at, finished_at, config_hash, city, listing_type, \
                           max_price, pages_fetched, stop_reason, status";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(HarvestError)` - Failed to open database
    pub fn new(path: &Path) -> Result<Self, HarvestError> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> Result<Self, HarvestError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn query_run(&self, sql: &str, run_id: Option<i64>) -> StorageResult<Option<RunRecord>> {
        let mut stmt = self.conn.prepare(sql)?;
        let map_row = |row: &rusqlite::Row<'_>| {
            Ok((
                RunRecord {
                    id: row.get(0)?,
                    started_at: row.get(1)?,
                    finished_at: row.get(2)?,
                    config_hash: row.get(3)?,
                    city: row.get(4)?,
                    listing_type: row.get(5)?,
                    max_price: row.get(6)?,
                    pages_fetched: row.get(7)?,
                    stop_reason: row.get(8)?,
                    status: RunStatus::Running,
                },
                row.get::<_, String>(9)?,
            ))
        };

        let row = match run_id {
            Some(id) => stmt.query_row(params![id], map_row).optional()?,
            None => stmt.query_row([], map_row).optional()?,
        };

        row.map(|(mut run, status)| {
            run.status =
                RunStatus::from_db_string(&status).ok_or_else(|| StorageError::CorruptRow {
                    table: "runs",
                    message: format!("unknown status '{}' for run {}", status, run.id),
                })?;
            Ok(run)
        })
        .transpose()
    }
}

/// Rooms are stored as REAL; whole values come back as `Rooms::Whole`
fn rooms_from_db(value: f64) -> Rooms {
    if value.fract() == 0.0 && value >= 0.0 && value <= f64::from(u32::MAX) {
        Rooms::Whole(value as u32)
    } else {
        Rooms::Fractional(value)
    }
}

impl Storage for SqliteStorage {
    // ===== Run Management =====

    fn create_run(&mut self, run: &NewRun) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (started_at, config_hash, city, listing_type, max_price, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                now,
                run.config_hash,
                run.city,
                run.listing_type.as_str(),
                run.max_price,
                RunStatus::Running.to_db_string()
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn finish_run(
        &mut self,
        run_id: i64,
        status: RunStatus,
        pages_fetched: u32,
        stop: Option<&StopReason>,
    ) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2, pages_fetched = ?3, stop_reason = ?4
             WHERE id = ?5",
            params![
                status.to_db_string(),
                now,
                pages_fetched,
                stop.map(|s| s.to_string()),
                run_id
            ],
        )?;

        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord> {
        let sql = format!("SELECT {} FROM runs WHERE id = ?1", RUN_COLUMNS);
        self.query_run(&sql, Some(run_id))?
            .ok_or(StorageError::RunNotFound(run_id))
    }

    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>> {
        let sql = format!("SELECT {} FROM runs ORDER BY id DESC LIMIT 1", RUN_COLUMNS);
        self.query_run(&sql, None)
    }

    // ===== Apartments =====

    fn insert_apartments(&mut self, run_id: i64, dataset: &Dataset) -> StorageResult<usize> {
        let tx = self.conn.transaction()?;
        let mut inserted = 0;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO apartments (run_id, rooms, space, price, title, address, city, type)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;

            for apartment in dataset.iter() {
                inserted += stmt.execute(params![
                    run_id,
                    apartment.rooms.as_f64(),
                    apartment.space,
                    apartment.price,
                    apartment.title,
                    apartment.address,
                    apartment.city,
                    apartment.listing_type.as_str()
                ])?;
            }
        }

        tx.commit()?;
        Ok(inserted)
    }

    fn load_apartments(
        &self,
        city: &str,
        listing_type: ListingType,
    ) -> StorageResult<Vec<Apartment>> {
        let mut stmt = self.conn.prepare(
            "SELECT rooms, space, price, title, address, city FROM apartments
             WHERE city = ?1 AND type = ?2 ORDER BY id",
        )?;

        let rows = stmt.query_map(params![city, listing_type.as_str()], |row| {
            Ok(Apartment {
                rooms: rooms_from_db(row.get(0)?),
                space: row.get(1)?,
                price: row.get(2)?,
                title: row.get(3)?,
                address: row.get(4)?,
                city: row.get(5)?,
                listing_type,
            })
        })?;

        let apartments = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(apartments)
    }

    // ===== Statistics =====

    fn count_apartments(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM apartments", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_runs(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM runs", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn get_search_breakdown(&self) -> StorageResult<Vec<SearchStats>> {
        let mut stmt = self.conn.prepare(
            "SELECT city, type, COUNT(*), AVG(price), MIN(price), MAX(price), AVG(space)
             FROM apartments GROUP BY city, type ORDER BY city, type",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(SearchStats {
                city: row.get(0)?,
                listing_type: row.get(1)?,
                apartments: row.get::<_, i64>(2)? as u64,
                average_price: row.get(3)?,
                min_price: row.get(4)?,
                max_price: row.get(5)?,
                average_space: row.get(6)?,
            })
        })?;

        let stats = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(stats)
    }
}
