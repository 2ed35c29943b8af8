//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::dataset::{Apartment, Dataset};
use crate::listing::ListingType;
use crate::state::StopReason;
use crate::storage::{NewRun, RunRecord, RunStatus, SearchStats};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("Corrupt row in {table}: {message}")]
    CorruptRow { table: &'static str, message: String },

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// This trait defines all database operations needed by the harvester.
pub trait Storage {
    // ===== Run Management =====

    /// Records the start of a run
    ///
    /// # Returns
    ///
    /// The ID of the newly created run
    fn create_run(&mut self, run: &NewRun) -> StorageResult<i64>;

    /// Records how a run ended
    ///
    /// # Arguments
    ///
    /// * `run_id` - The run to close
    /// * `status` - Final status
    /// * `pages_fetched` - Number of pages that were fetched successfully
    /// * `stop` - Why pagination stopped, if it got that far
    fn finish_run(
        &mut self,
        run_id: i64,
        status: RunStatus,
        pages_fetched: u32,
        stop: Option<&StopReason>,
    ) -> StorageResult<()>;

    /// Gets a run by ID
    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord>;

    /// Gets the most recent run
    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>>;

    // ===== Apartments =====

    /// Inserts every apartment of a dataset in one transaction
    ///
    /// # Returns
    ///
    /// The number of inserted rows
    fn insert_apartments(&mut self, run_id: i64, dataset: &Dataset) -> StorageResult<usize>;

    /// Loads all stored apartments for a city and listing type, oldest first
    fn load_apartments(&self, city: &str, listing_type: ListingType)
        -> StorageResult<Vec<Apartment>>;

    // ===== Statistics =====

    /// Gets total apartment count
    fn count_apartments(&self) -> StorageResult<u64>;

    /// Gets total run count
    fn count_runs(&self) -> StorageResult<u64>;

    /// Gets counts and price figures per city and listing type
    fn get_search_breakdown(&self) -> StorageResult<Vec<SearchStats>>;
}
