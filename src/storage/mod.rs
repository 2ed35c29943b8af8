//! Storage module for persisting harvest results
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Run tracking (parameters, pages fetched, why pagination stopped)
//! - Bulk insertion of finalized datasets
//! - Statistics queries for the `--stats` mode

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use crate::listing::ListingType;

/// Parameters recorded when a run starts
#[derive(Debug, Clone)]
pub struct NewRun {
    pub config_hash: String,
    pub city: String,
    pub listing_type: ListingType,
    pub max_price: u64,
}

/// Represents a harvest run
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub config_hash: String,
    pub city: String,
    pub listing_type: String,
    pub max_price: u64,
    pub pages_fetched: u32,
    pub stop_reason: Option<String>,
    pub status: RunStatus,
}

/// Apartment counts and price figures for one city and listing type
#[derive(Debug, Clone, PartialEq)]
pub struct SearchStats {
    pub city: String,
    pub listing_type: String,
    pub apartments: u64,
    pub average_price: f64,
    pub min_price: u64,
    pub max_price: u64,
    pub average_space: f64,
}

/// Status of a harvest run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunStatus {
    /// Pagination is still going
    Running,

    /// Pagination reached the end of the result list
    Completed,

    /// Pagination was cut short by a failed request
    Interrupted,

    /// The run aborted with an error
    Failed,
}

impl RunStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Interrupted => "interrupted",
            Self::Failed => "failed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "interrupted" => Some(Self::Interrupted),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}
