//! Statistics generation from the harvest database
//!
//! This module provides functionality for extracting and displaying
//! harvest statistics from the storage layer.

use crate::storage::{RunRecord, SearchStats, Storage};
use crate::HarvestError;

/// Harvest statistics summary
#[derive(Debug, Clone)]
pub struct HarvestStatistics {
    /// Number of recorded runs
    pub total_runs: u64,

    /// Number of stored apartments across all runs
    pub total_apartments: u64,

    /// Most recent run, if any
    pub latest_run: Option<RunRecord>,

    /// Figures per city and listing type
    pub searches: Vec<SearchStats>,
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `storage` - The storage backend to query
///
/// # Returns
///
/// * `Ok(HarvestStatistics)` - Successfully loaded statistics
/// * `Err(HarvestError)` - Failed to query statistics
pub fn load_statistics(storage: &dyn Storage) -> Result<HarvestStatistics, HarvestError> {
    Ok(HarvestStatistics {
        total_runs: storage.count_runs()?,
        total_apartments: storage.count_apartments()?,
        latest_run: storage.get_latest_run()?,
        searches: storage.get_search_breakdown()?,
    })
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &HarvestStatistics) {
    println!("=== Harvest Statistics ===\n");

    println!("Overview:");
    println!("  Runs recorded: {}", stats.total_runs);
    println!("  Apartments stored: {}", stats.total_apartments);
    println!();

    if let Some(run) = &stats.latest_run {
        println!("Latest Run (#{}):", run.id);
        println!("  Search: {} / {} / max {}", run.city, run.listing_type, run.max_price);
        println!("  Started: {}", run.started_at);
        if let Some(finished) = &run.finished_at {
            println!("  Finished: {}", finished);
        }
        println!("  Status: {}", run.status.to_db_string());
        println!("  Pages fetched: {}", run.pages_fetched);
        if let Some(reason) = &run.stop_reason {
            println!("  Stopped: {}", reason);
        }
        println!();
    }

    if !stats.searches.is_empty() {
        println!("Apartments by Search:");
        for search in &stats.searches {
            println!(
                "  {} ({}): {} apartments, price {} - {} (avg {:.0}), avg space {:.1} m²",
                search.city,
                search.listing_type,
                search.apartments,
                search.min_price,
                search.max_price,
                search.average_price,
                search.average_space
            );
        }
    }
}
