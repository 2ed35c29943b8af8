//! Crawler module for walking the paginated result list
//!
//! This module contains the harvesting logic, including:
//! - HTTP fetching of result pages
//! - The page-by-page pagination loop with request pacing
//! - Overall run coordination (storage, dataset, report)

mod coordinator;
mod fetcher;
mod paginator;

pub use coordinator::{run_harvest, Coordinator, HarvestSummary};
pub use fetcher::{build_http_client, FetchError, FetchedPage, HttpFetcher, PageFetcher};
pub use paginator::{CrawlOutcome, Paginator};
