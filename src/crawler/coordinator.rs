//! Harvest coordinator - main run orchestration logic
//!
//! This module ties the pipeline together:
//! - Recording the run in storage
//! - Driving the paginator over the result list
//! - Finalizing the accumulated records into a dataset
//! - Persisting the dataset and closing the run with its final status
//! - Rendering the price report

use crate::config::Config;
use crate::crawler::fetcher::{build_http_client, HttpFetcher, PageFetcher};
use crate::crawler::paginator::{CrawlOutcome, Paginator};
use crate::dataset::Finalized;
use crate::output::{DatasetReporter, MarkdownReporter};
use crate::state::StopReason;
use crate::storage::{NewRun, RunStatus, SqliteStorage, Storage};
use crate::HarvestError;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// What a finished run produced
#[derive(Debug, Clone)]
pub struct HarvestSummary {
    pub run_id: i64,

    /// Pages that received a success response
    pub pages_fetched: u32,

    /// Why pagination stopped
    pub stop: StopReason,

    /// Records extracted before the completeness filter
    pub records_extracted: usize,

    /// Records dropped for lacking rooms, space or price
    pub discarded: usize,

    /// Rooms/space containers that could not be classified
    pub unclassified: usize,

    /// Apartments written to the database
    pub saved: usize,

    /// Where the report was written; None when nothing was found
    pub report_path: Option<PathBuf>,
}

impl HarvestSummary {
    pub fn found_apartments(&self) -> bool {
        self.saved > 0
    }
}

/// Main harvest coordinator structure
pub struct Coordinator<F: PageFetcher = HttpFetcher> {
    config: Config,
    config_hash: String,
    storage: SqliteStorage,
    fetcher: F,
}

impl Coordinator<HttpFetcher> {
    /// Creates a coordinator fetching over HTTP
    ///
    /// # Arguments
    ///
    /// * `config` - The validated configuration
    /// * `config_hash` - Hash of the configuration file, recorded with the run
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Storage opened and HTTP client built
    /// * `Err(HarvestError)` - Failed to initialize
    pub fn new(config: Config, config_hash: impl Into<String>) -> Result<Self, HarvestError> {
        let client = build_http_client(
            &config.user_agent,
            Duration::from_secs(config.crawler.timeout_secs),
        )?;
        Self::with_fetcher(config, config_hash, HttpFetcher::new(client))
    }
}

impl<F: PageFetcher> Coordinator<F> {
    /// Creates a coordinator with a custom page source
    pub fn with_fetcher(
        config: Config,
        config_hash: impl Into<String>,
        fetcher: F,
    ) -> Result<Self, HarvestError> {
        let storage = SqliteStorage::new(Path::new(&config.output.database_path))?;

        Ok(Self {
            config,
            config_hash: config_hash.into(),
            storage,
            fetcher,
        })
    }

    /// Runs one harvest from page 1 to the end of the result list
    ///
    /// The run is closed with its real page count and stop reason as soon as
    /// the apartments are stored. The report is written last; failing to
    /// write it is logged and leaves the run as it is.
    pub async fn run(mut self) -> Result<HarvestSummary, HarvestError> {
        let search = &self.config.search;
        let run_id = self.storage.create_run(&NewRun {
            config_hash: self.config_hash.clone(),
            city: search.city.clone(),
            listing_type: search.listing_type,
            max_price: search.max_price,
        })?;

        tracing::info!(
            "Starting harvest run {}: {} listings in {} up to {}",
            run_id,
            search.listing_type,
            search.city,
            search.max_price
        );

        let outcome = match self.paginate().await {
            Ok(outcome) => outcome,
            Err(e) => {
                self.mark_failed(run_id, 0, None, &e);
                return Err(e);
            }
        };

        self.conclude(run_id, outcome)
    }

    async fn paginate(&self) -> Result<CrawlOutcome, HarvestError> {
        Paginator::from_config(&self.fetcher, &self.config)?
            .run()
            .await
    }

    fn conclude(
        &mut self,
        run_id: i64,
        outcome: CrawlOutcome,
    ) -> Result<HarvestSummary, HarvestError> {
        let records_extracted = outcome.builder.record_count();
        let unclassified = outcome.builder.unclassified();
        if unclassified > 0 {
            tracing::warn!(
                "{} rooms/space containers could not be classified",
                unclassified
            );
        }

        let finalized = outcome
            .builder
            .finalize(&self.config.search.city, self.config.search.listing_type);

        let (dataset, discarded) = match finalized {
            Finalized::Ready { dataset, discarded } => (Some(dataset), discarded),
            Finalized::NoResults { discarded } => {
                tracing::info!("No apartment found.");
                (None, discarded)
            }
        };

        let mut saved = 0;
        if let Some(dataset) = &dataset {
            match self.storage.insert_apartments(run_id, dataset) {
                Ok(count) => saved = count,
                Err(e) => {
                    self.mark_failed(run_id, outcome.pages_fetched, Some(&outcome.stop), &e);
                    return Err(e.into());
                }
            }
            tracing::info!("Saved {} apartments for run {}", saved, run_id);
        }

        let status = if outcome.stop.is_error() {
            RunStatus::Interrupted
        } else {
            RunStatus::Completed
        };
        self.storage
            .finish_run(run_id, status, outcome.pages_fetched, Some(&outcome.stop))?;

        let report_path = dataset.and_then(|dataset| {
            let reporter = MarkdownReporter::new(&self.config.output.report_path);
            match reporter.report(&dataset) {
                Ok(()) => Some(reporter.path().to_path_buf()),
                Err(e) => {
                    tracing::warn!(
                        "Could not write report to {}: {}",
                        reporter.path().display(),
                        e
                    );
                    None
                }
            }
        });

        Ok(HarvestSummary {
            run_id,
            pages_fetched: outcome.pages_fetched,
            stop: outcome.stop,
            records_extracted,
            discarded,
            unclassified,
            saved,
            report_path,
        })
    }

    fn mark_failed(
        &mut self,
        run_id: i64,
        pages_fetched: u32,
        stop: Option<&StopReason>,
        error: &dyn std::fmt::Display,
    ) {
        tracing::error!("Harvest run {} failed: {}", run_id, error);
        let marked = self
            .storage
            .finish_run(run_id, RunStatus::Failed, pages_fetched, stop);
        if let Err(store_err) = marked {
            tracing::warn!("Could not mark run {} as failed: {}", run_id, store_err);
        }
    }
}

/// Runs a complete harvest over HTTP
///
/// # Arguments
///
/// * `config` - The validated configuration
/// * `config_hash` - Hash of the configuration file
///
/// # Example
///
/// ```no_run
/// use listing_harvest::config::{load_config_with_hash, SearchOverrides};
/// use listing_harvest::crawler::run_harvest;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let (config, hash) = load_config_with_hash(Path::new("config.toml"), SearchOverrides::default())?;
/// let summary = run_harvest(config, hash).await?;
/// println!("{} apartments saved", summary.saved);
/// # Ok(())
/// # }
/// ```
pub async fn run_harvest(
    config: Config,
    config_hash: impl Into<String>,
) -> Result<HarvestSummary, HarvestError> {
    Coordinator::new(config, config_hash)?.run().await
}
