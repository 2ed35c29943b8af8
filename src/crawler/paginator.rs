//! Pagination controller
//!
//! Fetches result pages one after another, starting at page 1, and stops at
//! the first page without listings or the first failed request. Pages are
//! strictly sequential with a fixed delay in between.

use crate::config::{Config, SearchConfig};
use crate::crawler::fetcher::PageFetcher;
use crate::dataset::DatasetBuilder;
use crate::listing::{evaluate_page, PageEvaluation, PageSelectors};
use crate::state::{PaginationState, StopReason};
use crate::url::build_search_url;
use crate::{ConfigResult, HarvestError};
use std::time::Duration;

/// Result of a completed pagination run
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    /// Records of every page with listings, in page order
    pub builder: DatasetBuilder,

    /// Number of requests that received a success response
    pub pages_fetched: u32,

    pub stop: StopReason,
}

/// Drives the page-by-page fetch loop
pub struct Paginator<'a, F: PageFetcher> {
    fetcher: &'a F,
    base_url: String,
    search: SearchConfig,
    selectors: PageSelectors,
    delay: Duration,
    state: PaginationState,
    pages_fetched: u32,
    current_url: String,
    current_body: String,
}

impl<'a, F: PageFetcher> Paginator<'a, F> {
    /// Creates a paginator positioned at page 1
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Source of result pages
    /// * `base_url` - Scheme and host of the site
    /// * `search` - Query parameters of the run
    /// * `selectors` - Compiled page selectors
    /// * `delay` - Fixed pause between two requests
    pub fn new(
        fetcher: &'a F,
        base_url: impl Into<String>,
        search: SearchConfig,
        selectors: PageSelectors,
        delay: Duration,
    ) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
            search,
            selectors,
            delay,
            state: PaginationState::initial(),
            pages_fetched: 0,
            current_url: String::new(),
            current_body: String::new(),
        }
    }

    /// Creates a paginator from the run configuration
    pub fn from_config(fetcher: &'a F, config: &Config) -> ConfigResult<Self> {
        Ok(Self::new(
            fetcher,
            config.crawler.base_url.clone(),
            config.search.clone(),
            PageSelectors::from_config(&config.selectors)?,
            Duration::from_millis(config.crawler.request_delay_ms),
        ))
    }

    pub fn state(&self) -> &PaginationState {
        &self.state
    }

    /// Runs the loop until it terminates
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlOutcome)` - The loop stopped on an empty page or a failed request
    /// * `Err(HarvestError::Extract)` - A page's field regions did not line up
    pub async fn run(mut self) -> Result<CrawlOutcome, HarvestError> {
        let mut builder = DatasetBuilder::new();

        let stop = loop {
            if let PaginationState::Terminated(reason) = &self.state {
                break reason.clone();
            }
            self.step(&mut builder).await?;
        };

        tracing::info!(
            "Pagination stopped ({}) after {} pages, {} listings collected",
            stop,
            self.pages_fetched,
            builder.record_count()
        );

        Ok(CrawlOutcome {
            builder,
            pages_fetched: self.pages_fetched,
            stop,
        })
    }

    async fn step(&mut self, builder: &mut DatasetBuilder) -> Result<(), HarvestError> {
        match self.state.clone() {
            PaginationState::Requesting { page } => {
                let url = build_search_url(&self.base_url, &self.search, page)?;
                tracing::debug!("Requesting page {}: {}", page, url);

                let next = match self.fetcher.fetch(&url).await {
                    Ok(fetched) if fetched.is_success() => {
                        self.pages_fetched += 1;
                        self.current_url = url.to_string();
                        self.current_body = fetched.body;
                        PaginationState::Evaluating { page }
                    }
                    Ok(fetched) => {
                        tracing::warn!("Page {} returned HTTP {}, stopping", page, fetched.status);
                        PaginationState::Terminated(StopReason::HttpStatus {
                            page,
                            status: fetched.status,
                        })
                    }
                    Err(e) => {
                        tracing::warn!("Request for page {} failed, stopping: {}", page, e);
                        PaginationState::Terminated(StopReason::Transport {
                            page,
                            message: e.to_string(),
                        })
                    }
                };

                self.transition(next)
            }

            PaginationState::Evaluating { page } => {
                let body = std::mem::take(&mut self.current_body);
                let evaluation =
                    evaluate_page(&body, &self.selectors).map_err(|source| HarvestError::Extract {
                        url: self.current_url.clone(),
                        source,
                    })?;

                let next = match evaluation {
                    PageEvaluation::NoListings => {
                        tracing::info!("No listings on page {}, end of results", page);
                        PaginationState::Terminated(StopReason::Exhausted { page })
                    }
                    PageEvaluation::Listings(result) => {
                        tracing::info!("Extracting data from {}", self.current_url);
                        tracing::debug!("Page {} yielded {} listings", page, result.len());
                        builder.push_page(result);
                        PaginationState::Continuing { page }
                    }
                };

                self.transition(next)
            }

            PaginationState::Continuing { page } => {
                tokio::time::sleep(self.delay).await;
                self.transition(PaginationState::Requesting { page: page + 1 })
            }

            PaginationState::Terminated(_) => Ok(()),
        }
    }

    fn transition(&mut self, next: PaginationState) -> Result<(), HarvestError> {
        if !self.state.can_transition_to(&next) {
            return Err(HarvestError::InvalidTransition {
                from: self.state.clone(),
                to: next,
            });
        }

        tracing::trace!("Pagination: {} -> {}", self.state, next);
        self.state = next;
        Ok(())
    }
}
