//! Reporting traits and error types

use crate::dataset::Dataset;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Consumer of a finalized dataset
///
/// Reporters only read the dataset; it is shared with persistence, which
/// runs first.
pub trait DatasetReporter {
    /// Renders a report for the dataset
    fn report(&self, dataset: &Dataset) -> OutputResult<()>;
}
