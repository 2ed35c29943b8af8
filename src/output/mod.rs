//! Output module for reporting harvest results
//!
//! This module handles:
//! - Aggregating a dataset into a price report
//! - Rendering the report as markdown
//! - Displaying database statistics

mod markdown;
mod report;
pub mod stats;
mod traits;

pub use markdown::{format_markdown_report, write_markdown_report, MarkdownReporter};
pub use report::{PriceReport, RoomsDistribution, SpacePricePoint};
pub use stats::{load_statistics, print_statistics, HarvestStatistics};
pub use traits::{DatasetReporter, OutputError, OutputResult};
