//! Markdown report generation
//!
//! This module renders a `PriceReport` as a human-readable markdown file:
//! price distribution per room count, then every apartment by living space.

use crate::dataset::Dataset;
use crate::output::report::PriceReport;
use crate::output::traits::{DatasetReporter, OutputResult};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes a markdown report for a dataset
///
/// # Arguments
///
/// * `report` - The aggregated report data
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(OutputError)` - Failed to write the report
pub fn write_markdown_report(report: &PriceReport, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_report(report);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a price report as markdown
pub fn format_markdown_report(report: &PriceReport) -> String {
    let mut md = String::new();

    md.push_str(&format!(
        "# Apartment Prices: {} ({})\n\n",
        report.city, report.listing_type
    ));
    md.push_str(&format!("- **Apartments**: {}\n", report.points.len()));
    md.push_str(&format!(
        "- **Room counts**: {}\n\n",
        report.distributions.len()
    ));

    md.push_str("## Price Distribution by Rooms\n\n");
    md.push_str("| Rooms | Count | Min | Q1 | Median | Q3 | Max |\n");
    md.push_str("|-------|-------|-----|----|--------|----|-----|\n");
    for d in &report.distributions {
        md.push_str(&format!(
            "| {} | {} | {:.0} | {:.0} | {:.0} | {:.0} | {:.0} |\n",
            d.label, d.count, d.min, d.q1, d.median, d.q3, d.max
        ));
    }
    md.push('\n');

    md.push_str("## Price by Living Space\n\n");
    md.push_str("| Space (m²) | Price |\n");
    md.push_str("|------------|-------|\n");
    for point in &report.points {
        md.push_str(&format!("| {} | {} |\n", point.space, point.price));
    }

    md
}

/// Reporter writing a markdown file
#[derive(Debug, Clone)]
pub struct MarkdownReporter {
    path: PathBuf,
}

impl MarkdownReporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DatasetReporter for MarkdownReporter {
    fn report(&self, dataset: &Dataset) -> OutputResult<()> {
        let report = PriceReport::from_dataset(dataset);
        write_markdown_report(&report, &self.path)?;
        tracing::info!("Wrote price report to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Apartment;
    use crate::listing::{ListingType, Rooms};
    use tempfile::TempDir;

    fn dataset() -> Dataset {
        let apartment = |rooms, space, price| Apartment {
            rooms,
            space,
            price,
            title: "Flat".to_string(),
            address: "Street".to_string(),
            city: "zurich".to_string(),
            listing_type: ListingType::Rent,
        };

        Dataset::new(
            "zurich",
            ListingType::Rent,
            vec![
                apartment(Rooms::Fractional(3.5), 85, 2900),
                apartment(Rooms::Whole(2), 50, 1700),
            ],
        )
    }

    #[test]
    fn test_format_markdown_report() {
        let report = PriceReport::from_dataset(&dataset());
        let md = format_markdown_report(&report);

        assert!(md.starts_with("# Apartment Prices: zurich (rent)"));
        assert!(md.contains("- **Apartments**: 2"));
        assert!(md.contains("| 2 | 1 | 1700 | 1700 | 1700 | 1700 | 1700 |"));
        assert!(md.contains("| 3.5 | 1 | 2900 |"));

        let small = md.find("| 50 | 1700 |").unwrap();
        let large = md.find("| 85 | 2900 |").unwrap();
        assert!(small < large);
    }

    #[test]
    fn test_markdown_reporter_writes_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.md");

        let reporter = MarkdownReporter::new(&path);
        reporter.report(&dataset()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("## Price Distribution by Rooms"));
        assert!(content.contains("## Price by Living Space"));
    }

    #[test]
    fn test_markdown_reporter_missing_directory() {
        let dir = TempDir::new().unwrap();
        let reporter = MarkdownReporter::new(dir.path().join("missing").join("report.md"));

        assert!(reporter.report(&dataset()).is_err());
    }
}
