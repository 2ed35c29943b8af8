//! Listing-Harvest main entry point
//!
//! This is the command-line interface for the Listing-Harvest scraper.

use clap::Parser;
use listing_harvest::config::{load_config_with_hash, Config, SearchOverrides};
use listing_harvest::crawler::run_harvest;
use listing_harvest::url::build_search_url;
use listing_harvest::ListingType;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Listing-Harvest: a paced real-estate listing scraper
///
/// Listing-Harvest walks the result pages of a property search, keeps every
/// listing that discloses rooms, living space and price, stores them in
/// SQLite and writes a markdown price report.
#[derive(Parser, Debug)]
#[command(name = "listing-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A paced real-estate listing scraper", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// City to search in (overrides [search] city)
    #[arg(short, long)]
    city: Option<String>,

    /// Listing type (overrides [search] listing-type)
    #[arg(short = 't', long = "type", value_enum)]
    listing_type: Option<ListingType>,

    /// Maximum price (overrides [search] max-price)
    #[arg(short = 'p', long = "price")]
    max_price: Option<u64>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show the first page URL without fetching anything
    #[arg(long, conflicts_with_all = ["stats", "export_report"])]
    dry_run: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with_all = ["dry_run", "export_report"])]
    stats: bool,

    /// Regenerate the price report from stored apartments and exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats"])]
    export_report: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let overrides = SearchOverrides {
        city: cli.city,
        listing_type: cli.listing_type,
        max_price: cli.max_price,
    };
    let (config, config_hash) = match load_config_with_hash(&cli.config, overrides) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config)?;
    } else if cli.stats {
        handle_stats(&config)?;
    } else if cli.export_report {
        handle_export_report(&config)?;
    } else {
        handle_harvest(config, config_hash).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("listing_harvest=info,warn"),
            1 => EnvFilter::new("listing_harvest=debug,info"),
            2 => EnvFilter::new("listing_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would be fetched
fn handle_dry_run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Listing-Harvest Dry Run ===\n");

    println!("Search:");
    println!("  City: {}", config.search.city);
    println!("  Listing type: {}", config.search.listing_type);
    println!("  Max price: {}", config.search.max_price);

    println!("\nCrawler Configuration:");
    println!("  Base URL: {}", config.crawler.base_url);
    println!("  Request delay: {}ms", config.crawler.request_delay_ms);
    println!("  Timeout: {}s", config.crawler.timeout_secs);

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);
    println!("  Contact Email: {}", config.user_agent.contact_email);

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);
    println!("  Report: {}", config.output.report_path);

    let first_page = build_search_url(&config.crawler.base_url, &config.search, 1)?;

    println!("\n✓ Configuration is valid");
    println!("✓ Would start at {}", first_page);

    Ok(())
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    use listing_harvest::output::{load_statistics, print_statistics};
    use listing_harvest::storage::SqliteStorage;

    println!("Database: {}\n", config.output.database_path);

    let storage = SqliteStorage::new(Path::new(&config.output.database_path))?;
    let stats = load_statistics(&storage)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the --export-report mode: rebuilds the report from stored apartments
fn handle_export_report(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    use listing_harvest::output::{DatasetReporter, MarkdownReporter};
    use listing_harvest::storage::{SqliteStorage, Storage};
    use listing_harvest::Dataset;

    println!("=== Exporting Price Report ===\n");
    println!("Database: {}", config.output.database_path);
    println!("Output: {}", config.output.report_path);
    println!();

    let storage = SqliteStorage::new(Path::new(&config.output.database_path))?;

    tracing::info!("Loading apartments from database...");
    let search = &config.search;
    let apartments = storage.load_apartments(&search.city, search.listing_type)?;
    if apartments.is_empty() {
        println!("No apartment found.");
        return Ok(());
    }

    let dataset = Dataset::new(search.city.clone(), search.listing_type, apartments);
    MarkdownReporter::new(&config.output.report_path).report(&dataset)?;

    println!("✓ Report exported to: {}", config.output.report_path);

    Ok(())
}

/// Handles the main harvest operation
async fn handle_harvest(config: Config, config_hash: String) -> Result<(), Box<dyn std::error::Error>> {
    match run_harvest(config, config_hash).await {
        Ok(summary) => {
            if !summary.found_apartments() {
                println!("No apartment found.");
            }
            tracing::info!(
                "Harvest finished ({}): {} pages, {} listings, {} discarded, {} saved",
                summary.stop,
                summary.pages_fetched,
                summary.records_extracted,
                summary.discarded,
                summary.saved
            );
            if let Some(path) = &summary.report_path {
                println!("✓ Report written to: {}", path.display());
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            Err(e.into())
        }
    }
}
