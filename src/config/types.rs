use crate::listing::ListingType;
use serde::Deserialize;

/// Main configuration structure for Listing-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub selectors: SelectorConfig,
}

/// Query parameters of a harvest run
///
/// The whole section may be left out when the command line supplies city
/// and price; the listing type defaults to `rent`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// City to search in (lower-cased before use)
    pub city: String,

    /// Whether to search properties for sale or for rent
    #[serde(rename = "listing-type")]
    pub listing_type: ListingType,

    /// Maximum price filter passed to the site
    #[serde(rename = "max-price")]
    pub max_price: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            city: String::new(),
            listing_type: ListingType::Rent,
            max_price: 0,
        }
    }
}

/// Pagination and request behavior
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Scheme and host of the classifieds site
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// Fixed delay between two page requests (milliseconds)
    #[serde(rename = "request-delay-ms", default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Overall timeout of one page request (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://www.homegate.ch".to_string()
}

fn default_request_delay_ms() -> u64 {
    1000
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_delay_ms: default_request_delay_ms(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the scraper
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the scraper
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the scraper
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for scraper-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Path to the markdown price report
    #[serde(rename = "report-path")]
    pub report_path: String,
}

/// CSS selectors for the regions of a result page
///
/// The defaults match the markup of homegate.ch result lists. The class
/// names carry build hashes, so they can be overridden without a rebuild.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SelectorConfig {
    /// One per listing; a page without any ends the result list
    pub listing_container: String,
    pub price: String,
    pub rooms_space: String,

    /// Items inside the rooms/space container
    pub rooms_space_item: String,
    pub address: String,
    pub title: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            listing_container: r#"div[role="listitem"]"#.to_string(),
            price: "span.HgListingCard_price_JoPAs".to_string(),
            rooms_space: "div.HgListingRoomsLivingSpace_roomsLivingSpace_GyVgq".to_string(),
            rooms_space_item: "span".to_string(),
            address: "div.HgListingCard_address_JGiFv".to_string(),
            title: "p.HgListingDescription_title_NAAxy".to_string(),
        }
    }
}
