use crate::config::types::Config;
use crate::config::validation::validate;
use crate::listing::ListingType;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Search parameters given on the command line
///
/// Each present value replaces the one from the `[search]` section.
#[derive(Debug, Clone, Default)]
pub struct SearchOverrides {
    pub city: Option<String>,
    pub listing_type: Option<ListingType>,
    pub max_price: Option<u64>,
}

/// Loads and parses a configuration file from the given path
///
/// The city is lower-cased, as the site only knows lower-case city slugs.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use listing_harvest::config::load_config;
///
/// let config = load_config(Path::new("harvest.toml")).unwrap();
/// println!("Max price: {}", config.search.max_price);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    load_config_with_overrides(path, SearchOverrides::default())
}

/// Loads a configuration file, applying command line search overrides
///
/// Overrides are applied before validation, so the `[search]` section may be
/// incomplete or missing as long as the command line fills the gaps.
pub fn load_config_with_overrides(
    path: &Path,
    overrides: SearchOverrides,
) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;

    let mut config: Config = toml::from_str(&content)?;
    apply_overrides(&mut config, overrides);
    normalize(&mut config);

    validate(&config)?;

    Ok(config)
}

fn apply_overrides(config: &mut Config, overrides: SearchOverrides) {
    if let Some(city) = overrides.city {
        config.search.city = city;
    }
    if let Some(listing_type) = overrides.listing_type {
        config.search.listing_type = listing_type;
    }
    if let Some(max_price) = overrides.max_price {
        config.search.max_price = max_price;
    }
}

fn normalize(config: &mut Config) {
    config.search.city = config.search.city.trim().to_lowercase();
}

/// Computes a SHA-256 hash of the configuration file content
///
/// This is recorded with every run so runs made with different settings can
/// be told apart.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration with overrides and returns both the config and its hash
pub fn load_config_with_hash(
    path: &Path,
    overrides: SearchOverrides,
) -> Result<(Config, String), ConfigError> {
    let config = load_config_with_overrides(path, overrides)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}
