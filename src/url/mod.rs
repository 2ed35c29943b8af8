//! Search URL construction
//!
//! One result page is addressed as
//! `{base}/{type}/real-estate/city-{city}/matching-list?{price-param}={price}&ep={page}`,
//! where the price parameter name depends on the listing type.

use crate::config::SearchConfig;
use ::url::{ParseError, Url};

/// Builds the URL of one result page
///
/// # Arguments
///
/// * `base_url` - Scheme and host of the site, e.g. `https://www.homegate.ch`
/// * `search` - City, listing type and maximum price
/// * `page` - 1-based page index
///
/// # Example
///
/// ```
/// use listing_harvest::config::SearchConfig;
/// use listing_harvest::url::build_search_url;
/// use listing_harvest::ListingType;
///
/// let search = SearchConfig {
///     city: "zurich".to_string(),
///     listing_type: ListingType::Rent,
///     max_price: 3000,
/// };
/// let url = build_search_url("https://www.homegate.ch", &search, 2).unwrap();
/// assert_eq!(
///     url.as_str(),
///     "https://www.homegate.ch/rent/real-estate/city-zurich/matching-list?ah=3000&ep=2"
/// );
/// ```
pub fn build_search_url(base_url: &str, search: &SearchConfig, page: u32) -> Result<Url, ParseError> {
    let mut url = Url::parse(base_url)?;

    let city_segment = format!("city-{}", search.city);
    url.path_segments_mut()
        .map_err(|_| ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop_if_empty()
        .extend(&[
            search.listing_type.as_str(),
            "real-estate",
            city_segment.as_str(),
            "matching-list",
        ]);

    url.query_pairs_mut()
        .append_pair(search.listing_type.price_param(), &search.max_price.to_string())
        .append_pair("ep", &page.to_string());

    Ok(url)
}
