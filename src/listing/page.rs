//! Result page extraction
//!
//! A result page renders its listings as repeated regions: one price, one
//! rooms/space container, one address and one title per listing. The regions
//! are selected page-wide, checked for equal counts and then zipped into one
//! `RawListingBlock` per listing, in document order.

use crate::config::SelectorConfig;
use crate::listing::fields::{extract_listing, RawListingBlock};
use crate::listing::record::PageResult;
use crate::listing::ExtractError;
use crate::{ConfigError, ConfigResult};
use scraper::{ElementRef, Html, Selector};

/// Compiled CSS selectors for the regions of a result page
#[derive(Debug, Clone)]
pub struct PageSelectors {
    listing_container: Selector,
    price: Selector,
    rooms_space: Selector,
    rooms_space_item: Selector,
    address: Selector,
    title: Selector,
}

impl PageSelectors {
    /// Compiles the configured selectors
    ///
    /// # Returns
    ///
    /// * `Ok(PageSelectors)` - All selectors compiled
    /// * `Err(ConfigError::InvalidSelector)` - A selector is not valid CSS
    pub fn from_config(config: &SelectorConfig) -> ConfigResult<Self> {
        Ok(Self {
            listing_container: compile(&config.listing_container)?,
            price: compile(&config.price)?,
            rooms_space: compile(&config.rooms_space)?,
            rooms_space_item: compile(&config.rooms_space_item)?,
            address: compile(&config.address)?,
            title: compile(&config.title)?,
        })
    }
}

fn compile(selector: &str) -> ConfigResult<Selector> {
    Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })
}

/// Outcome of looking at a fetched page
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvaluation {
    /// The page has no listing containers: the result list is exhausted
    NoListings,

    /// The page has listings; records are in document order
    Listings(PageResult),
}

/// Counts the listing containers on a page
pub fn count_listing_containers(document: &Html, selectors: &PageSelectors) -> usize {
    document.select(&selectors.listing_container).count()
}

/// Extracts one record per listing from a parsed page
///
/// # Returns
///
/// * `Ok(PageResult)` - One record per listing, empty if the page has none
/// * `Err(ExtractError::CardinalityMismatch)` - The field regions do not line up
pub fn extract_page(document: &Html, selectors: &PageSelectors) -> Result<PageResult, ExtractError> {
    let prices: Vec<ElementRef<'_>> = document.select(&selectors.price).collect();
    let rooms_space: Vec<ElementRef<'_>> = document.select(&selectors.rooms_space).collect();
    let addresses: Vec<ElementRef<'_>> = document.select(&selectors.address).collect();
    let titles: Vec<ElementRef<'_>> = document.select(&selectors.title).collect();

    let count = prices.len();
    if rooms_space.len() != count || addresses.len() != count || titles.len() != count {
        return Err(ExtractError::CardinalityMismatch {
            prices: prices.len(),
            rooms_space: rooms_space.len(),
            addresses: addresses.len(),
            titles: titles.len(),
        });
    }

    let mut page = PageResult::default();
    let regions = prices
        .into_iter()
        .zip(rooms_space)
        .zip(addresses)
        .zip(titles);

    for (((price, rooms_space), address), title) in regions {
        let block = RawListingBlock {
            price,
            rooms_space,
            address,
            title,
        };
        let extraction = extract_listing(&block, &selectors.rooms_space_item);
        if extraction.unclassified {
            page.unclassified += 1;
        }
        page.records.push(extraction.record);
    }

    Ok(page)
}

/// Parses page markup and extracts its listings
pub fn parse_listing_page(html: &str, selectors: &PageSelectors) -> Result<PageResult, ExtractError> {
    let document = Html::parse_document(html);
    extract_page(&document, selectors)
}

/// Decides whether a page ends the result list, extracting its listings if not
///
/// Every listing container must yield exactly one listing; containers whose
/// field regions no longer match the selectors are an error, not an empty page.
pub fn evaluate_page(html: &str, selectors: &PageSelectors) -> Result<PageEvaluation, ExtractError> {
    let document = Html::parse_document(html);

    let containers = count_listing_containers(&document, selectors);
    if containers == 0 {
        return Ok(PageEvaluation::NoListings);
    }

    let page = extract_page(&document, selectors)?;
    if page.len() != containers {
        return Err(ExtractError::ContainerMismatch {
            containers,
            listings: page.len(),
        });
    }

    Ok(PageEvaluation::Listings(page))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::Rooms;

    fn selectors() -> PageSelectors {
        PageSelectors::from_config(&SelectorConfig::default()).unwrap()
    }

    fn card(price: &str, items: &[&str], address: &str, title: &str) -> String {
        let spans: String = items.iter().map(|i| format!("<span>{}</span>", i)).collect();
        format!(
            r#"<div role="listitem">
                <span class="HgListingCard_price_JoPAs">{price}</span>
                <div class="HgListingRoomsLivingSpace_roomsLivingSpace_GyVgq">{spans}</div>
                <div class="HgListingCard_address_JGiFv">{address}</div>
                <p class="HgListingDescription_title_NAAxy">{title}</p>
            </div>"#
        )
    }

    fn page(cards: &[String]) -> String {
        format!("<html><body><main>{}</main></body></html>", cards.concat())
    }

    #[test]
    fn test_extracts_records_in_document_order() {
        let cards: Vec<String> = (1..=5)
            .map(|i| {
                let rooms = format!("{} rooms", i);
                let space = format!("{}0m²", i + 4);
                card(
                    &format!("CHF {},000.–", i),
                    &[rooms.as_str(), space.as_str()],
                    &format!("Street {}", i),
                    &format!("Flat {}", i),
                )
            })
            .collect();

        let result = parse_listing_page(&page(&cards), &selectors()).unwrap();

        assert_eq!(result.len(), 5);
        assert_eq!(result.unclassified, 0);
        for (i, record) in result.records.iter().enumerate() {
            let n = i as u32 + 1;
            assert_eq!(record.title, format!("Flat {}", n));
            assert_eq!(record.address, format!("Street {}", n));
            assert_eq!(record.price, Some(u64::from(n) * 1000));
            assert_eq!(record.rooms, Some(Rooms::Whole(n)));
            assert_eq!(record.space, Some((n + 4) * 10));
        }
    }

    #[test]
    fn test_empty_page_yields_empty_result() {
        let result = parse_listing_page(&page(&[]), &selectors()).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_cardinality_mismatch_is_an_error() {
        let html = format!(
            "<html><body>{}<p class=\"HgListingDescription_title_NAAxy\">Orphan</p></body></html>",
            card("CHF 1,000.–", &["3 rooms", "70m²"], "Street", "Flat")
        );

        let result = parse_listing_page(&html, &selectors());

        assert_eq!(
            result,
            Err(ExtractError::CardinalityMismatch {
                prices: 1,
                rooms_space: 1,
                addresses: 1,
                titles: 2,
            })
        );
    }

    #[test]
    fn test_counts_unclassified_containers() {
        let cards = vec![
            card("CHF 1,000.–", &["Attic"], "A", "T"),
            card("CHF 1,000.–", &["3 rooms"], "A", "T"),
        ];

        let result = parse_listing_page(&page(&cards), &selectors()).unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result.unclassified, 1);
        assert_eq!(result.records[1].rooms, Some(Rooms::Whole(3)));
    }

    #[test]
    fn test_evaluate_page_without_containers() {
        let html = "<html><body><p>No results for your search.</p></body></html>";
        assert_eq!(
            evaluate_page(html, &selectors()).unwrap(),
            PageEvaluation::NoListings
        );
    }

    #[test]
    fn test_evaluate_page_with_listings() {
        let cards = vec![card("CHF 2,000.–", &["2.5 rooms", "60m²"], "A", "T")];

        match evaluate_page(&page(&cards), &selectors()).unwrap() {
            PageEvaluation::Listings(result) => {
                assert_eq!(result.len(), 1);
                assert_eq!(result.records[0].rooms, Some(Rooms::Fractional(2.5)));
            }
            PageEvaluation::NoListings => panic!("expected listings"),
        }
    }

    #[test]
    fn test_containers_without_field_regions_are_an_error() {
        let renamed = |title: &str| {
            format!(
                r#"<div role="listitem">
                    <span class="HgListingCard_price_Xy12z">CHF 1,500.–</span>
                    <p>{title}</p>
                </div>"#
            )
        };
        let html = page(&[renamed("A"), renamed("B")]);

        assert_eq!(
            evaluate_page(&html, &selectors()),
            Err(ExtractError::ContainerMismatch {
                containers: 2,
                listings: 0,
            })
        );
    }

    #[test]
    fn test_extra_container_is_an_error() {
        let cards = vec![
            card("CHF 2,000.–", &["2 rooms", "50m²"], "A", "T"),
            r#"<div role="listitem"><p>Sponsored</p></div>"#.to_string(),
        ];

        assert_eq!(
            evaluate_page(&page(&cards), &selectors()),
            Err(ExtractError::ContainerMismatch {
                containers: 2,
                listings: 1,
            })
        );
    }

    #[test]
    fn test_invalid_selector_is_rejected() {
        let config = SelectorConfig {
            price: "span[".to_string(),
            ..SelectorConfig::default()
        };

        let result = PageSelectors::from_config(&config);
        assert!(matches!(result, Err(ConfigError::InvalidSelector { .. })));
    }
}
