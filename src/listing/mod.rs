//! Listing extraction
//!
//! This module turns the markup of a result page into listing records:
//! - `fields`: per-listing field extraction (price, rooms, living space, title, address)
//! - `page`: locating the listing regions of a page and assembling one record per listing
//! - `record`: the record types shared with the rest of the pipeline

mod fields;
mod page;
mod record;

pub use fields::{
    classify_rooms_space, extract_listing, parse_price, parse_rooms, parse_space,
    ListingExtraction, RawListingBlock, RoomsSpace,
};
pub use page::{
    count_listing_containers, evaluate_page, extract_page, parse_listing_page, PageEvaluation,
    PageSelectors,
};
pub use record::{ListingRecord, ListingType, PageResult, Rooms};

use thiserror::Error;

/// Errors raised while extracting listings from a page
///
/// Missing numeric values are not errors; they surface as `None` fields on
/// the record. Only structural problems with the page end up here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error(
        "field region counts differ: {prices} prices, {rooms_space} rooms/space, \
         {addresses} addresses, {titles} titles"
    )]
    CardinalityMismatch {
        prices: usize,
        rooms_space: usize,
        addresses: usize,
        titles: usize,
    },

    #[error("{containers} listing containers on the page but {listings} listings extracted")]
    ContainerMismatch { containers: usize, listings: usize },
}
