//! Field extraction for a single listing
//!
//! Each listing card renders a price, an address, a title and a container
//! with up to two `span` elements describing rooms and/or living space.
//! Numeric values are normalized here; text that carries no usable numeral
//! yields an absent value instead of an error.

use crate::listing::record::{ListingRecord, Rooms};
use regex::Regex;
use scraper::{ElementRef, Selector};
use std::sync::OnceLock;

/// The markup regions belonging to one listing, borrowed from the parsed page
#[derive(Debug, Clone, Copy)]
pub struct RawListingBlock<'a> {
    pub price: ElementRef<'a>,
    pub rooms_space: ElementRef<'a>,
    pub address: ElementRef<'a>,
    pub title: ElementRef<'a>,
}

/// What a rooms/space container holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomsSpace<'a> {
    /// Two or more items: rooms first, living space second
    Both { rooms: &'a str, space: &'a str },

    RoomsOnly(&'a str),

    SpaceOnly(&'a str),

    Neither,
}

/// Result of extracting one listing
#[derive(Debug, Clone, PartialEq)]
pub struct ListingExtraction {
    pub record: ListingRecord,

    /// True if the rooms/space container had content that matched no layout
    pub unclassified: bool,
}

fn rooms_numeral() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[0-9]+(\.[0-9]+)?").expect("rooms pattern is valid"))
}

fn digits_only(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_digit()).collect()
}

fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect()
}

/// Parses a rendered price such as `CHF 1'250'000.–`
///
/// Every non-digit character is dropped. Returns None when no digit is left
/// (e.g. "Price on request").
pub fn parse_price(text: &str) -> Option<u64> {
    digits_only(text).parse().ok()
}

/// Parses a living space text such as `80m² living space`
pub fn parse_space(text: &str) -> Option<u32> {
    digits_only(text).parse().ok()
}

/// Parses the first numeral of a rooms text such as `3.5 rooms`
///
/// A numeral with a decimal point yields `Rooms::Fractional`, otherwise
/// `Rooms::Whole`.
pub fn parse_rooms(text: &str) -> Option<Rooms> {
    let numeral = rooms_numeral().find(text)?.as_str();

    if numeral.contains('.') {
        numeral.parse().ok().map(Rooms::Fractional)
    } else {
        numeral.parse().ok().map(Rooms::Whole)
    }
}

/// Classifies the texts of a rooms/space container
///
/// With two or more items the first is rooms and the second is space; any
/// further items are ignored. A single item is identified by keyword, "room"
/// winning over "space" when both appear. An empty container holds neither.
pub fn classify_rooms_space(items: &[String]) -> RoomsSpace<'_> {
    match items {
        [rooms, space, ..] => RoomsSpace::Both {
            rooms: rooms.as_str(),
            space: space.as_str(),
        },
        [single] => {
            let lowered = single.to_lowercase();
            if lowered.contains("room") {
                RoomsSpace::RoomsOnly(single.as_str())
            } else if lowered.contains("space") {
                RoomsSpace::SpaceOnly(single.as_str())
            } else {
                RoomsSpace::Neither
            }
        }
        [] => RoomsSpace::Neither,
    }
}

/// Extracts the record of one listing
///
/// # Arguments
///
/// * `block` - The listing's markup regions
/// * `item_selector` - Selector for the items inside the rooms/space container
pub fn extract_listing(block: &RawListingBlock<'_>, item_selector: &Selector) -> ListingExtraction {
    let items: Vec<String> = block
        .rooms_space
        .select(item_selector)
        .map(|item| element_text(&item))
        .collect();

    let layout = classify_rooms_space(&items);
    let unclassified = layout == RoomsSpace::Neither && !items.is_empty();
    if unclassified {
        tracing::warn!("Unrecognized rooms/space content, dropping both: {:?}", items);
    }

    let (rooms, space) = match layout {
        RoomsSpace::Both { rooms, space } => (parse_rooms(rooms), parse_space(space)),
        RoomsSpace::RoomsOnly(rooms) => (parse_rooms(rooms), None),
        RoomsSpace::SpaceOnly(space) => (None, parse_space(space)),
        RoomsSpace::Neither => (None, None),
    };

    ListingExtraction {
        record: ListingRecord {
            rooms,
            space,
            price: parse_price(&element_text(&block.price)),
            title: element_text(&block.title),
            address: element_text(&block.address),
        },
        unclassified,
    }
}
