//! Listing record types

use serde::Deserialize;
use std::fmt;

/// Kind of listing searched for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ListingType {
    /// Properties for sale
    Buy,

    /// Properties for rent
    Rent,
}

impl ListingType {
    /// Name of the maximum-price query parameter for this listing type
    pub fn price_param(&self) -> &'static str {
        match self {
            Self::Buy => "aj",
            Self::Rent => "ah",
        }
    }

    /// Path segment and database representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Rent => "rent",
        }
    }

    /// Parses a listing type from its database string representation
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "buy" => Some(Self::Buy),
            "rent" => Some(Self::Rent),
            _ => None,
        }
    }
}

impl fmt::Display for ListingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Number of rooms as advertised
///
/// Listings advertise half rooms ("3.5 rooms"), so the value keeps track of
/// whether the source numeral carried a decimal point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rooms {
    Whole(u32),
    Fractional(f64),
}

impl Rooms {
    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Whole(n) => f64::from(*n),
            Self::Fractional(n) => *n,
        }
    }
}

impl fmt::Display for Rooms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Whole(n) => write!(f, "{}", n),
            Self::Fractional(n) => write!(f, "{}", n),
        }
    }
}

/// One listing as extracted from a result page
///
/// `rooms`, `space` and `price` are absent when the advert does not disclose
/// them or the rendered text holds no usable numeral.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingRecord {
    pub rooms: Option<Rooms>,

    /// Living space in square metres
    pub space: Option<u32>,

    /// Price with currency and separators stripped
    pub price: Option<u64>,

    pub title: String,
    pub address: String,
}

impl ListingRecord {
    /// Returns true if rooms, space and price are all present
    pub fn is_complete(&self) -> bool {
        self.rooms.is_some() && self.space.is_some() && self.price.is_some()
    }
}

/// Records extracted from one result page, in document order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageResult {
    pub records: Vec<ListingRecord>,

    /// Rooms/space containers whose content could not be classified
    pub unclassified: usize,
}

impl PageResult {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
