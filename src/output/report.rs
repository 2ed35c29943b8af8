//! Price report construction
//!
//! A `PriceReport` holds the two views the harvester renders for a dataset:
//! every apartment as a (space, price) point ordered by living space, and a
//! five-number summary of prices for each room count.

use crate::dataset::Dataset;
use crate::listing::{ListingType, Rooms};

/// One apartment on the space/price plane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpacePricePoint {
    pub space: u32,
    pub price: u64,
}

/// Price distribution of the apartments sharing a room count
#[derive(Debug, Clone, PartialEq)]
pub struct RoomsDistribution {
    /// Room count as displayed, e.g. "3" or "3.5"
    pub label: String,
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Aggregated view of a dataset
#[derive(Debug, Clone, PartialEq)]
pub struct PriceReport {
    pub city: String,
    pub listing_type: ListingType,
    /// Sorted by space; apartments with equal space keep dataset order
    pub points: Vec<SpacePricePoint>,
    /// Sorted by ascending room count
    pub distributions: Vec<RoomsDistribution>,
}

impl PriceReport {
    /// Builds the report for a dataset
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let mut points: Vec<SpacePricePoint> = dataset
            .iter()
            .map(|a| SpacePricePoint {
                space: a.space,
                price: a.price,
            })
            .collect();
        points.sort_by_key(|p| p.space);

        let mut by_rooms: Vec<(Rooms, u64)> = dataset.iter().map(|a| (a.rooms, a.price)).collect();
        by_rooms.sort_by(|a, b| a.0.as_f64().total_cmp(&b.0.as_f64()));

        let mut distributions = Vec::new();
        let mut start = 0;
        while start < by_rooms.len() {
            let rooms = by_rooms[start].0.as_f64();
            let end = by_rooms[start..]
                .iter()
                .position(|(r, _)| r.as_f64() != rooms)
                .map_or(by_rooms.len(), |offset| start + offset);

            let mut prices: Vec<f64> = by_rooms[start..end].iter().map(|(_, p)| *p as f64).collect();
            prices.sort_by(f64::total_cmp);
            distributions.push(RoomsDistribution {
                label: by_rooms[start].0.to_string(),
                count: prices.len(),
                min: prices[0],
                q1: percentile(&prices, 0.25),
                median: percentile(&prices, 0.5),
                q3: percentile(&prices, 0.75),
                max: prices[prices.len() - 1],
            });

            start = end;
        }

        Self {
            city: dataset.city().to_string(),
            listing_type: dataset.listing_type(),
            points,
            distributions,
        }
    }
}

/// Linear-interpolation percentile of an ascending, non-empty slice
fn percentile(sorted: &[f64], fraction: f64) -> f64 {
    let position = fraction * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    sorted[lower] + (sorted[upper] - sorted[lower]) * (position - lower as f64)
}
