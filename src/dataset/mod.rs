//! Dataset aggregation and cleaning
//!
//! Page results are appended to a `DatasetBuilder` in the order the pages
//! were fetched. Once pagination has stopped, `finalize` drops every record
//! lacking rooms, space or price and stamps the survivors with the run's
//! city and listing type.

use crate::listing::{ListingRecord, ListingType, PageResult, Rooms};

/// A complete listing, tagged with the query it was found for
#[derive(Debug, Clone, PartialEq)]
pub struct Apartment {
    pub rooms: Rooms,
    pub space: u32,
    pub price: u64,
    pub title: String,
    pub address: String,
    pub city: String,
    pub listing_type: ListingType,
}

impl Apartment {
    /// Converts a record into an apartment
    ///
    /// Returns None if the record lacks rooms, space or price.
    pub fn from_record(record: ListingRecord, city: &str, listing_type: ListingType) -> Option<Self> {
        match (record.rooms, record.space, record.price) {
            (Some(rooms), Some(space), Some(price)) => Some(Self {
                rooms,
                space,
                price,
                title: record.title,
                address: record.address,
                city: city.to_string(),
                listing_type,
            }),
            _ => None,
        }
    }
}

/// The cleaned result of a run
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    city: String,
    listing_type: ListingType,
    apartments: Vec<Apartment>,
}

impl Dataset {
    /// Creates a dataset from already complete apartments
    pub fn new(city: impl Into<String>, listing_type: ListingType, apartments: Vec<Apartment>) -> Self {
        Self {
            city: city.into(),
            listing_type,
            apartments,
        }
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn listing_type(&self) -> ListingType {
        self.listing_type
    }

    pub fn apartments(&self) -> &[Apartment] {
        &self.apartments
    }

    pub fn len(&self) -> usize {
        self.apartments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apartments.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Apartment> {
        self.apartments.iter()
    }
}

/// Outcome of finalizing a builder
#[derive(Debug, Clone, PartialEq)]
pub enum Finalized {
    /// At least one complete listing survived
    Ready { dataset: Dataset, discarded: usize },

    /// Every listing was incomplete, or there were none at all
    NoResults { discarded: usize },
}

/// Accumulates page results over a pagination run
#[derive(Debug, Clone, Default)]
pub struct DatasetBuilder {
    records: Vec<ListingRecord>,
    pages: u32,
    unclassified: usize,
}

impl DatasetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the records of the next page
    pub fn push_page(&mut self, page: PageResult) {
        self.pages += 1;
        self.unclassified += page.unclassified;
        self.records.extend(page.records);
    }

    /// Number of pages appended so far
    pub fn pages(&self) -> u32 {
        self.pages
    }

    /// Number of records appended so far, complete or not
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Rooms/space containers that could not be classified
    pub fn unclassified(&self) -> usize {
        self.unclassified
    }

    /// Applies the completeness filter and tags the surviving records
    ///
    /// # Arguments
    ///
    /// * `city` - City the run searched in
    /// * `listing_type` - Listing type the run searched for
    pub fn finalize(self, city: &str, listing_type: ListingType) -> Finalized {
        let total = self.records.len();
        let apartments: Vec<Apartment> = self
            .records
            .into_iter()
            .filter_map(|record| Apartment::from_record(record, city, listing_type))
            .collect();
        let discarded = total - apartments.len();

        tracing::debug!(
            "Completeness filter kept {} of {} records ({} discarded)",
            apartments.len(),
            total,
            discarded
        );

        if apartments.is_empty() {
            Finalized::NoResults { discarded }
        } else {
            Finalized::Ready {
                dataset: Dataset::new(city, listing_type, apartments),
                discarded,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, rooms: Option<Rooms>, space: Option<u32>, price: Option<u64>) -> ListingRecord {
        ListingRecord {
            rooms,
            space,
            price,
            title: title.to_string(),
            address: format!("{} street", title),
        }
    }

    fn complete(title: &str) -> ListingRecord {
        record(title, Some(Rooms::Fractional(3.5)), Some(85), Some(2900))
    }

    fn page(records: Vec<ListingRecord>) -> PageResult {
        PageResult {
            records,
            unclassified: 0,
        }
    }

    #[test]
    fn test_concatenates_pages_in_order() {
        let mut builder = DatasetBuilder::new();
        builder.push_page(page(vec![complete("a"), complete("b")]));
        builder.push_page(page(vec![complete("c"), complete("d")]));
        builder.push_page(page(vec![complete("e"), complete("f")]));

        assert_eq!(builder.pages(), 3);

        match builder.finalize("zurich", ListingType::Rent) {
            Finalized::Ready { dataset, discarded } => {
                assert_eq!(discarded, 0);
                assert_eq!(dataset.len(), 6);
                let titles: Vec<&str> = dataset.iter().map(|a| a.title.as_str()).collect();
                assert_eq!(titles, vec!["a", "b", "c", "d", "e", "f"]);
                assert!(dataset
                    .iter()
                    .all(|a| a.city == "zurich" && a.listing_type == ListingType::Rent));
            }
            Finalized::NoResults { .. } => panic!("expected a dataset"),
        }
    }

    #[test]
    fn test_drops_record_missing_space() {
        let mut builder = DatasetBuilder::new();
        builder.push_page(page(vec![
            record("no-space", Some(Rooms::Whole(2)), None, Some(1800)),
            complete("kept"),
        ]));

        match builder.finalize("bern", ListingType::Buy) {
            Finalized::Ready { dataset, discarded } => {
                assert_eq!(discarded, 1);
                assert_eq!(
                    dataset.apartments(),
                    &[Apartment {
                        rooms: Rooms::Fractional(3.5),
                        space: 85,
                        price: 2900,
                        title: "kept".to_string(),
                        address: "kept street".to_string(),
                        city: "bern".to_string(),
                        listing_type: ListingType::Buy,
                    }]
                );
            }
            Finalized::NoResults { .. } => panic!("expected a dataset"),
        }
    }

    #[test]
    fn test_drops_records_missing_rooms_or_price() {
        let mut builder = DatasetBuilder::new();
        builder.push_page(page(vec![
            record("no-rooms", None, Some(70), Some(1800)),
            record("no-price", Some(Rooms::Whole(3)), Some(70), None),
        ]));

        assert_eq!(
            builder.finalize("bern", ListingType::Rent),
            Finalized::NoResults { discarded: 2 }
        );
    }

    #[test]
    fn test_empty_builder_has_no_results() {
        let builder = DatasetBuilder::new();
        assert_eq!(
            builder.finalize("basel", ListingType::Rent),
            Finalized::NoResults { discarded: 0 }
        );
    }

    #[test]
    fn test_tracks_unclassified_containers() {
        let mut builder = DatasetBuilder::new();
        builder.push_page(PageResult {
            records: vec![record("x", None, None, Some(1000))],
            unclassified: 1,
        });
        builder.push_page(PageResult {
            records: vec![complete("y")],
            unclassified: 0,
        });

        assert_eq!(builder.unclassified(), 1);
        assert_eq!(builder.record_count(), 2);
    }
}
