//! Rooms

use crate::catalog::{Catalog, CatalogEntry, PriceRange, contains_ignore_case};

/// A bookable room type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    /// Stable id
    pub id: String,

    /// Display name
    pub name: String,

    /// Description
    pub description: String,

    /// Room class, e.g. "Superior" or "Suite"
    pub category: String,

    /// Bed configuration as advertised, e.g. "2 adults + 1 child"
    pub capacity: String,

    /// Largest party the room accepts
    pub max_guests: u32,

    /// Nightly rate range
    pub price_range: PriceRange,

    /// In-room amenities
    pub amenities: Vec<String>,

    /// Selling points, e.g. "city view"
    pub features: Vec<String>,
}

impl Room {
    fn has_feature(&self, needle: &str) -> bool {
        self.features
            .iter()
            .any(|feature| contains_ignore_case(feature, needle))
    }

    fn has_amenity(&self, needle: &str) -> bool {
        self.amenities
            .iter()
            .any(|amenity| contains_ignore_case(amenity, needle))
    }
}

impl CatalogEntry for Room {
    fn id(&self) -> &str {
        &self.id
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn matches(&self, needle: &str) -> bool {
        contains_ignore_case(&self.name, needle)
            || contains_ignore_case(&self.description, needle)
            || contains_ignore_case(&self.category, needle)
            || self.has_feature(needle)
            || self.has_amenity(needle)
    }
}

impl Catalog<Room> {
    /// Rooms that can sleep at least `guests`.
    pub fn for_guests(&self, guests: u32) -> Vec<&Room> {
        self.filter(|room| room.max_guests >= guests)
    }

    /// Rooms whose whole nightly rate range lies within `[min, max]`.
    pub fn by_price_range(&self, min: u64, max: u64) -> Vec<&Room> {
        self.filter(|room| room.price_range.within(min, max))
    }

    /// Rooms with a feature containing `feature`, ignoring case.
    pub fn by_feature(&self, feature: &str) -> Vec<&Room> {
        let needle = feature.to_lowercase();

        self.filter(|room| room.has_feature(&needle))
    }

    /// Rooms with an amenity containing `amenity`, ignoring case.
    pub fn by_amenity(&self, amenity: &str) -> Vec<&Room> {
        let needle = amenity.to_lowercase();

        self.filter(|room| room.has_amenity(&needle))
    }
}
