//! Room Fixtures

use serde::Deserialize;

use crate::catalog::{Catalog, CatalogError, PriceRange, generate_id, rooms::Room};

/// Wrapper for rooms in YAML
#[derive(Debug, Deserialize)]
pub struct RoomsFixture {
    /// Room types in display order
    pub rooms: Vec<RoomFixture>,
}

/// Room Fixture
#[derive(Debug, Deserialize)]
pub struct RoomFixture {
    /// Room id; derived from the name when omitted
    #[serde(default)]
    pub id: Option<String>,

    /// Room name
    pub name: String,

    /// Description
    pub description: String,

    /// Room class
    pub category: String,

    /// Advertised capacity
    pub capacity: String,

    /// Largest party the room accepts
    pub max_guests: u32,

    /// Nightly rate (e.g., "12000-15000 RUB")
    pub price: String,

    /// Amenities
    #[serde(default)]
    pub amenities: Vec<String>,

    /// Features
    #[serde(default)]
    pub features: Vec<String>,
}

impl TryFrom<RoomFixture> for Room {
    type Error = CatalogError;

    fn try_from(fixture: RoomFixture) -> Result<Self, Self::Error> {
        Ok(Room {
            id: fixture
                .id
                .unwrap_or_else(|| generate_id("room", &fixture.name)),
            price_range: fixture.price.parse::<PriceRange>()?,
            name: fixture.name,
            description: fixture.description,
            category: fixture.category,
            capacity: fixture.capacity,
            max_guests: fixture.max_guests,
            amenities: fixture.amenities,
            features: fixture.features,
        })
    }
}

impl TryFrom<RoomsFixture> for Catalog<Room> {
    type Error = CatalogError;

    fn try_from(fixture: RoomsFixture) -> Result<Self, Self::Error> {
        let rooms = fixture
            .rooms
            .into_iter()
            .map(Room::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Catalog::new(rooms)
    }
}
