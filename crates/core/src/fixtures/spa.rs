//! Spa Fixtures

use serde::Deserialize;

use crate::catalog::{
    Catalog, CatalogError, PriceRange, generate_id,
    spa::{SpaService, parse_durations},
};

/// Wrapper for spa services in YAML
#[derive(Debug, Deserialize)]
pub struct SpaFixture {
    /// Services in display order
    pub services: Vec<SpaServiceFixture>,
}

/// Spa Service Fixture
#[derive(Debug, Deserialize)]
pub struct SpaServiceFixture {
    /// Service id; derived from the name when omitted
    #[serde(default)]
    pub id: Option<String>,

    /// Service name
    pub name: String,

    /// Description
    pub description: String,

    /// Service group
    pub category: String,

    /// Advertised duration (e.g., "60/90 min")
    #[serde(default)]
    pub duration: Option<String>,

    /// Price or price range (e.g., "5500-7500 RUB")
    #[serde(default)]
    pub price: Option<String>,

    /// Features
    #[serde(default)]
    pub features: Vec<String>,

    /// Promoted on the landing page
    #[serde(default)]
    pub featured: bool,
}

impl TryFrom<SpaServiceFixture> for SpaService {
    type Error = CatalogError;

    fn try_from(fixture: SpaServiceFixture) -> Result<Self, Self::Error> {
        let price_range = fixture
            .price
            .as_deref()
            .map(str::parse::<PriceRange>)
            .transpose()?;

        let durations = fixture
            .duration
            .as_deref()
            .map(parse_durations)
            .unwrap_or_default();

        Ok(SpaService {
            id: fixture
                .id
                .unwrap_or_else(|| generate_id("spa", &fixture.name)),
            name: fixture.name,
            description: fixture.description,
            category: fixture.category,
            duration: fixture.duration,
            durations,
            price_range,
            features: fixture.features,
            featured: fixture.featured,
        })
    }
}

impl TryFrom<SpaFixture> for Catalog<SpaService> {
    type Error = CatalogError;

    fn try_from(fixture: SpaFixture) -> Result<Self, Self::Error> {
        let services = fixture
            .services
            .into_iter()
            .map(SpaService::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Catalog::new(services)
    }
}
