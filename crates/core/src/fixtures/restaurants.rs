//! Restaurant Fixtures

use serde::Deserialize;

use crate::{
    catalog::{Catalog, CatalogError, generate_id, restaurants::Restaurant},
    pricing::parse_price,
};

/// Wrapper for restaurants in YAML
#[derive(Debug, Deserialize)]
pub struct RestaurantsFixture {
    /// Restaurants in display order
    pub restaurants: Vec<RestaurantFixture>,
}

/// Restaurant Fixture
#[derive(Debug, Deserialize)]
pub struct RestaurantFixture {
    /// Restaurant id; derived from the name when omitted
    #[serde(default)]
    pub id: Option<String>,

    /// Restaurant name
    pub name: String,

    /// Description
    pub description: String,

    /// Cuisines, comma separated
    pub cuisine: String,

    /// Average bill per guest (e.g., "3500 RUB")
    #[serde(default)]
    pub average_price: Option<String>,

    /// Opening hours
    pub hours: String,

    /// Features
    #[serde(default)]
    pub features: Vec<String>,

    /// Location within the hotel
    #[serde(default)]
    pub location: Option<String>,

    /// Contact
    #[serde(default)]
    pub contact: Option<String>,
}

impl TryFrom<RestaurantFixture> for Restaurant {
    type Error = CatalogError;

    fn try_from(fixture: RestaurantFixture) -> Result<Self, Self::Error> {
        let average_price = fixture
            .average_price
            .as_deref()
            .map(parse_price)
            .transpose()?;

        Ok(Restaurant {
            id: fixture
                .id
                .unwrap_or_else(|| generate_id("restaurant", &fixture.name)),
            name: fixture.name,
            description: fixture.description,
            cuisine: fixture.cuisine,
            average_price,
            hours: fixture.hours,
            features: fixture.features,
            location: fixture.location,
            contact: fixture.contact,
        })
    }
}

impl TryFrom<RestaurantsFixture> for Catalog<Restaurant> {
    type Error = CatalogError;

    fn try_from(fixture: RestaurantsFixture) -> Result<Self, Self::Error> {
        let restaurants = fixture
            .restaurants
            .into_iter()
            .map(Restaurant::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Catalog::new(restaurants)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn average_price_is_optional() -> TestResult {
        let yaml = r#"
restaurants:
  - name: Lobby Bar
    description: Cocktails by the fireplace
    cuisine: Bar
    hours: "24/7"
  - id: atrium
    name: Atrium
    description: All-day dining
    cuisine: European, Russian
    average_price: 2500 RUB
    hours: 07:00 - 23:00
    features: [breakfast buffet]
"#;

        let fixture: RestaurantsFixture = serde_norway::from_str(yaml)?;
        let catalog = Catalog::<Restaurant>::try_from(fixture)?;

        let bar = catalog.get("restaurant-lobby-bar").ok_or("missing bar")?;
        let atrium = catalog.get("atrium").ok_or("missing atrium")?;

        assert_eq!(bar.average_price, None);
        assert!(bar.is_always_open());
        assert_eq!(atrium.average_price, Some(250_000));

        Ok(())
    }

    #[test]
    fn duplicate_ids_are_rejected() -> TestResult {
        let yaml = r"
restaurants:
  - id: one
    name: One
    description: ''
    cuisine: Bar
    hours: 10:00 - 22:00
  - id: one
    name: Two
    description: ''
    cuisine: Bar
    hours: 10:00 - 22:00
";

        let fixture: RestaurantsFixture = serde_norway::from_str(yaml)?;

        assert!(matches!(
            Catalog::<Restaurant>::try_from(fixture),
            Err(CatalogError::DuplicateId(id)) if id == "one"
        ));

        Ok(())
    }
}
