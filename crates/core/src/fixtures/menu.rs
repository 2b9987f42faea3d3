//! Menu Fixtures

use serde::Deserialize;

use crate::{
    catalog::{
        CatalogError, generate_id,
        menu::{DietaryInfo, Menu, MenuCategory, MenuItem},
    },
    pricing::parse_price,
};

/// Wrapper for the menu in YAML
#[derive(Debug, Deserialize)]
pub struct MenuFixture {
    /// Menu sections
    pub categories: Vec<MenuCategory>,

    /// Dishes and drinks
    pub items: Vec<MenuItemFixture>,
}

/// Menu Item Fixture
#[derive(Debug, Deserialize)]
pub struct MenuItemFixture {
    /// Item id; derived from the name when omitted
    #[serde(default)]
    pub id: Option<String>,

    /// Item name
    pub name: String,

    /// Item description
    #[serde(default)]
    pub description: Option<String>,

    /// Item price (e.g., "650 RUB")
    pub price: String,

    /// Category name
    pub category: String,

    /// Portion size (e.g., "300 g")
    #[serde(default)]
    pub portion: Option<String>,

    /// Dietary flags
    #[serde(default)]
    pub dietary: DietaryInfo,
}

impl TryFrom<MenuItemFixture> for MenuItem {
    type Error = CatalogError;

    fn try_from(fixture: MenuItemFixture) -> Result<Self, Self::Error> {
        let id = fixture
            .id
            .unwrap_or_else(|| generate_id("menu", &fixture.name));

        Ok(MenuItem {
            id,
            price: parse_price(&fixture.price)?,
            name: fixture.name,
            description: fixture.description,
            category: fixture.category,
            portion: fixture.portion,
            dietary: fixture.dietary,
        })
    }
}

impl TryFrom<MenuFixture> for Menu {
    type Error = CatalogError;

    fn try_from(fixture: MenuFixture) -> Result<Self, Self::Error> {
        let items = fixture
            .items
            .into_iter()
            .map(MenuItem::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Menu::new(items, fixture.categories)
    }
}
