//! Fixtures
//!
//! Catalog data as YAML. The hotel's own data is compiled into the crate; a
//! directory of files with the same names can replace any of it at runtime.

use std::{fs, io::ErrorKind, path::Path};

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::catalog::{
    Catalog, CatalogError, menu::Menu, restaurants::Restaurant, rooms::Room, spa::SpaService,
};

pub mod menu;
pub mod restaurants;
pub mod rooms;
pub mod spa;

const MENU_YAML: &str = include_str!("../../fixtures/menu.yml");
const RESTAURANTS_YAML: &str = include_str!("../../fixtures/restaurants.yml");
const ROOMS_YAML: &str = include_str!("../../fixtures/rooms.yml");
const SPA_YAML: &str = include_str!("../../fixtures/spa.yml");

/// YAML sources for every catalog.
#[derive(Debug, Clone, Copy)]
pub struct CatalogSources<'a> {
    /// `menu.yml`
    pub menu: &'a str,

    /// `restaurants.yml`
    pub restaurants: &'a str,

    /// `rooms.yml`
    pub rooms: &'a str,

    /// `spa.yml`
    pub spa: &'a str,
}

impl CatalogSources<'static> {
    /// The data compiled into the crate.
    pub fn bundled() -> Self {
        Self {
            menu: MENU_YAML,
            restaurants: RESTAURANTS_YAML,
            rooms: ROOMS_YAML,
            spa: SPA_YAML,
        }
    }
}

/// Every catalog the concierge serves.
#[derive(Debug, Clone, Default)]
pub struct Catalogs {
    /// Room-service menu
    pub menu: Menu,

    /// Restaurants and bars
    pub restaurants: Catalog<Restaurant>,

    /// Room types
    pub rooms: Catalog<Room>,

    /// Spa services
    pub spa: Catalog<SpaService>,
}

impl Catalogs {
    /// Load the bundled catalogs.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled data fails to parse.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_sources(CatalogSources::bundled())
    }

    /// Load catalogs from `dir`, falling back to the bundled data for any of
    /// `menu.yml`, `restaurants.yml`, `rooms.yml` or `spa.yml` that is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if a file exists but cannot be read or parsed.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let dir = dir.as_ref();
        let bundled = CatalogSources::bundled();

        let menu = read_or(dir, "menu.yml", bundled.menu)?;
        let restaurants = read_or(dir, "restaurants.yml", bundled.restaurants)?;
        let rooms = read_or(dir, "rooms.yml", bundled.rooms)?;
        let spa = read_or(dir, "spa.yml", bundled.spa)?;

        Self::from_sources(CatalogSources {
            menu: &menu,
            restaurants: &restaurants,
            rooms: &rooms,
            spa: &spa,
        })
    }

    /// Parse catalogs from YAML sources.
    ///
    /// # Errors
    ///
    /// Returns an error if any source fails to parse, contains a malformed
    /// price, or repeats an id.
    pub fn from_sources(sources: CatalogSources<'_>) -> Result<Self, CatalogError> {
        let menu = parse::<menu::MenuFixture>(sources.menu)?.try_into()?;
        let restaurants = parse::<restaurants::RestaurantsFixture>(sources.restaurants)?.try_into()?;
        let rooms = parse::<rooms::RoomsFixture>(sources.rooms)?.try_into()?;
        let spa = parse::<spa::SpaFixture>(sources.spa)?.try_into()?;

        Ok(Self {
            menu,
            restaurants,
            rooms,
            spa,
        })
    }
}

fn parse<T: DeserializeOwned>(source: &str) -> Result<T, CatalogError> {
    Ok(serde_norway::from_str(source)?)
}

fn read_or(dir: &Path, file: &str, fallback: &str) -> Result<String, CatalogError> {
    let path = dir.join(file);

    match fs::read_to_string(&path) {
        Ok(contents) => {
            debug!(path = %path.display(), "Loaded catalog override");

            Ok(contents)
        }
        Err(error) if error.kind() == ErrorKind::NotFound => Ok(fallback.to_string()),
        Err(error) => Err(error.into()),
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::catalog::CatalogEntry;

    use super::*;

    #[test]
    fn bundled_catalogs_load() -> TestResult {
        let catalogs = Catalogs::bundled()?;

        assert!(!catalogs.menu.items().is_empty());
        assert!(!catalogs.restaurants.is_empty());
        assert!(!catalogs.rooms.is_empty());
        assert!(!catalogs.spa.is_empty());

        Ok(())
    }

    #[test]
    fn every_menu_item_belongs_to_a_known_category() -> TestResult {
        let catalogs = Catalogs::bundled()?;
        let menu = &catalogs.menu;

        for item in menu.items() {
            assert!(
                menu.all_categories()
                    .iter()
                    .any(|category| category.name == item.category()),
                "{} has unknown category {}",
                item.id,
                item.category
            );
        }

        Ok(())
    }

    #[test]
    fn directory_overrides_only_present_files() -> TestResult {
        let dir = tempfile::tempdir()?;

        fs::write(
            dir.path().join("rooms.yml"),
            "rooms:\n  - name: Attic Loft\n    description: Under the roof\n    category: Loft\n    capacity: 2 adults\n    max_guests: 2\n    price: 9000 RUB\n",
        )?;

        let catalogs = Catalogs::from_dir(dir.path())?;

        assert_eq!(catalogs.rooms.len(), 1);
        assert!(catalogs.rooms.get("room-attic-loft").is_some());
        assert_eq!(
            catalogs.menu.items().len(),
            Catalogs::bundled()?.menu.items().len()
        );

        Ok(())
    }

    #[test]
    fn malformed_override_is_an_error() -> TestResult {
        let dir = tempfile::tempdir()?;

        fs::write(dir.path().join("spa.yml"), "services: [")?;

        assert!(matches!(
            Catalogs::from_dir(dir.path()),
            Err(CatalogError::Yaml(_))
        ));

        Ok(())
    }
}
