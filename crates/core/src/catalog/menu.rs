//! Room-service menu

use serde::Deserialize;

use crate::{
    catalog::{Catalog, CatalogEntry, CatalogError, CatalogItem, contains_ignore_case},
    pricing::PriceStats,
};

/// Dietary flags. Used both to describe a dish and as a set of requirements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "snake_case")]
#[expect(
    clippy::struct_excessive_bools,
    reason = "independent dietary flags from the menu data."
)]
pub struct DietaryInfo {
    /// No meat or fish
    pub vegetarian: bool,

    /// No dairy
    pub lactose_free: bool,

    /// No gluten
    pub gluten_free: bool,

    /// Hot
    pub spicy: bool,

    /// Halal certified
    pub halal: bool,
}

impl DietaryInfo {
    /// Whether every flag set in `requirements` is also set here.
    pub fn satisfies(&self, requirements: &DietaryInfo) -> bool {
        (!requirements.vegetarian || self.vegetarian)
            && (!requirements.lactose_free || self.lactose_free)
            && (!requirements.gluten_free || self.gluten_free)
            && (!requirements.spicy || self.spicy)
            && (!requirements.halal || self.halal)
    }
}

/// A dish or drink on the menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    /// Stable id
    pub id: String,

    /// Display name
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// Price in minor units
    pub price: u64,

    /// Category name
    pub category: String,

    /// Portion size, e.g. "250 g"
    pub portion: Option<String>,

    /// Dietary flags
    pub dietary: DietaryInfo,
}

impl MenuItem {
    /// Create an item with no description, portion or dietary flags.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: u64,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            price,
            category: category.into(),
            portion: None,
            dietary: DietaryInfo::default(),
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the dietary flags.
    #[must_use]
    pub fn with_dietary(mut self, dietary: DietaryInfo) -> Self {
        self.dietary = dietary;
        self
    }
}

impl CatalogItem for MenuItem {
    fn name(&self) -> &str {
        &self.name
    }

    fn price(&self) -> u64 {
        self.price
    }
}

impl CatalogEntry for MenuItem {
    fn id(&self) -> &str {
        &self.id
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn matches(&self, needle: &str) -> bool {
        contains_ignore_case(&self.name, needle)
            || self
                .description
                .as_deref()
                .is_some_and(|description| contains_ignore_case(description, needle))
            || contains_ignore_case(&self.category, needle)
    }
}

/// A menu section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MenuCategory {
    /// Stable id, e.g. `soups`
    pub id: String,

    /// Display name, matched against [`MenuItem::category`]
    pub name: String,

    /// Display order
    pub order: u32,

    /// Hidden categories are not offered as browse filters
    #[serde(default)]
    pub hidden: bool,
}

/// Combined menu filter; unset fields do not constrain.
#[derive(Debug, Clone, Default)]
pub struct MenuQuery {
    /// Case-insensitive text matched against name and description
    pub text: Option<String>,

    /// Category name
    pub category: Option<String>,

    /// Lowest acceptable price
    pub min_price: Option<u64>,

    /// Highest acceptable price
    pub max_price: Option<u64>,

    /// Required dietary flags
    pub dietary: Option<DietaryInfo>,
}

const BREAKFAST: &str = "breakfast";
const SOUPS: &str = "soups";
const MAIN_DISHES: &str = "main-dishes";
const COLD_APPETIZERS: &str = "cold-appetizers";
const HOT_APPETIZERS: &str = "hot-appetizers";
const DESSERTS: &str = "desserts";
const DRINKS: &str = "drinks";

/// The room-service menu: items plus their ordered categories.
#[derive(Debug, Clone, Default)]
pub struct Menu {
    items: Catalog<MenuItem>,
    categories: Vec<MenuCategory>,
}

impl Menu {
    /// Build a menu. Categories are sorted by their display order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateId`] if two items share an id.
    pub fn new(
        items: Vec<MenuItem>,
        mut categories: Vec<MenuCategory>,
    ) -> Result<Self, CatalogError> {
        categories.sort_by_key(|category| category.order);

        Ok(Self {
            items: Catalog::new(items)?,
            categories,
        })
    }

    /// All items.
    pub fn items(&self) -> &Catalog<MenuItem> {
        &self.items
    }

    /// Look up an item by id.
    pub fn item(&self, id: &str) -> Option<&MenuItem> {
        self.items.get(id)
    }

    /// Categories offered for browsing, in display order.
    pub fn categories(&self) -> impl Iterator<Item = &MenuCategory> {
        self.categories.iter().filter(|category| !category.hidden)
    }

    /// Every category including hidden ones, in display order.
    pub fn all_categories(&self) -> &[MenuCategory] {
        &self.categories
    }

    /// Look up a category by id.
    pub fn category(&self, id: &str) -> Option<&MenuCategory> {
        self.categories.iter().find(|category| category.id == id)
    }

    /// Items in the category with the given id; empty if the id is unknown.
    pub fn by_category_id(&self, id: &str) -> Vec<&MenuItem> {
        self.category(id)
            .map(|category| self.items.by_category(&category.name))
            .unwrap_or_default()
    }

    /// Items in the category with the given name.
    pub fn by_category_name(&self, name: &str) -> Vec<&MenuItem> {
        self.items.by_category(name)
    }

    /// Free-text search over name, description and category.
    pub fn search(&self, query: &str) -> Vec<&MenuItem> {
        self.items.search(query)
    }

    /// Items satisfying every flag set in `requirements`.
    pub fn by_dietary(&self, requirements: &DietaryInfo) -> Vec<&MenuItem> {
        self.items
            .filter(|item| item.dietary.satisfies(requirements))
    }

    /// Items priced within `[min, max]`.
    pub fn by_price_range(&self, min: u64, max: u64) -> Vec<&MenuItem> {
        self.items
            .filter(|item| (min..=max).contains(&item.price))
    }

    /// Up to `limit` items, one per category first, then topped up in menu order.
    pub fn featured(&self, limit: usize) -> Vec<&MenuItem> {
        let mut featured: Vec<&MenuItem> = Vec::with_capacity(limit);
        let mut seen: Vec<&str> = Vec::new();

        for item in &self.items {
            if featured.len() >= limit {
                break;
            }

            if !seen.contains(&item.category.as_str()) {
                seen.push(&item.category);
                featured.push(item);
            }
        }

        for item in &self.items {
            if featured.len() >= limit {
                break;
            }

            if !featured.iter().any(|chosen| chosen.id == item.id) {
                featured.push(item);
            }
        }

        featured
    }

    /// Suggestions for the given hour of day (0-23).
    ///
    /// Breakfast in the morning, soups and mains at lunch, appetizers and mains
    /// in the evening, and lighter dishes and drinks overnight.
    pub fn recommended_for_hour(&self, hour: u8) -> Vec<&MenuItem> {
        const MORNING: &[&str] = &[BREAKFAST];
        const LUNCH: &[&str] = &[SOUPS, MAIN_DISHES];
        const EVENING: &[&str] = &[COLD_APPETIZERS, HOT_APPETIZERS, MAIN_DISHES];
        const NIGHT: &[&str] = &[COLD_APPETIZERS, DESSERTS, DRINKS];

        let (sections, limit) = match hour {
            6..=11 => (MORNING, usize::MAX),
            12..=16 => (LUNCH, 8),
            17..=23 => (EVENING, 8),
            _ => (NIGHT, 6),
        };

        sections
            .iter()
            .flat_map(|section| self.by_category_id(section))
            .take(limit)
            .collect()
    }

    /// Min, max and average item price, or `None` for an empty menu.
    pub fn price_stats(&self) -> Option<PriceStats> {
        PriceStats::from_prices(self.items.iter().map(|item| item.price))
    }

    /// Number of items in each category, in display order.
    pub fn category_item_counts(&self) -> Vec<(&MenuCategory, usize)> {
        self.categories
            .iter()
            .map(|category| (category, self.items.by_category(&category.name).len()))
            .collect()
    }

    /// Apply a combined filter.
    pub fn query(&self, query: &MenuQuery) -> Vec<&MenuItem> {
        let text = query.text.as_deref().map(str::to_lowercase);
        let category = query.category.as_deref().map(str::to_lowercase);

        self.items.filter(|item| {
            let text_matches = text.as_deref().is_none_or(|needle| {
                contains_ignore_case(&item.name, needle)
                    || item
                        .description
                        .as_deref()
                        .is_some_and(|description| contains_ignore_case(description, needle))
            });

            text_matches
                && category
                    .as_deref()
                    .is_none_or(|category| item.category.to_lowercase() == category)
                && query.min_price.is_none_or(|min| item.price >= min)
                && query.max_price.is_none_or(|max| item.price <= max)
                && query
                    .dietary
                    .is_none_or(|requirements| item.dietary.satisfies(&requirements))
        })
    }
}
