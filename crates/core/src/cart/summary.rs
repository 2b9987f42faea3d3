//! Derived cart queries

use std::time::Duration;

use smallvec::SmallVec;

use crate::{
    cart::{Cart, CartLine},
    pricing::PriceStats,
};

/// Quantity and subtotal for one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotal {
    /// Category label
    pub category: String,

    /// Units in the category
    pub quantity: u64,

    /// Sum of line subtotals in the category
    pub subtotal: u64,
}

/// Per-category totals, in order of first appearance.
pub type CategoryTotals = SmallVec<[CategoryTotal; 8]>;

/// Totals plus per-category breakdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSummary {
    /// Distinct lines
    pub line_count: usize,

    /// Units across all lines
    pub total_quantity: u64,

    /// Price of all lines
    pub total_price: u64,

    /// Breakdown by category
    pub categories: CategoryTotals,
}

/// Price statistics over the lines in the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartAnalytics {
    /// Mean unit price across lines, rounded half up
    pub average_unit_price: u64,

    /// Line with the highest unit price; the first one on ties
    pub most_expensive: CartLine,

    /// Line with the lowest unit price; the first one on ties
    pub cheapest: CartLine,

    /// Units per category
    pub category_distribution: SmallVec<[(String, u64); 8]>,
}

/// Rough kitchen preparation window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreparationEstimate {
    /// Earliest expected minutes
    pub min_minutes: u32,

    /// Latest expected minutes
    pub max_minutes: u32,
}

impl PreparationEstimate {
    /// Earliest expected duration.
    pub fn min(&self) -> Duration {
        Duration::from_secs(u64::from(self.min_minutes) * 60)
    }

    /// Latest expected duration.
    pub fn max(&self) -> Duration {
        Duration::from_secs(u64::from(self.max_minutes) * 60)
    }
}

const BASE_MINUTES: u32 = 15;
const HOT_MINUTES: u32 = 20;
const COLD_MINUTES: u32 = 10;
const DESSERT_MINUTES: u32 = 5;
const MINUTES_PER_ITEM: u64 = 2;
const MAX_QUANTITY_MINUTES: u32 = 30;

impl Cart {
    /// Units of a catalog item in the cart; 0 if absent.
    pub fn catalog_item_quantity(&self, catalog_item_id: &str) -> u32 {
        self.line_for_item(catalog_item_id)
            .map_or(0, CartLine::quantity)
    }

    /// Whether a catalog item has a line.
    pub fn contains_catalog_item(&self, catalog_item_id: &str) -> bool {
        self.line_for_item(catalog_item_id).is_some()
    }

    /// Lines in a category, compared case-insensitively.
    pub fn lines_in_category(&self, category: &str) -> Vec<&CartLine> {
        let category = category.to_lowercase();

        self.lines()
            .iter()
            .filter(|line| line.category().to_lowercase() == category)
            .collect()
    }

    /// Distinct categories in order of first appearance.
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();

        for line in self.lines() {
            if !categories.contains(&line.category()) {
                categories.push(line.category());
            }
        }

        categories
    }

    /// Quantity and subtotal per category, in order of first appearance.
    pub fn category_totals(&self) -> CategoryTotals {
        let mut totals = CategoryTotals::new();

        for line in self.lines() {
            let quantity = u64::from(line.quantity());

            if let Some(total) = totals
                .iter_mut()
                .find(|total| total.category == line.category())
            {
                total.quantity = total.quantity.saturating_add(quantity);
                total.subtotal = total.subtotal.saturating_add(line.subtotal());
            } else {
                totals.push(CategoryTotal {
                    category: line.category().to_string(),
                    quantity,
                    subtotal: line.subtotal(),
                });
            }
        }

        totals
    }

    /// Totals with the per-category breakdown.
    pub fn summary(&self) -> CartSummary {
        CartSummary {
            line_count: self.len(),
            total_quantity: self.total_quantity(),
            total_price: self.total_price(),
            categories: self.category_totals(),
        }
    }

    /// Unit-price statistics, or `None` for an empty cart.
    pub fn analytics(&self) -> Option<CartAnalytics> {
        let stats = PriceStats::from_prices(self.lines().iter().map(CartLine::unit_price))?;

        let most_expensive = self
            .lines()
            .iter()
            .find(|line| line.unit_price() == stats.max)?
            .clone();

        let cheapest = self
            .lines()
            .iter()
            .find(|line| line.unit_price() == stats.min)?
            .clone();

        let category_distribution = self
            .category_totals()
            .into_iter()
            .map(|total| (total.category, total.quantity))
            .collect();

        Some(CartAnalytics {
            average_unit_price: stats.average,
            most_expensive,
            cheapest,
            category_distribution,
        })
    }

    /// Coarse preparation window from the categories present and the
    /// number of units.
    ///
    /// Starts from 15 minutes, adds 20 for hot or main dishes, 10 for cold
    /// dishes or appetizers and 5 for desserts, then up to 30 more at two
    /// minutes per unit. The window runs from half that extra to all of it.
    pub fn estimated_preparation(&self) -> PreparationEstimate {
        if self.is_empty() {
            return PreparationEstimate::default();
        }

        let categories: Vec<String> = self
            .categories()
            .into_iter()
            .map(str::to_lowercase)
            .collect();

        let any = |needles: &[&str]| {
            categories
                .iter()
                .any(|category| needles.iter().any(|needle| category.contains(needle)))
        };

        let mut base = BASE_MINUTES;

        if any(&["hot", "main"]) {
            base += HOT_MINUTES;
        }

        if any(&["cold", "appetizer"]) {
            base += COLD_MINUTES;
        }

        if any(&["dessert"]) {
            base += DESSERT_MINUTES;
        }

        let extra = u32::try_from(self.total_quantity().saturating_mul(MINUTES_PER_ITEM))
            .unwrap_or(u32::MAX)
            .min(MAX_QUANTITY_MINUTES);

        PreparationEstimate {
            min_minutes: base + extra / 2,
            max_minutes: base + extra,
        }
    }
}
