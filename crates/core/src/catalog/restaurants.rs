//! Restaurants

use crate::catalog::{Catalog, CatalogEntry, contains_ignore_case};

/// Feature that marks a restaurant as a house favourite.
const SIGNATURE_FEATURE: &str = "signature cuisine";

/// Average bill from which a restaurant is considered premium, in minor units.
const PREMIUM_AVERAGE_PRICE: u64 = 400_000;

/// Markers in the opening hours of venues that never close.
const ALWAYS_OPEN: [&str; 3] = ["24/7", "24 hours", "round the clock"];

/// A hotel restaurant or bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Restaurant {
    /// Stable id
    pub id: String,

    /// Display name
    pub name: String,

    /// Description
    pub description: String,

    /// Comma-separated cuisines, e.g. "Italian, Mediterranean"
    pub cuisine: String,

    /// Average bill per guest in minor units, when published
    pub average_price: Option<u64>,

    /// Opening hours as written on the venue
    pub hours: String,

    /// Free-form features, e.g. "terrace"
    pub features: Vec<String>,

    /// Floor or address within the hotel
    pub location: Option<String>,

    /// Phone or booking contact
    pub contact: Option<String>,
}

impl Restaurant {
    /// Whether the venue's hours say it never closes.
    pub fn is_always_open(&self) -> bool {
        let hours = self.hours.to_lowercase();

        ALWAYS_OPEN.iter().any(|marker| hours.contains(marker))
    }

    fn has_feature(&self, needle: &str) -> bool {
        self.features
            .iter()
            .any(|feature| contains_ignore_case(feature, needle))
    }
}

impl CatalogEntry for Restaurant {
    fn id(&self) -> &str {
        &self.id
    }

    fn category(&self) -> &str {
        &self.cuisine
    }

    fn matches(&self, needle: &str) -> bool {
        contains_ignore_case(&self.name, needle)
            || contains_ignore_case(&self.description, needle)
            || contains_ignore_case(&self.cuisine, needle)
            || self.has_feature(needle)
    }
}

/// A labelled average-bill bracket and how many restaurants fall in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceBucket {
    /// Lower bound, inclusive
    pub min: u64,

    /// Upper bound, exclusive; `None` for the open-ended top bracket
    pub max: Option<u64>,

    /// Number of restaurants whose average bill falls in the bracket
    pub count: usize,
}

/// Bracket boundaries for [`Catalog::price_buckets`], in minor units.
const PRICE_BUCKET_BOUNDS: [u64; 3] = [200_000, 400_000, 600_000];

impl Catalog<Restaurant> {
    /// Restaurants with a feature containing `feature`, ignoring case.
    pub fn by_feature(&self, feature: &str) -> Vec<&Restaurant> {
        let needle = feature.to_lowercase();

        self.filter(|restaurant| restaurant.has_feature(&needle))
    }

    /// Restaurants whose cuisine mentions `cuisine`, ignoring case.
    pub fn by_cuisine(&self, cuisine: &str) -> Vec<&Restaurant> {
        let needle = cuisine.to_lowercase();

        self.filter(|restaurant| contains_ignore_case(&restaurant.cuisine, &needle))
    }

    /// Restaurants with a published average bill within `[min, max]`.
    pub fn by_price_range(&self, min: u64, max: u64) -> Vec<&Restaurant> {
        self.filter(|restaurant| {
            restaurant
                .average_price
                .is_some_and(|price| (min..=max).contains(&price))
        })
    }

    /// Up to `limit` restaurants, signature or premium venues first.
    pub fn featured(&self, limit: usize) -> Vec<&Restaurant> {
        let (mut featured, rest): (Vec<&Restaurant>, Vec<&Restaurant>) =
            self.iter().partition(|restaurant| {
                restaurant.has_feature(SIGNATURE_FEATURE)
                    || restaurant
                        .average_price
                        .is_some_and(|price| price >= PREMIUM_AVERAGE_PRICE)
            });

        featured.truncate(limit);

        let missing = limit.saturating_sub(featured.len());
        featured.extend(rest.into_iter().take(missing));

        featured
    }

    /// Distinct cuisines across all restaurants, sorted.
    pub fn cuisine_types(&self) -> Vec<String> {
        let mut cuisines: Vec<String> = self
            .iter()
            .flat_map(|restaurant| restaurant.cuisine.split(','))
            .map(str::trim)
            .filter(|cuisine| !cuisine.is_empty())
            .map(str::to_string)
            .collect();

        cuisines.sort();
        cuisines.dedup();

        cuisines
    }

    /// Average-bill brackets with restaurant counts.
    pub fn price_buckets(&self) -> Vec<PriceBucket> {
        let mut lower = 0;
        let mut buckets = Vec::with_capacity(PRICE_BUCKET_BOUNDS.len() + 1);

        for bound in PRICE_BUCKET_BOUNDS.iter().copied().map(Some).chain([None]) {
            let count = self
                .iter()
                .filter_map(|restaurant| restaurant.average_price)
                .filter(|&price| price >= lower && bound.is_none_or(|upper| price < upper))
                .count();

            buckets.push(PriceBucket {
                min: lower,
                max: bound,
                count,
            });

            lower = bound.unwrap_or(lower);
        }

        buckets
    }

    /// Whether the restaurant is open at the given hour (0-23).
    ///
    /// Venues open around the clock always are; everything else is treated as
    /// open from 08:00 until midnight. Unknown ids are closed.
    pub fn is_open_at(&self, id: &str, hour: u8) -> bool {
        self.get(id)
            .is_some_and(|restaurant| restaurant.is_always_open() || (8..=23).contains(&hour))
    }
}
