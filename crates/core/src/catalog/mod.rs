//! Catalogs
//!
//! Read-only collections of the hotel's restaurants, rooms, spa services and
//! room-service menu. Every catalog is loaded once and then queried many times;
//! nothing here mutates after construction.

use std::{io, str::FromStr};

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::pricing::{PriceError, parse_price};

pub mod menu;
pub mod restaurants;
pub mod rooms;
pub mod spa;

/// Catalog loading errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// IO error reading catalog files
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price
    #[error(transparent)]
    Price(#[from] PriceError),

    /// Invalid price range
    #[error("Invalid price range: {0}")]
    InvalidPriceRange(String),

    /// Two entries share an id
    #[error("Duplicate catalog id: {0}")]
    DuplicateId(String),
}

/// An entry that can be stored in a [`Catalog`].
pub trait CatalogEntry {
    /// Stable identity of the entry
    fn id(&self) -> &str;

    /// Category label
    fn category(&self) -> &str;

    /// Whether the entry matches an already lower-cased search needle.
    fn matches(&self, needle: &str) -> bool;
}

/// Anything that can be placed in the cart.
///
/// The cart snapshots the id, name, price and category when a line is created
/// and never reads the catalog again for that line.
pub trait CatalogItem: CatalogEntry {
    /// Display name
    fn name(&self) -> &str;

    /// Unit price in minor units
    fn price(&self) -> u64;
}

/// Ordered, id-indexed, read-only collection of catalog entries.
#[derive(Debug, Clone)]
pub struct Catalog<T> {
    entries: Vec<T>,
    index: FxHashMap<String, usize>,
}

impl<T> Default for Catalog<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: FxHashMap::default(),
        }
    }
}

impl<T: CatalogEntry> Catalog<T> {
    /// Build a catalog, preserving the given order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateId`] if two entries share an id.
    pub fn new(entries: Vec<T>) -> Result<Self, CatalogError> {
        let mut index = FxHashMap::default();

        for (position, entry) in entries.iter().enumerate() {
            if index.insert(entry.id().to_string(), position).is_some() {
                return Err(CatalogError::DuplicateId(entry.id().to_string()));
            }
        }

        Ok(Self { entries, index })
    }

    /// Look up an entry by id.
    pub fn get(&self, id: &str) -> Option<&T> {
        self.index
            .get(id)
            .and_then(|&position| self.entries.get(position))
    }

    /// All entries in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    /// All entries as a slice.
    pub fn as_slice(&self) -> &[T] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries whose category equals `category`, ignoring case.
    pub fn by_category(&self, category: &str) -> Vec<&T> {
        let category = category.to_lowercase();

        self.filter(|entry| entry.category().to_lowercase() == category)
    }

    /// Distinct categories in order of first appearance.
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();

        for entry in &self.entries {
            if !categories.contains(&entry.category()) {
                categories.push(entry.category());
            }
        }

        categories
    }

    /// Case-insensitive free-text search. An empty query matches everything.
    pub fn search(&self, query: &str) -> Vec<&T> {
        let needle = query.trim().to_lowercase();

        self.filter(|entry| needle.is_empty() || entry.matches(&needle))
    }

    /// Entries satisfying `predicate`, in catalog order.
    pub fn filter(&self, predicate: impl Fn(&T) -> bool) -> Vec<&T> {
        self.entries.iter().filter(|entry| predicate(entry)).collect()
    }
}

impl<'a, T> IntoIterator for &'a Catalog<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Inclusive price range in minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRange {
    /// Lowest price
    pub min: u64,

    /// Highest price
    pub max: u64,
}

impl PriceRange {
    /// Whether the whole range lies within `[min, max]`.
    pub fn within(&self, min: u64, max: u64) -> bool {
        self.min >= min && self.max <= max
    }

    /// Whether `price` falls inside the range.
    pub fn contains(&self, price: u64) -> bool {
        (self.min..=self.max).contains(&price)
    }
}

impl FromStr for PriceRange {
    type Err = CatalogError;

    /// Parse `"12000-15000 RUB"`, or a single `"9000 RUB"` for a fixed price.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (amounts, currency) = s
            .trim()
            .rsplit_once(char::is_whitespace)
            .ok_or_else(|| CatalogError::InvalidPriceRange(s.to_string()))?;

        let (low, high) = amounts.split_once('-').unwrap_or((amounts, amounts));

        let min = parse_price(&format!("{} {currency}", low.trim()))?;
        let max = parse_price(&format!("{} {currency}", high.trim()))?;

        if min > max {
            return Err(CatalogError::InvalidPriceRange(s.to_string()));
        }

        Ok(Self { min, max })
    }
}

/// Derive a readable id from a display name, e.g. `room-collection-superior`.
///
/// Punctuation is dropped and whitespace runs become a single hyphen. Letters
/// outside ASCII (Cyrillic names) are kept as-is after lower-casing.
pub fn generate_id(prefix: &str, name: &str) -> String {
    let cleaned: String = name
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();

    let slug = cleaned.split_whitespace().collect::<Vec<_>>().join("-");

    format!("{prefix}-{slug}")
}

pub(crate) fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}
