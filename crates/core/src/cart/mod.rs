//! Cart
//!
//! The cart is a list of lines, each a snapshot of a catalog item plus a
//! quantity, with totals kept in step with the lines. Only [`CartStore`]
//! mutates it; everything else sees clones.

use std::fmt;

use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use uuid::Uuid;

use crate::{catalog::CatalogItem, pricing::money};

mod limits;
mod persistence;
mod store;
mod subscribers;
mod summary;

pub use limits::CartLimits;
pub use persistence::{
    CART_STORAGE_KEY, CartPersistence, LEGACY_CART_STORAGE_KEY, PersistenceError,
    SNAPSHOT_VERSION, decode, encode,
};
pub use store::CartStore;
pub use subscribers::Subscription;
pub use summary::{CartAnalytics, CartSummary, CategoryTotal, CategoryTotals, PreparationEstimate};

/// Errors returned by cart mutators and limit checks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// Items are added at least one at a time.
    #[error("Quantity must be at least 1")]
    ZeroQuantity,

    /// The resulting line quantity does not fit the quantity type.
    #[error("Quantity overflow for item {catalog_item_id}")]
    QuantityOverflow {
        /// Item whose line would overflow
        catalog_item_id: String,
    },

    /// The line would hold more of one item than allowed.
    #[error("At most {limit} of one item per order, {requested} requested")]
    ItemLimitExceeded {
        /// Per-item limit
        limit: u32,
        /// Quantity the line would reach
        requested: u64,
    },

    /// The cart would hold more items than allowed.
    #[error("At most {limit} items per order, {requested} requested")]
    CartLimitExceeded {
        /// Whole-cart limit
        limit: u64,
        /// Total quantity the cart would reach
        requested: u64,
    },

    /// A line subtotal or a cart total does not fit in minor units.
    #[error("Cart total overflow")]
    TotalOverflow,
}

/// Opaque, stable identifier of a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineId(String);

impl LineId {
    /// Generate a fresh, time-ordered id.
    pub fn generate() -> Self {
        Self(format!("cart-{}", Uuid::now_v7().simple()))
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for LineId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for LineId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One distinct purchasable line.
///
/// Name, unit price and category are copied from the catalog item when the
/// line is created; later catalog changes do not reach existing lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    line_id: LineId,
    catalog_item_id: String,
    name: String,
    unit_price: u64,
    quantity: u32,
    category: String,
}

impl CartLine {
    pub(crate) fn new<I: CatalogItem + ?Sized>(item: &I, quantity: u32) -> Self {
        Self {
            line_id: LineId::generate(),
            catalog_item_id: item.id().to_string(),
            name: item.name().to_string(),
            unit_price: item.price(),
            quantity,
            category: item.category().to_string(),
        }
    }

    pub(crate) fn from_parts(
        line_id: LineId,
        catalog_item_id: String,
        name: String,
        unit_price: u64,
        quantity: u32,
        category: String,
    ) -> Self {
        Self {
            line_id,
            catalog_item_id,
            name,
            unit_price,
            quantity,
            category,
        }
    }

    /// Line id
    pub fn line_id(&self) -> &LineId {
        &self.line_id
    }

    /// Id of the catalog item the line was created from
    pub fn catalog_item_id(&self) -> &str {
        &self.catalog_item_id
    }

    /// Item name at the time of adding
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unit price in minor units at the time of adding
    pub fn unit_price(&self) -> u64 {
        self.unit_price
    }

    /// Quantity, always at least 1
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Category at the time of adding
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Unit price times quantity, in minor units.
    ///
    /// Lines held by a [`Cart`] always have a representable subtotal; see
    /// [`CartLine::checked_subtotal`] for lines built elsewhere.
    pub fn subtotal(&self) -> u64 {
        self.checked_subtotal().unwrap_or(u64::MAX)
    }

    /// Unit price times quantity, or `None` on overflow.
    pub fn checked_subtotal(&self) -> Option<u64> {
        self.unit_price.checked_mul(u64::from(self.quantity))
    }

    /// Unit price as money.
    pub fn unit_price_money(&self) -> Money<'static, Currency> {
        money(self.unit_price)
    }

    /// Subtotal as money.
    pub fn subtotal_money(&self) -> Money<'static, Currency> {
        money(self.subtotal())
    }

    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
    }
}

/// The cart aggregate.
///
/// An empty cart is the default value. Totals always agree with the lines
/// and never overflow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
    total_quantity: u64,
    total_price: u64,
}

impl Cart {
    /// Build a cart from lines, computing its totals.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::TotalOverflow`] if a subtotal or total does not fit.
    pub(crate) fn try_from_lines(lines: Vec<CartLine>) -> Result<Self, CartError> {
        let mut total_quantity = 0_u64;
        let mut total_price = 0_u64;

        for line in &lines {
            total_quantity = total_quantity
                .checked_add(u64::from(line.quantity))
                .ok_or(CartError::TotalOverflow)?;

            total_price = line
                .checked_subtotal()
                .and_then(|subtotal| total_price.checked_add(subtotal))
                .ok_or(CartError::TotalOverflow)?;
        }

        Ok(Self {
            lines,
            total_quantity,
            total_price,
        })
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Sum of all quantities.
    pub fn total_quantity(&self) -> u64 {
        self.total_quantity
    }

    /// Sum of all subtotals, in minor units.
    pub fn total_price(&self) -> u64 {
        self.total_price
    }

    /// Total price as money.
    pub fn total_price_money(&self) -> Money<'static, Currency> {
        money(self.total_price)
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Look up a line by id.
    pub fn line(&self, line_id: &LineId) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.line_id == line_id)
    }

    /// The line holding the given catalog item, if any.
    pub fn line_for_item(&self, catalog_item_id: &str) -> Option<&CartLine> {
        self.lines
            .iter()
            .find(|line| line.catalog_item_id == catalog_item_id)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::catalog::menu::MenuItem;

    use super::*;

    #[test]
    fn new_line_snapshots_the_item() {
        let item = MenuItem::new("borscht", "Borscht", 65_000, "Soups");
        let line = CartLine::new(&item, 2);

        assert_eq!(line.catalog_item_id(), "borscht");
        assert_eq!(line.name(), "Borscht");
        assert_eq!(line.unit_price(), 65_000);
        assert_eq!(line.category(), "Soups");
        assert_eq!(line.subtotal(), 130_000);
        assert!(line.line_id().as_str().starts_with("cart-"));
    }

    #[test]
    fn line_ids_are_unique() {
        let item = MenuItem::new("tea", "Tea", 100, "Drinks");

        assert_ne!(CartLine::new(&item, 1).line_id(), CartLine::new(&item, 1).line_id());
    }

    #[test]
    fn try_from_lines_computes_totals() -> TestResult {
        let cart = Cart::try_from_lines(vec![
            CartLine::new(&MenuItem::new("a", "A", 100, "X"), 2),
            CartLine::new(&MenuItem::new("b", "B", 250, "Y"), 3),
        ])?;

        assert_eq!(cart.total_quantity(), 5);
        assert_eq!(cart.total_price(), 950);
        assert_eq!(cart.len(), 2);
        assert!(cart.line_for_item("b").is_some());

        Ok(())
    }

    #[test]
    fn overflowing_totals_are_rejected() {
        let huge = MenuItem::new("gold", "Gold leaf", u64::MAX / 2, "Desserts");

        assert_eq!(
            Cart::try_from_lines(vec![CartLine::new(&huge, 3)]),
            Err(CartError::TotalOverflow)
        );
        assert_eq!(
            Cart::try_from_lines(vec![
                CartLine::new(&huge, 1),
                CartLine::new(&MenuItem::new("more", "More gold", u64::MAX / 2 + 2, "Desserts"), 1),
            ]),
            Err(CartError::TotalOverflow)
        );
        assert_eq!(CartLine::new(&huge, 3).checked_subtotal(), None);
    }

    #[test]
    fn default_cart_is_empty() {
        let cart = Cart::default();

        assert!(cart.is_empty());
        assert_eq!(cart.total_quantity(), 0);
        assert_eq!(cart.total_price(), 0);
    }
}
