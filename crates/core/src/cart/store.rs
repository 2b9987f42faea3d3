//! Cart store

use tracing::{debug, info, warn};

use crate::{
    cart::{
        Cart, CartError, CartLimits, CartLine, LineId,
        persistence::CartPersistence,
        subscribers::{Subscribers, Subscription},
        summary::{CartAnalytics, CartSummary, PreparationEstimate},
    },
    catalog::CatalogItem,
    storage::KeyValueStore,
};

/// Sole owner of the cart.
///
/// Every mutator that changes the cart recomputes the totals, saves the cart
/// and then calls each subscriber with the new state, all before returning.
/// A failed save is logged and otherwise ignored: the in-memory cart stays
/// authoritative for the rest of the session.
#[derive(Debug)]
pub struct CartStore<S> {
    cart: Cart,
    persistence: CartPersistence<S>,
    subscribers: Subscribers,
    limits: CartLimits,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Open the cart stored under the default key, or start empty.
    pub fn new(storage: S) -> Self {
        Self::from_persistence(CartPersistence::new(storage))
    }

    /// Open the cart stored under `key`, or start empty.
    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self::from_persistence(CartPersistence::with_key(storage, key))
    }

    fn from_persistence(persistence: CartPersistence<S>) -> Self {
        let cart = match persistence.load() {
            Some(cart) => {
                info!(
                    key = persistence.key(),
                    lines = cart.len(),
                    total_quantity = cart.total_quantity(),
                    "Restored cart"
                );

                cart
            }
            None => Cart::default(),
        };

        Self {
            cart,
            persistence,
            subscribers: Subscribers::default(),
            limits: CartLimits::default(),
        }
    }

    /// Replace the limits used by [`CartStore::can_add_item`].
    #[must_use]
    pub fn with_limits(mut self, limits: CartLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Limits in effect.
    pub fn limits(&self) -> CartLimits {
        self.limits
    }

    /// The current cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// An owned copy of the current cart.
    pub fn snapshot(&self) -> Cart {
        self.cart.clone()
    }

    /// The persistence adapter.
    pub fn persistence(&self) -> &CartPersistence<S> {
        &self.persistence
    }

    /// Add `quantity` units of `item`.
    ///
    /// An item that already has a line gets its quantity increased; otherwise
    /// a new line is appended. Returns the line as it is after the change.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ZeroQuantity`] if `quantity` is 0,
    /// [`CartError::QuantityOverflow`] if the line would exceed `u32::MAX` and
    /// [`CartError::TotalOverflow`] if the cart total would not fit in minor
    /// units. The cart is unchanged in every case and nobody is notified.
    pub fn add_item<I: CatalogItem + ?Sized>(
        &mut self,
        item: &I,
        quantity: u32,
    ) -> Result<CartLine, CartError> {
        if quantity == 0 {
            return Err(CartError::ZeroQuantity);
        }

        let mut lines = self.cart.lines().to_vec();

        let line = if let Some(line) = lines
            .iter_mut()
            .find(|line| line.catalog_item_id() == item.id())
        {
            let updated = line.quantity().checked_add(quantity).ok_or_else(|| {
                CartError::QuantityOverflow {
                    catalog_item_id: item.id().to_string(),
                }
            })?;

            line.set_quantity(updated);
            line.clone()
        } else {
            let line = CartLine::new(item, quantity);
            lines.push(line.clone());
            line
        };

        self.cart = Cart::try_from_lines(lines)?;

        debug!(
            line_id = %line.line_id(),
            catalog_item_id = line.catalog_item_id(),
            quantity = line.quantity(),
            "Added item to cart"
        );

        self.commit();

        Ok(line)
    }

    /// Remove a line. Returns whether it existed.
    pub fn remove_item(&mut self, line_id: &LineId) -> bool {
        if self.cart.line(line_id).is_none() {
            return false;
        }

        let lines = self
            .cart
            .lines()
            .iter()
            .filter(|line| line.line_id() != line_id)
            .cloned()
            .collect();

        self.replace_lines(lines, line_id, "Removed line from cart")
    }

    /// Set a line's quantity. Zero or below removes the line.
    ///
    /// Returns `false` if the line does not exist, or if the new quantity
    /// would push the cart total past `u64::MAX` minor units. Quantities
    /// above `u32::MAX` are clamped.
    pub fn update_item_quantity(&mut self, line_id: &LineId, quantity: i64) -> bool {
        let quantity = u32::try_from(quantity.max(0)).unwrap_or(u32::MAX);

        if quantity == 0 {
            return self.remove_item(line_id);
        }

        let mut lines = self.cart.lines().to_vec();

        let Some(line) = lines.iter_mut().find(|line| line.line_id() == line_id) else {
            return false;
        };

        line.set_quantity(quantity);

        self.replace_lines(lines, line_id, "Updated cart line quantity")
    }

    /// Add one unit to a line.
    pub fn increment_item(&mut self, line_id: &LineId) -> bool {
        match self.cart.line(line_id) {
            Some(line) => {
                let quantity = i64::from(line.quantity()).saturating_add(1);

                self.update_item_quantity(line_id, quantity)
            }
            None => false,
        }
    }

    /// Take one unit off a line, removing it at zero.
    pub fn decrement_item(&mut self, line_id: &LineId) -> bool {
        match self.cart.line(line_id) {
            Some(line) => {
                let quantity = i64::from(line.quantity()) - 1;

                self.update_item_quantity(line_id, quantity)
            }
            None => false,
        }
    }

    /// Empty the cart. Always saves and notifies, even when already empty.
    pub fn clear_cart(&mut self) {
        self.cart = Cart::default();

        debug!("Cleared cart");

        self.commit();
    }

    /// Register `callback` to receive the cart after every change.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: FnMut(&Cart) + 'static,
    {
        self.subscribers.subscribe(callback)
    }

    /// Number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Check whether `quantity` more units of `item` stay within the limits.
    ///
    /// # Errors
    ///
    /// Returns the [`CartError`] describing the first violated limit.
    pub fn can_add_item<I: CatalogItem + ?Sized>(
        &self,
        item: &I,
        quantity: u32,
    ) -> Result<(), CartError> {
        self.limits.check(&self.cart, item.id(), quantity)
    }

    /// Look up a line by id.
    pub fn line(&self, line_id: &LineId) -> Option<&CartLine> {
        self.cart.line(line_id)
    }

    /// Units of a catalog item in the cart.
    pub fn catalog_item_quantity(&self, catalog_item_id: &str) -> u32 {
        self.cart.catalog_item_quantity(catalog_item_id)
    }

    /// Whether a catalog item is in the cart.
    pub fn contains_catalog_item(&self, catalog_item_id: &str) -> bool {
        self.cart.contains_catalog_item(catalog_item_id)
    }

    /// Lines in a category.
    pub fn lines_in_category(&self, category: &str) -> Vec<&CartLine> {
        self.cart.lines_in_category(category)
    }

    /// Distinct categories in the cart.
    pub fn categories(&self) -> Vec<&str> {
        self.cart.categories()
    }

    /// Whether the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.cart.len()
    }

    /// Totals with per-category breakdown.
    pub fn summary(&self) -> CartSummary {
        self.cart.summary()
    }

    /// Unit-price statistics.
    pub fn analytics(&self) -> Option<CartAnalytics> {
        self.cart.analytics()
    }

    /// Coarse preparation window.
    pub fn estimated_preparation(&self) -> PreparationEstimate {
        self.cart.estimated_preparation()
    }

    fn replace_lines(&mut self, lines: Vec<CartLine>, line_id: &LineId, message: &str) -> bool {
        match Cart::try_from_lines(lines) {
            Ok(cart) => {
                self.cart = cart;

                debug!(%line_id, "{message}");

                self.commit();

                true
            }
            Err(error) => {
                warn!(%line_id, %error, "Rejected cart change");

                false
            }
        }
    }

    fn commit(&mut self) {
        if let Err(error) = self.persistence.save(&self.cart) {
            warn!(key = self.persistence.key(), %error, "Failed to persist cart");
        }

        self.subscribers.notify(&self.cart);
    }
}
