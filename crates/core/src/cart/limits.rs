//! Order limits

use crate::cart::{Cart, CartError};

/// Quantity limits applied by [`CartStore::can_add_item`](crate::cart::CartStore::can_add_item).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartLimits {
    /// Most units of one catalog item per order
    pub max_per_item: u32,

    /// Most units across the whole order
    pub max_total: u64,
}

impl Default for CartLimits {
    fn default() -> Self {
        Self {
            max_per_item: 10,
            max_total: 50,
        }
    }
}

impl CartLimits {
    /// Limits that never reject.
    pub fn unlimited() -> Self {
        Self {
            max_per_item: u32::MAX,
            max_total: u64::MAX,
        }
    }

    /// Check that adding `quantity` of `catalog_item_id` to `cart` stays
    /// within the limits.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ZeroQuantity`] for a zero quantity, otherwise the
    /// first limit that would be exceeded.
    pub fn check(&self, cart: &Cart, catalog_item_id: &str, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::ZeroQuantity);
        }

        let current = cart
            .line_for_item(catalog_item_id)
            .map_or(0, |line| u64::from(line.quantity()));

        let per_item = current.saturating_add(u64::from(quantity));

        if per_item > u64::from(self.max_per_item) {
            return Err(CartError::ItemLimitExceeded {
                limit: self.max_per_item,
                requested: per_item,
            });
        }

        let total = cart.total_quantity().saturating_add(u64::from(quantity));

        if total > self.max_total {
            return Err(CartError::CartLimitExceeded {
                limit: self.max_total,
                requested: total,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{cart::CartLine, catalog::menu::MenuItem};

    use super::*;

    fn cart_with(quantity: u32) -> Result<Cart, CartError> {
        let item = MenuItem::new("tea", "Tea", 30_000, "Drinks");

        Cart::try_from_lines(vec![CartLine::new(&item, quantity)])
    }

    #[test]
    fn zero_is_rejected() {
        let limits = CartLimits::default();

        assert_eq!(
            limits.check(&Cart::default(), "tea", 0),
            Err(CartError::ZeroQuantity)
        );
    }

    #[test]
    fn per_item_limit_counts_existing_line() -> TestResult {
        let limits = CartLimits::default();
        let cart = cart_with(8)?;

        assert_eq!(limits.check(&cart, "tea", 2), Ok(()));
        assert_eq!(
            limits.check(&cart, "tea", 3),
            Err(CartError::ItemLimitExceeded {
                limit: 10,
                requested: 11,
            })
        );
        assert_eq!(limits.check(&cart, "coffee", 3), Ok(()));

        Ok(())
    }

    #[test]
    fn cart_limit_counts_every_line() -> TestResult {
        let limits = CartLimits {
            max_per_item: 10,
            max_total: 12,
        };
        let cart = cart_with(8)?;

        assert_eq!(
            limits.check(&cart, "coffee", 5),
            Err(CartError::CartLimitExceeded {
                limit: 12,
                requested: 13,
            })
        );

        Ok(())
    }

    #[test]
    fn unlimited_accepts_large_quantities() -> TestResult {
        assert_eq!(
            CartLimits::unlimited().check(&cart_with(u32::MAX - 1)?, "tea", 1),
            Ok(())
        );

        Ok(())
    }
}
