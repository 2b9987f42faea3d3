//! Cart persistence
//!
//! The cart is stored as one JSON document under a single key. Everything
//! read back is validated before it becomes a [`Cart`]: the storage medium is
//! outside the program's control, so anything unexpected loads as "no cart".

use rust_decimal::Decimal;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    cart::{Cart, CartError, CartLine, LineId},
    pricing::minor_units,
    storage::{KeyValueStore, StorageError},
};

/// Storage key used when none is configured.
pub const CART_STORAGE_KEY: &str = "concierge-cart";

/// Key the unversioned layout was stored under.
///
/// Read once when [`CART_STORAGE_KEY`] is empty; a cart found there is moved
/// to [`CART_STORAGE_KEY`].
pub const LEGACY_CART_STORAGE_KEY: &str = "tgapp-cart";

/// Snapshot layout version written by this crate.
///
/// Version 0 is the unversioned layout: lines under `items`, prices in
/// roubles that may be fractional.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Reasons a stored snapshot could not be saved or restored.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The storage medium failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The stored value is not a cart document.
    #[error("Malformed cart snapshot: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The snapshot was written by a newer layout.
    #[error("Unsupported cart snapshot version {found}, newest supported is {supported}")]
    UnsupportedVersion {
        /// Version found in storage
        found: u32,
        /// Newest version this build reads
        supported: u32,
    },

    /// A legacy price is negative or does not fit in minor units.
    #[error("Invalid price {price} for cart line {line_id}")]
    InvalidPrice {
        /// Offending line, or `totalPrice` for the cart total
        line_id: String,
        /// Price as stored, in roubles
        price: Decimal,
    },

    /// A stored line has quantity zero.
    #[error("Cart line {line_id} has zero quantity")]
    ZeroQuantity {
        /// Offending line
        line_id: String,
    },

    /// Two stored lines share a line id.
    #[error("Duplicate cart line id: {0}")]
    DuplicateLine(String),

    /// Two stored lines reference the same catalog item.
    #[error("Duplicate catalog item in cart: {0}")]
    DuplicateItem(String),

    /// The lines add up to more than fits in minor units.
    #[error("Invalid cart totals: {0}")]
    Totals(#[from] CartError),

    /// Stored totals disagree with the lines.
    #[error(
        "Cart totals mismatch: stored {stored_quantity} items / {stored_price}, lines give {quantity} items / {price}"
    )]
    TotalsMismatch {
        /// Stored total quantity
        stored_quantity: u64,
        /// Stored total price
        stored_price: u64,
        /// Quantity recomputed from lines
        quantity: u64,
        /// Price recomputed from lines
        price: u64,
    },
}

#[derive(Debug, Deserialize)]
struct SnapshotHeader {
    #[serde(default)]
    version: u32,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CartRecord {
    version: u32,
    lines: Vec<CartLineRecord>,
    total_quantity: u64,
    total_price: u64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CartLineRecord {
    line_id: String,
    catalog_item_id: String,
    name: String,
    unit_price: u64,
    quantity: u32,
    category: String,
}

impl From<&CartLine> for CartLineRecord {
    fn from(line: &CartLine) -> Self {
        Self {
            line_id: line.line_id().as_str().to_string(),
            catalog_item_id: line.catalog_item_id().to_string(),
            name: line.name().to_string(),
            unit_price: line.unit_price(),
            quantity: line.quantity(),
            category: line.category().to_string(),
        }
    }
}

/// Unversioned layout. Unknown fields such as `imageUrl` are ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyCartRecord {
    items: Vec<LegacyLineRecord>,
    total_items: u64,
    total_price: Decimal,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyLineRecord {
    id: String,
    menu_item_id: String,
    name: String,
    price: Decimal,
    quantity: u32,
    category: String,
}

impl LegacyCartRecord {
    fn into_current(self) -> Result<CartRecord, PersistenceError> {
        let total_price =
            minor_units(self.total_price).ok_or_else(|| PersistenceError::InvalidPrice {
                line_id: "totalPrice".to_string(),
                price: self.total_price,
            })?;

        let lines = self
            .items
            .into_iter()
            .map(|item| {
                let unit_price =
                    minor_units(item.price).ok_or_else(|| PersistenceError::InvalidPrice {
                        line_id: item.id.clone(),
                        price: item.price,
                    })?;

                Ok(CartLineRecord {
                    line_id: item.id,
                    catalog_item_id: item.menu_item_id,
                    name: item.name,
                    unit_price,
                    quantity: item.quantity,
                    category: item.category,
                })
            })
            .collect::<Result<_, PersistenceError>>()?;

        Ok(CartRecord {
            version: 0,
            lines,
            total_quantity: self.total_items,
            total_price,
        })
    }
}

/// Serialize a cart to its stored JSON form.
///
/// # Errors
///
/// Returns [`PersistenceError::Malformed`] if serialization fails.
pub fn encode(cart: &Cart) -> Result<String, PersistenceError> {
    let record = CartRecord {
        version: SNAPSHOT_VERSION,
        lines: cart.lines().iter().map(CartLineRecord::from).collect(),
        total_quantity: cart.total_quantity(),
        total_price: cart.total_price(),
    };

    Ok(serde_json::to_string(&record)?)
}

/// Parse and validate a stored snapshot.
///
/// Unversioned snapshots are read in the legacy layout, with prices converted
/// from roubles to kopecks.
///
/// # Errors
///
/// Returns an error if the JSON is not a cart document, was written by a newer
/// version, or fails validation: zero quantities, repeated line ids or catalog
/// items, prices or totals that do not fit in minor units, or totals that
/// disagree with the lines.
pub fn decode(json: &str) -> Result<Cart, PersistenceError> {
    let header: SnapshotHeader = serde_json::from_str(json)?;

    let record = match header.version {
        0 => {
            let record = serde_json::from_str::<LegacyCartRecord>(json)?.into_current()?;

            debug!("Migrated legacy cart snapshot");

            record
        }
        SNAPSHOT_VERSION => serde_json::from_str::<CartRecord>(json)?,
        found => {
            return Err(PersistenceError::UnsupportedVersion {
                found,
                supported: SNAPSHOT_VERSION,
            });
        }
    };

    validate(record)
}

fn validate(record: CartRecord) -> Result<Cart, PersistenceError> {
    let mut line_ids = FxHashSet::default();
    let mut item_ids = FxHashSet::default();
    let mut lines = Vec::with_capacity(record.lines.len());

    for line in record.lines {
        if line.quantity == 0 {
            return Err(PersistenceError::ZeroQuantity {
                line_id: line.line_id,
            });
        }

        if !line_ids.insert(line.line_id.clone()) {
            return Err(PersistenceError::DuplicateLine(line.line_id));
        }

        if !item_ids.insert(line.catalog_item_id.clone()) {
            return Err(PersistenceError::DuplicateItem(line.catalog_item_id));
        }

        lines.push(CartLine::from_parts(
            LineId::from(line.line_id),
            line.catalog_item_id,
            line.name,
            line.unit_price,
            line.quantity,
            line.category,
        ));
    }

    let cart = Cart::try_from_lines(lines)?;

    if cart.total_quantity() != record.total_quantity || cart.total_price() != record.total_price
    {
        return Err(PersistenceError::TotalsMismatch {
            stored_quantity: record.total_quantity,
            stored_price: record.total_price,
            quantity: cart.total_quantity(),
            price: cart.total_price(),
        });
    }

    Ok(cart)
}

/// Reads and writes the cart snapshot under one storage key.
#[derive(Debug, Clone)]
pub struct CartPersistence<S> {
    storage: S,
    key: String,
}

impl<S: KeyValueStore> CartPersistence<S> {
    /// Persist under [`CART_STORAGE_KEY`].
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, CART_STORAGE_KEY)
    }

    /// Persist under a custom key.
    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// Storage key in use.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The underlying storage medium.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Write the cart, replacing any previous snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails or the medium rejects the write.
    pub fn save(&self, cart: &Cart) -> Result<(), PersistenceError> {
        let json = encode(cart)?;

        self.storage.set(&self.key, &json)?;

        Ok(())
    }

    /// Read the stored cart.
    ///
    /// Returns `Ok(None)` when nothing is stored. With the default key, an
    /// empty slot falls back to [`LEGACY_CART_STORAGE_KEY`]; a cart found
    /// there is saved under the default key and the legacy key is removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium cannot be read or the snapshot is invalid.
    pub fn try_load(&self) -> Result<Option<Cart>, PersistenceError> {
        if let Some(json) = self.storage.get(&self.key)? {
            return decode(&json).map(Some);
        }

        if self.key != CART_STORAGE_KEY {
            return Ok(None);
        }

        let Some(json) = self.storage.get(LEGACY_CART_STORAGE_KEY)? else {
            return Ok(None);
        };

        let cart = decode(&json)?;

        self.migrate_legacy(&cart);

        Ok(Some(cart))
    }

    fn migrate_legacy(&self, cart: &Cart) {
        if let Err(error) = self.save(cart) {
            warn!(key = %self.key, %error, "Failed to migrate legacy cart");

            return;
        }

        match self.storage.remove(LEGACY_CART_STORAGE_KEY) {
            Ok(_) => info!(
                from = LEGACY_CART_STORAGE_KEY,
                to = %self.key,
                lines = cart.len(),
                "Migrated legacy cart"
            ),
            Err(error) => {
                warn!(key = LEGACY_CART_STORAGE_KEY, %error, "Failed to remove legacy cart");
            }
        }
    }

    /// Read the stored cart, treating every failure as "nothing stored".
    pub fn load(&self) -> Option<Cart> {
        match self.try_load() {
            Ok(cart) => cart,
            Err(error) => {
                warn!(key = %self.key, %error, "Discarding stored cart");

                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{catalog::menu::MenuItem, storage::MemoryStorage};

    use super::*;

    fn cart() -> Result<Cart, CartError> {
        Cart::try_from_lines(vec![
            CartLine::new(&MenuItem::new("borscht", "Borscht", 65_000, "Soups"), 2),
            CartLine::new(&MenuItem::new("tea", "Tea", 30_000, "Drinks"), 1),
        ])
    }

    #[test]
    fn encoded_snapshot_is_versioned_camel_case() -> TestResult {
        let json: serde_json::Value = serde_json::from_str(&encode(&cart()?)?)?;

        assert_eq!(json.pointer("/version"), Some(&1.into()));
        assert_eq!(json.pointer("/totalQuantity"), Some(&3.into()));
        assert_eq!(json.pointer("/totalPrice"), Some(&160_000.into()));
        assert_eq!(
            json.pointer("/lines/0/catalogItemId"),
            Some(&"borscht".into())
        );
        assert_eq!(json.pointer("/lines/0/unitPrice"), Some(&65_000.into()));

        Ok(())
    }

    #[test]
    fn decode_restores_lines_and_ids() -> TestResult {
        let original = cart()?;
        let restored = decode(&encode(&original)?)?;

        assert_eq!(restored, original);

        Ok(())
    }

    #[test]
    fn legacy_prices_are_read_as_roubles() -> TestResult {
        let legacy = r#"{
            "items": [
                {"id": "cart-1", "menuItemId": "borscht", "name": "Borscht", "price": 650, "quantity": 2, "category": "Soups", "imageUrl": "/img/borscht.jpg"},
                {"id": "cart-2", "menuItemId": "mors", "name": "Mors", "price": 99.5, "quantity": 1, "category": "Drinks"}
            ],
            "totalItems": 3,
            "totalPrice": 1399.5
        }"#;

        let cart = decode(legacy)?;
        let borscht = cart.line(&LineId::from("cart-1")).ok_or("missing borscht")?;
        let mors = cart.line(&LineId::from("cart-2")).ok_or("missing mors")?;

        assert_eq!(borscht.catalog_item_id(), "borscht");
        assert_eq!(borscht.unit_price(), 65_000);
        assert_eq!(mors.unit_price(), 9_950);
        assert_eq!(cart.total_quantity(), 3);
        assert_eq!(cart.total_price(), 139_950);

        Ok(())
    }

    #[test]
    fn legacy_totals_are_checked_in_roubles() {
        let legacy = |total_price: &str| {
            format!(
                r#"{{"items":[{{"id":"a","menuItemId":"x","name":"X","price":650,"quantity":2,"category":"c"}}],"totalItems":2,"totalPrice":{total_price}}}"#
            )
        };

        assert!(decode(&legacy("1300")).is_ok());
        assert!(matches!(
            decode(&legacy("130000")),
            Err(PersistenceError::TotalsMismatch {
                stored_price: 13_000_000,
                price: 130_000,
                ..
            })
        ));
        assert!(matches!(
            decode(&legacy("-1")),
            Err(PersistenceError::InvalidPrice { line_id, .. }) if line_id == "totalPrice"
        ));
        assert!(matches!(
            decode(r#"{"items":[{"id":"a","menuItemId":"x","name":"X","price":-5,"quantity":1,"category":"c"}],"totalItems":1,"totalPrice":0}"#),
            Err(PersistenceError::InvalidPrice { line_id, .. }) if line_id == "a"
        ));
    }

    #[test]
    fn overflowing_totals_are_rejected() {
        let json = format!(
            r#"{{"version":1,"lines":[{{"lineId":"a","catalogItemId":"x","name":"x","unitPrice":{},"quantity":2,"category":"c"}}],"totalQuantity":2,"totalPrice":{}}}"#,
            u64::MAX / 2 + 1,
            u64::MAX
        );

        assert!(matches!(
            decode(&json),
            Err(PersistenceError::Totals(CartError::TotalOverflow))
        ));
    }

    #[test]
    fn newer_version_is_rejected() {
        let json = r#"{"version": 2, "lines": [], "totalQuantity": 0, "totalPrice": 0}"#;

        assert!(matches!(
            decode(json),
            Err(PersistenceError::UnsupportedVersion {
                found: 2,
                supported: 1
            })
        ));
    }

    #[test]
    fn validation_failures() {
        let line = |line_id: &str, item: &str, quantity: u32| {
            format!(
                r#"{{"lineId":"{line_id}","catalogItemId":"{item}","name":"x","unitPrice":100,"quantity":{quantity},"category":"c"}}"#
            )
        };
        let doc = |lines: &[String], quantity: u64, price: u64| {
            format!(
                r#"{{"version":1,"lines":[{}],"totalQuantity":{quantity},"totalPrice":{price}}}"#,
                lines.join(",")
            )
        };

        assert!(matches!(
            decode(&doc(&[line("a", "x", 0)], 0, 0)),
            Err(PersistenceError::ZeroQuantity { .. })
        ));
        assert!(matches!(
            decode(&doc(&[line("a", "x", 1), line("a", "y", 1)], 2, 200)),
            Err(PersistenceError::DuplicateLine(id)) if id == "a"
        ));
        assert!(matches!(
            decode(&doc(&[line("a", "x", 1), line("b", "x", 1)], 2, 200)),
            Err(PersistenceError::DuplicateItem(id)) if id == "x"
        ));
        assert!(matches!(
            decode(&doc(&[line("a", "x", 2)], 2, 999)),
            Err(PersistenceError::TotalsMismatch { price: 200, .. })
        ));
        assert!(matches!(
            decode(r#"{"version": 1, "lines": "nope", "totalQuantity": 0, "totalPrice": 0}"#),
            Err(PersistenceError::Malformed(_))
        ));
        assert!(matches!(
            decode(r#"{"version": 1, "lines": [], "totalQuantity": -1, "totalPrice": 0}"#),
            Err(PersistenceError::Malformed(_))
        ));
        assert!(matches!(
            decode(r#"{"lines": [], "totalQuantity": 0, "totalPrice": 0}"#),
            Err(PersistenceError::Malformed(_))
        ));
        assert!(matches!(decode("null"), Err(PersistenceError::Malformed(_))));
    }

    #[test]
    fn load_swallows_errors() -> TestResult {
        let storage = MemoryStorage::new();
        let persistence = CartPersistence::new(storage.clone());

        assert!(persistence.load().is_none());

        storage.set(CART_STORAGE_KEY, "{not json")?;

        assert!(persistence.load().is_none());
        assert!(persistence.try_load().is_err());

        Ok(())
    }

    #[test]
    fn custom_keys_ignore_the_legacy_slot() -> TestResult {
        let storage = MemoryStorage::new();

        storage.set(
            LEGACY_CART_STORAGE_KEY,
            r#"{"items":[],"totalItems":0,"totalPrice":0}"#,
        )?;

        let persistence = CartPersistence::with_key(storage.clone(), "guest-42");

        assert_eq!(persistence.try_load()?, None);
        assert!(storage.get(LEGACY_CART_STORAGE_KEY)?.is_some());

        Ok(())
    }

    #[test]
    fn save_then_load() -> TestResult {
        let persistence = CartPersistence::with_key(MemoryStorage::new(), "guest-42");
        let cart = cart()?;

        persistence.save(&cart)?;

        assert_eq!(persistence.load(), Some(cart));
        assert!(persistence.storage().get("guest-42")?.is_some());
        assert!(persistence.storage().get(CART_STORAGE_KEY)?.is_none());

        Ok(())
    }
}
