//! Concierge prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{
        CART_STORAGE_KEY, Cart, CartAnalytics, CartError, CartLimits, CartLine, CartPersistence,
        CartStore, CartSummary, CategoryTotal, LEGACY_CART_STORAGE_KEY, LineId, PersistenceError,
        PreparationEstimate, Subscription,
    },
    catalog::{
        Catalog, CatalogEntry, CatalogError, CatalogItem, PriceRange, generate_id,
        menu::{DietaryInfo, Menu, MenuCategory, MenuItem, MenuQuery},
        restaurants::{PriceBucket, Restaurant},
        rooms::Room,
        spa::{DurationBucket, SpaService},
    },
    fixtures::Catalogs,
    pricing::{CURRENCY, PriceError, PriceStats, format_price, money, parse_price},
    receipt::{ReceiptError, write_cart},
    storage::{FileStorage, KeyValueStore, MemoryStorage, StorageError},
};
