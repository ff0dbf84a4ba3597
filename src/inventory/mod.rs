//! # Inventory
//!
//! The stock-reservation core: stores that track stock per product and let
//! many concurrent callers reserve it without ever overselling.
//!
//! ## Structure
//!
//! - [`StockReservation`] - The in-process contract every store implements
//! - [`InventoryStore`] - One readers–writer lock for the whole store (the default)
//! - [`ShardedInventoryStore`] - One lock per product, ordered acquisition for multi-item requests
//! - [`LockingStrategy`] - Picks a store implementation at startup
//! - [`InventoryError`] - Type-safe reservation failures
//!
//! ## Usage
//!
//! ```rust
//! use stock_reservation::inventory::{LockingStrategy, StockReservation};
//! use stock_reservation::model::{Product, ReserveItem};
//!
//! let store = LockingStrategy::Global.build([
//!     Product::new("A", "Widget", 10),
//!     Product::new("B", "Gadget", 5),
//! ]);
//!
//! store.reserve("A", 3).unwrap();
//! store
//!     .reserve_multiple(&[ReserveItem::new("A", 2), ReserveItem::new("B", 5)])
//!     .unwrap();
//!
//! assert_eq!(store.get_stock("A"), 5);
//! assert_eq!(store.get_stock("B"), 0);
//! assert_eq!(store.get_stock("unknown"), 0);
//! ```

pub mod error;
pub mod sharded;
pub mod store;

pub use error::*;
pub use sharded::ShardedInventoryStore;
pub use store::InventoryStore;

use crate::model::{Product, ProductId, ReserveItem};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;
use tracing::warn;

/// Contract shared by every stock store.
///
/// Implementations must make each call appear to take effect at a single
/// point in time: no caller may observe stock below zero or a multi-item
/// reservation partially applied.
pub trait StockReservation: Send + Sync {
    /// Current stock for `product_id`, or `None` if the product is unknown.
    fn find_stock(&self, product_id: &str) -> Option<u32>;

    /// Current stock for `product_id`. Unknown products read as 0; use
    /// [`find_stock`](Self::find_stock) to tell the two apart.
    fn get_stock(&self, product_id: &str) -> u32 {
        self.find_stock(product_id).unwrap_or(0)
    }

    /// Reserves `quantity` units of one product.
    fn reserve(&self, product_id: &str, quantity: u32) -> InventoryResult<()>;

    /// Reserves every item or none of them.
    fn reserve_multiple(&self, items: &[ReserveItem]) -> InventoryResult<()>;

    /// Every product record, sorted by id, as of one consistent point in time.
    fn snapshot(&self) -> Vec<Product>;
}

/// Stock left after taking `requested` units from `product`.
pub(crate) fn remaining_after(product: &Product, requested: u64) -> InventoryResult<u32> {
    u64::from(product.stock)
        .checked_sub(requested)
        .and_then(|left| u32::try_from(left).ok())
        .ok_or_else(|| InventoryError::InsufficientStock {
            product_id: product.id.clone(),
            requested,
            available: product.stock,
        })
}

/// Keys every product by its own id. A later product with an id already
/// seen replaces the earlier one.
pub(crate) fn index_by_id(
    products: impl IntoIterator<Item = Product>,
) -> HashMap<ProductId, Product> {
    let mut index = HashMap::new();
    for product in products {
        if let Some(replaced) = index.insert(product.id.clone(), product) {
            warn!(product_id = %replaced.id, "Duplicate product id, earlier record replaced");
        }
    }
    index
}

/// Re-keys a caller-built map by each record's own id.
///
/// Entries are visited in key order, so when two keys hold records with the
/// same id, the record under the greater key wins.
pub(crate) fn reindex(products: HashMap<ProductId, Product>) -> HashMap<ProductId, Product> {
    let mut entries: Vec<(ProductId, Product)> = products.into_iter().collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    index_by_id(entries.into_iter().map(|(key, product)| {
        if key != product.id {
            warn!(key = %key, product_id = %product.id, "Map key differs from product id");
        }
        product
    }))
}

/// Which store implementation to build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LockingStrategy {
    /// [`InventoryStore`]: one lock for the whole store.
    #[default]
    Global,
    /// [`ShardedInventoryStore`]: one lock per product.
    #[serde(alias = "sharded")]
    PerProduct,
}

impl LockingStrategy {
    pub fn build(self, products: impl IntoIterator<Item = Product>) -> Arc<dyn StockReservation> {
        match self {
            LockingStrategy::Global => Arc::new(InventoryStore::from_products(products)),
            LockingStrategy::PerProduct => Arc::new(ShardedInventoryStore::from_products(products)),
        }
    }
}

impl Display for LockingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LockingStrategy::Global => f.write_str("global"),
            LockingStrategy::PerProduct => f.write_str("per-product"),
        }
    }
}

impl FromStr for LockingStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "global" => Ok(LockingStrategy::Global),
            "per-product" | "sharded" => Ok(LockingStrategy::PerProduct),
            other => Err(format!("unknown locking strategy: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remaining_after() {
        let product = Product::new("A", "Product A", 5);
        assert_eq!(remaining_after(&product, 5), Ok(0));
        assert_eq!(remaining_after(&product, 2), Ok(3));
        assert_eq!(
            remaining_after(&product, 6),
            Err(InventoryError::InsufficientStock {
                product_id: "A".into(),
                requested: 6,
                available: 5,
            })
        );
    }

    #[test]
    fn test_index_by_id_keeps_last_duplicate() {
        let index = index_by_id([
            Product::new("A", "First", 1),
            Product::new("B", "Product B", 2),
            Product::new("A", "Second", 3),
        ]);
        assert_eq!(index.len(), 2);
        assert_eq!(index["A"].name, "Second");
        assert_eq!(index["A"].stock, 3);
    }

    #[test]
    fn test_reindex_uses_product_id_over_map_key() {
        let mut map = HashMap::new();
        map.insert(ProductId::from("A"), Product::new("X", "Under A", 1));
        map.insert(ProductId::from("B"), Product::new("X", "Under B", 2));
        map.insert(ProductId::from("C"), Product::new("C", "Product C", 3));

        let index = reindex(map);
        // Keys A and B both hold id X; B sorts later, so its record wins.
        assert_eq!(index.len(), 2);
        assert!(!index.contains_key("A"));
        assert!(!index.contains_key("B"));
        assert_eq!(index["X"].name, "Under B");
        assert_eq!(index["C"].stock, 3);
    }

    #[test]
    fn test_locking_strategy_parsing() {
        assert_eq!("global".parse(), Ok(LockingStrategy::Global));
        assert_eq!(" Per-Product ".parse(), Ok(LockingStrategy::PerProduct));
        assert_eq!("sharded".parse(), Ok(LockingStrategy::PerProduct));
        assert!("striped".parse::<LockingStrategy>().is_err());
        assert_eq!(LockingStrategy::default(), LockingStrategy::Global);
    }

    #[test]
    fn test_locking_strategy_display_parses_back() {
        for strategy in [LockingStrategy::Global, LockingStrategy::PerProduct] {
            assert_eq!(strategy.to_string().parse(), Ok(strategy));
        }
    }

    #[test]
    fn test_build_gives_working_store() {
        for strategy in [LockingStrategy::Global, LockingStrategy::PerProduct] {
            let store = strategy.build([Product::new("A", "Product A", 2)]);
            store.reserve("A", 2).unwrap();
            assert_eq!(store.find_stock("A"), Some(0));
        }
    }
}
