//! # Global-Lock Inventory Store
//!
//! [`InventoryStore`] keeps every product record in one `HashMap` behind a
//! single readers–writer lock scoped to the whole store.
//!
//! - **Readers** ([`get_stock`](InventoryStore::get_stock),
//!   [`find_stock`](InventoryStore::find_stock), [`snapshot`](InventoryStore::snapshot))
//!   share the lock and run concurrently with each other.
//! - **Writers** ([`reserve`](InventoryStore::reserve),
//!   [`reserve_multiple`](InventoryStore::reserve_multiple)) hold the lock
//!   exclusively for their whole check-and-update.
//!
//! Every operation therefore appears to execute at a single point in one total
//! order, and no caller can see a multi-item reservation half applied.
//! Writers to unrelated products still serialize; see
//! [`ShardedInventoryStore`](crate::inventory::ShardedInventoryStore) for the
//! per-product variant.

use super::{
    index_by_id, reindex, remaining_after, InventoryError, InventoryResult, StockReservation,
};
use crate::model::{Product, ProductId, ReservationPlan, ReserveItem};
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// In-memory stock store guarded by one `RwLock`.
///
/// ```rust
/// use stock_reservation::inventory::{InventoryError, InventoryStore};
/// use stock_reservation::model::{Product, ReserveItem};
///
/// let store: InventoryStore = vec![
///     Product::new("A", "Widget", 10),
///     Product::new("B", "Gadget", 5),
/// ]
/// .into_iter()
/// .collect();
///
/// store.reserve("A", 2).unwrap();
/// assert_eq!(store.get_stock("A"), 8);
///
/// let err = store
///     .reserve_multiple(&[ReserveItem::new("A", 1), ReserveItem::new("B", 6)])
///     .unwrap_err();
/// assert!(matches!(err, InventoryError::InsufficientStock { .. }));
/// assert_eq!(store.get_stock("A"), 8);
/// ```
#[derive(Debug, Default)]
pub struct InventoryStore {
    products: RwLock<HashMap<ProductId, Product>>,
}

impl InventoryStore {
    /// Creates a store that takes ownership of `products`.
    ///
    /// Records are keyed by their own `id`, not by the map key they arrived
    /// under. If two keys hold records with the same id, the record under the
    /// greater key wins.
    pub fn new(products: HashMap<ProductId, Product>) -> Self {
        Self::from_index(reindex(products))
    }

    /// Creates a store keyed by each product's own id. A later product with
    /// the same id replaces an earlier one.
    pub fn from_products(products: impl IntoIterator<Item = Product>) -> Self {
        Self::from_index(index_by_id(products))
    }

    fn from_index(products: HashMap<ProductId, Product>) -> Self {
        info!(products = products.len(), "Inventory store created");
        Self {
            products: RwLock::new(products),
        }
    }

    /// Current stock for `product_id`, or 0 if the product is unknown.
    pub fn get_stock(&self, product_id: &str) -> u32 {
        self.find_stock(product_id).unwrap_or(0)
    }

    /// Current stock for `product_id`, or `None` if the product is unknown.
    pub fn find_stock(&self, product_id: &str) -> Option<u32> {
        self.products.read().get(product_id).map(|p| p.stock)
    }

    /// Reserves `quantity` units of one product.
    ///
    /// # Errors
    /// - [`InventoryError::InvalidQuantity`] if `quantity` is zero.
    /// - [`InventoryError::ProductNotFound`] if the product is unknown.
    /// - [`InventoryError::InsufficientStock`] if fewer than `quantity` units remain.
    #[instrument(level = "debug", skip(self))]
    pub fn reserve(&self, product_id: &str, quantity: u32) -> InventoryResult<()> {
        if quantity == 0 {
            return Err(InventoryError::InvalidQuantity {
                product_id: product_id.into(),
                quantity,
            });
        }

        // Check and decrement under one write guard.
        let mut products = self.products.write();
        let product = products
            .get_mut(product_id)
            .ok_or_else(|| InventoryError::ProductNotFound(product_id.into()))?;

        product.stock = remaining_after(product, u64::from(quantity)).inspect_err(|e| {
            debug!(error = %e, "Reserve rejected");
        })?;
        debug!(remaining = product.stock, "Reserved");
        Ok(())
    }

    /// Reserves every item or none of them.
    ///
    /// Items naming the same product are summed before validation. The write
    /// lock is held across both the validate and the apply phase, so a failed
    /// call leaves every product untouched and a successful one is never
    /// observable half done.
    ///
    /// # Errors
    /// - [`InventoryError::InvalidQuantity`] if any quantity is zero.
    /// - [`InventoryError::ProductNotFound`] for the first unknown product.
    /// - [`InventoryError::InsufficientStock`] for the first product whose
    ///   combined demand exceeds its stock.
    #[instrument(level = "debug", skip(self, items), fields(items = items.len()))]
    pub fn reserve_multiple(&self, items: &[ReserveItem]) -> InventoryResult<()> {
        let plan = ReservationPlan::from_items(items)?;
        if plan.is_empty() {
            return Ok(());
        }

        let mut products = self.products.write();

        // 1. Validate every line first; nothing is written on failure.
        let mut remaining = Vec::with_capacity(plan.len());
        for line in plan.lines() {
            let product = products
                .get(line.product_id.as_str())
                .ok_or_else(|| InventoryError::ProductNotFound(line.product_id.clone()))?;
            remaining.push(remaining_after(product, line.quantity).inspect_err(|e| {
                debug!(error = %e, "Reservation rejected");
            })?);
        }

        // 2. Apply. The write lock has been held since validation and the
        // product map never changes shape, so every line still resolves.
        for (line, stock) in plan.lines().iter().zip(remaining) {
            if let Some(product) = products.get_mut(line.product_id.as_str()) {
                product.stock = stock;
            }
        }
        debug!(products = plan.len(), "Reserved all items");
        Ok(())
    }

    /// Copies every product record, sorted by id, under one read lock.
    pub fn snapshot(&self) -> Vec<Product> {
        let mut products: Vec<Product> = self.products.read().values().cloned().collect();
        products.sort_by(|a, b| a.id.cmp(&b.id));
        products
    }

    pub fn len(&self) -> usize {
        self.products.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.read().is_empty()
    }
}

impl FromIterator<Product> for InventoryStore {
    fn from_iter<I: IntoIterator<Item = Product>>(iter: I) -> Self {
        Self::from_products(iter)
    }
}

impl StockReservation for InventoryStore {
    fn find_stock(&self, product_id: &str) -> Option<u32> {
        InventoryStore::find_stock(self, product_id)
    }

    fn reserve(&self, product_id: &str, quantity: u32) -> InventoryResult<()> {
        InventoryStore::reserve(self, product_id, quantity)
    }

    fn reserve_multiple(&self, items: &[ReserveItem]) -> InventoryResult<()> {
        InventoryStore::reserve_multiple(self, items)
    }

    fn snapshot(&self) -> Vec<Product> {
        InventoryStore::snapshot(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> InventoryStore {
        InventoryStore::from_products([
            Product::new("A", "Product A", 10),
            Product::new("B", "Product B", 5),
        ])
    }

    #[test]
    fn test_default_store_is_empty() {
        let store = InventoryStore::default();
        assert!(store.is_empty());
        assert_eq!(store.get_stock("A"), 0);
        assert_eq!(
            store.reserve("A", 1),
            Err(InventoryError::ProductNotFound("A".into()))
        );
    }

    #[test]
    fn test_new_takes_given_map() {
        let mut map = HashMap::new();
        map.insert(ProductId::from("A"), Product::new("A", "Product A", 7));
        let store = InventoryStore::new(map);

        assert_eq!(store.len(), 1);
        assert_eq!(store.get_stock("A"), 7);
    }

    #[test]
    fn test_new_keys_by_product_id_not_map_key() {
        let mut map = HashMap::new();
        map.insert(ProductId::from("A"), Product::new("X", "Product X", 1));
        map.insert(ProductId::from("B"), Product::new("X", "Product X", 2));
        let store = InventoryStore::new(map);

        // Both records claim id X; the one under the later key wins.
        assert_eq!(store.len(), 1);
        assert_eq!(store.get_stock("X"), 2);
        assert_eq!(store.find_stock("A"), None);
        assert_eq!(
            store.reserve("A", 5),
            Err(InventoryError::ProductNotFound("A".into()))
        );

        let ids: Vec<String> = store.snapshot().into_iter().map(|p| p.id.to_string()).collect();
        assert_eq!(ids, vec!["X"]);
    }

    #[test]
    fn test_reserve_decrements_stock() {
        let store = store();
        store.reserve("A", 4).unwrap();
        assert_eq!(store.get_stock("A"), 6);
        assert_eq!(store.get_stock("B"), 5);
    }

    #[test]
    fn test_reserve_exact_stock_reaches_zero() {
        let store = store();
        store.reserve("B", 5).unwrap();
        assert_eq!(store.find_stock("B"), Some(0));
        assert_eq!(
            store.reserve("B", 1),
            Err(InventoryError::InsufficientStock {
                product_id: "B".into(),
                requested: 1,
                available: 0,
            })
        );
    }

    #[test]
    fn test_reserve_zero_quantity_is_rejected() {
        let store = store();
        assert_eq!(
            store.reserve("A", 0),
            Err(InventoryError::InvalidQuantity {
                product_id: "A".into(),
                quantity: 0,
            })
        );
        assert_eq!(store.get_stock("A"), 10);
    }

    #[test]
    fn test_find_stock_distinguishes_unknown_from_zero() {
        let store = InventoryStore::from_products([Product::new("empty", "Sold out", 0)]);
        assert_eq!(store.find_stock("empty"), Some(0));
        assert_eq!(store.find_stock("missing"), None);
        assert_eq!(store.get_stock("missing"), 0);
    }

    #[test]
    fn test_reserve_multiple_applies_every_line() {
        let store = store();
        store
            .reserve_multiple(&[ReserveItem::new("A", 3), ReserveItem::new("B", 5)])
            .unwrap();
        assert_eq!(store.get_stock("A"), 7);
        assert_eq!(store.get_stock("B"), 0);
    }

    #[test]
    fn test_reserve_multiple_reports_first_failing_line() {
        let store = store();
        let result = store.reserve_multiple(&[
            ReserveItem::new("A", 11),
            ReserveItem::new("missing", 1),
        ]);
        assert!(result.unwrap_err().is_insufficient_stock());

        let result = store.reserve_multiple(&[
            ReserveItem::new("missing", 1),
            ReserveItem::new("A", 11),
        ]);
        assert!(result.unwrap_err().is_not_found());
    }

    #[test]
    fn test_reserve_multiple_empty_is_noop() {
        let store = store();
        store.reserve_multiple(&[]).unwrap();
        assert_eq!(store.snapshot(), self::store().snapshot());
    }

    #[test]
    fn test_snapshot_is_sorted_by_id() {
        let store = InventoryStore::from_products([
            Product::new("c", "C", 1),
            Product::new("a", "A", 2),
            Product::new("b", "B", 3),
        ]);
        let ids: Vec<String> = store.snapshot().into_iter().map(|p| p.id.to_string()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }
}
