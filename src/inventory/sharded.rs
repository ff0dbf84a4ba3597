//! # Per-Product-Lock Inventory Store
//!
//! [`ShardedInventoryStore`] gives every product its own readers–writer lock,
//! so writers to unrelated products no longer serialize behind one another.
//!
//! The product map itself is never modified after construction, so looking
//! up a product's lock needs no synchronization. Multi-item reservations keep
//! the all-or-nothing guarantee with two rules:
//!
//! 1. **Lock ordering**: the write locks of every product in a request are
//!    acquired in ascending [`ProductId`] order. Two overlapping requests
//!    always contend for their first shared product first, so they cannot
//!    deadlock. Duplicate lines are merged by [`ReservationPlan`] beforehand,
//!    so no lock is ever taken twice.
//! 2. **Two-phase locking**: all locks are held through validation and
//!    application and released together, so no reader can observe a subset of
//!    the request applied.

use super::{
    index_by_id, reindex, remaining_after, InventoryError, InventoryResult, StockReservation,
};
use crate::model::{Product, ProductId, ReservationPlan, ReserveItem};
use parking_lot::{RwLock, RwLockWriteGuard};
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// In-memory stock store with one `RwLock` per product.
#[derive(Debug, Default)]
pub struct ShardedInventoryStore {
    products: HashMap<ProductId, RwLock<Product>>,
}

impl ShardedInventoryStore {
    /// Records are keyed by their own `id`, as in
    /// [`InventoryStore::new`](crate::inventory::InventoryStore::new).
    pub fn new(products: HashMap<ProductId, Product>) -> Self {
        Self::from_index(reindex(products))
    }

    pub fn from_products(products: impl IntoIterator<Item = Product>) -> Self {
        Self::from_index(index_by_id(products))
    }

    fn from_index(products: HashMap<ProductId, Product>) -> Self {
        info!(products = products.len(), "Sharded inventory store created");
        Self {
            products: products
                .into_iter()
                .map(|(id, product)| (id, RwLock::new(product)))
                .collect(),
        }
    }

    /// Current stock for `product_id`, or 0 if the product is unknown.
    pub fn get_stock(&self, product_id: &str) -> u32 {
        self.find_stock(product_id).unwrap_or(0)
    }

    pub fn find_stock(&self, product_id: &str) -> Option<u32> {
        self.products.get(product_id).map(|p| p.read().stock)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn reserve(&self, product_id: &str, quantity: u32) -> InventoryResult<()> {
        if quantity == 0 {
            return Err(InventoryError::InvalidQuantity {
                product_id: product_id.into(),
                quantity,
            });
        }

        let lock = self
            .products
            .get(product_id)
            .ok_or_else(|| InventoryError::ProductNotFound(product_id.into()))?;
        let mut product = lock.write();

        product.stock = remaining_after(&product, u64::from(quantity)).inspect_err(|e| {
            debug!(error = %e, "Reserve rejected");
        })?;
        debug!(remaining = product.stock, "Reserved");
        Ok(())
    }

    /// Reserves every item or none of them.
    ///
    /// Reports the same error a [`InventoryStore`](crate::inventory::InventoryStore)
    /// would for the same request and state: plan lines are validated in
    /// first-occurrence order, whatever order their locks were taken in.
    #[instrument(level = "debug", skip(self, items), fields(items = items.len()))]
    pub fn reserve_multiple(&self, items: &[ReserveItem]) -> InventoryResult<()> {
        let plan = ReservationPlan::from_items(items)?;
        if plan.is_empty() {
            return Ok(());
        }

        // 1. Resolve each line's lock; unknown products stay None until validation.
        let resolved: Vec<Option<&RwLock<Product>>> = plan
            .lines()
            .iter()
            .map(|line| self.products.get(line.product_id.as_str()))
            .collect();

        // 2. Lock in ascending id order, whatever the request order.
        let mut lock_order: Vec<usize> = (0..resolved.len())
            .filter(|&at| resolved[at].is_some())
            .collect();
        lock_order.sort_by(|&a, &b| plan.lines()[a].product_id.cmp(&plan.lines()[b].product_id));

        let mut guards: Vec<Option<RwLockWriteGuard<'_, Product>>> =
            resolved.iter().map(|_| None).collect();
        for at in lock_order {
            guards[at] = resolved[at].map(|lock| lock.write());
        }

        // 3. Validate in request order so errors match the global store.
        let mut remaining = Vec::with_capacity(plan.len());
        for (line, guard) in plan.lines().iter().zip(&guards) {
            let product = guard
                .as_deref()
                .ok_or_else(|| InventoryError::ProductNotFound(line.product_id.clone()))?;
            remaining.push(remaining_after(product, line.quantity).inspect_err(|e| {
                debug!(error = %e, "Reservation rejected");
            })?);
        }

        // 4. Apply. Validation passed, so every guard is Some; all of them
        // drop together when this returns.
        for (guard, stock) in guards.iter_mut().zip(remaining) {
            if let Some(product) = guard.as_deref_mut() {
                product.stock = stock;
            }
        }
        debug!(products = plan.len(), "Reserved all items");
        Ok(())
    }

    /// Copies every product record, sorted by id.
    ///
    /// Read locks are taken in ascending id order and all held until the copy
    /// is complete, so the result reflects one consistent state.
    pub fn snapshot(&self) -> Vec<Product> {
        let mut locks: Vec<(&ProductId, &RwLock<Product>)> = self.products.iter().collect();
        locks.sort_by(|a, b| a.0.cmp(b.0));

        let guards: Vec<_> = locks.iter().map(|(_, lock)| lock.read()).collect();
        guards.iter().map(|product| Product::clone(product)).collect()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl FromIterator<Product> for ShardedInventoryStore {
    fn from_iter<I: IntoIterator<Item = Product>>(iter: I) -> Self {
        Self::from_products(iter)
    }
}

impl StockReservation for ShardedInventoryStore {
    fn find_stock(&self, product_id: &str) -> Option<u32> {
        ShardedInventoryStore::find_stock(self, product_id)
    }

    fn reserve(&self, product_id: &str, quantity: u32) -> InventoryResult<()> {
        ShardedInventoryStore::reserve(self, product_id, quantity)
    }

    fn reserve_multiple(&self, items: &[ReserveItem]) -> InventoryResult<()> {
        ShardedInventoryStore::reserve_multiple(self, items)
    }

    fn snapshot(&self) -> Vec<Product> {
        ShardedInventoryStore::snapshot(self)
    }
}
