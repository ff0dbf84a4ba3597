//! # Checkout Simulation
//!
//! Drives a shared store the way an order pipeline would: many checkouts
//! arriving at once, each trying to reserve its basket. Every basket runs in
//! its own Tokio task on the multi-threaded runtime, so reserve calls really
//! do race for the store's locks.
//!
//! Used by the demo binary and by the concurrency tests.

use crate::inventory::{InventoryError, InventoryResult, StockReservation};
use crate::model::ReserveItem;
use std::sync::Arc;
use tracing::{debug, info, info_span, warn, Instrument};

/// Outcome counts for one simulation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulationReport {
    /// Baskets fully reserved.
    pub reserved: usize,
    pub insufficient_stock: usize,
    pub not_found: usize,
    pub invalid_quantity: usize,
    /// Tasks that panicked or were cancelled before reporting.
    pub aborted: usize,
}

impl SimulationReport {
    fn record(&mut self, outcome: &InventoryResult<()>) {
        match outcome {
            Ok(()) => self.reserved += 1,
            Err(InventoryError::InsufficientStock { .. }) => self.insufficient_stock += 1,
            Err(InventoryError::ProductNotFound(_)) => self.not_found += 1,
            Err(InventoryError::InvalidQuantity { .. }) => self.invalid_quantity += 1,
        }
    }

    /// Number of baskets that failed for any reason.
    pub fn rejected(&self) -> usize {
        self.insufficient_stock + self.not_found + self.invalid_quantity + self.aborted
    }

    pub fn total(&self) -> usize {
        self.reserved + self.rejected()
    }
}

/// Runs concurrent checkouts against one store.
#[derive(Clone)]
pub struct CheckoutSimulation {
    store: Arc<dyn StockReservation>,
}

impl CheckoutSimulation {
    pub fn new(store: Arc<dyn StockReservation>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn StockReservation> {
        &self.store
    }

    /// Spawns one task per basket and waits for all of them.
    ///
    /// Single-item baskets go through `reserve`, larger ones through
    /// `reserve_multiple`. Must be called from within a Tokio runtime.
    pub async fn run(&self, baskets: Vec<Vec<ReserveItem>>) -> SimulationReport {
        info!(baskets = baskets.len(), "Checkout simulation started");

        let mut handles = Vec::with_capacity(baskets.len());
        for (checkout, basket) in baskets.into_iter().enumerate() {
            let store = Arc::clone(&self.store);
            let span = info_span!("checkout", checkout);
            handles.push(tokio::spawn(
                async move {
                    let outcome = reserve_basket(store.as_ref(), &basket);
                    if let Err(e) = &outcome {
                        debug!(error = %e, "Checkout rejected");
                    }
                    outcome
                }
                .instrument(span),
            ));
        }

        let mut report = SimulationReport::default();
        for handle in handles {
            match handle.await {
                Ok(outcome) => report.record(&outcome),
                Err(e) => {
                    warn!(error = %e, "Checkout task failed");
                    report.aborted += 1;
                }
            }
        }

        info!(
            reserved = report.reserved,
            rejected = report.rejected(),
            "Checkout simulation finished"
        );
        report
    }
}

fn reserve_basket(store: &dyn StockReservation, basket: &[ReserveItem]) -> InventoryResult<()> {
    match basket {
        [item] => store.reserve(item.product_id.as_str(), item.quantity),
        items => store.reserve_multiple(items),
    }
}
