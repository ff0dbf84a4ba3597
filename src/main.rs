//! Demo: a burst of concurrent checkouts against a small catalog.
//!
//! 1. Reads [`InventoryConfig`] from the environment and builds the store.
//! 2. Fires single-item and multi-item baskets at it concurrently.
//! 3. Logs the outcome counts and the final stock of every product.

use stock_reservation::model::{Product, ReserveItem};
use stock_reservation::runtime::{setup_tracing, CheckoutSimulation, InventoryConfig};
use tracing::{info, info_span, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = InventoryConfig::from_env().map_err(|e| e.to_string())?;
    info!(locking = %config.locking, "Starting stock reservation demo");

    let store = config.locking.build([
        Product::new("widget", "Super Widget", 100),
        Product::new("gadget", "Limited Gadget", 20),
        Product::new("gizmo", "Gizmo", 5),
    ]);

    // 200 single-widget checkouts race for 100 units; 30 bundles race for
    // 5 gizmos; a handful of baskets reference a product nobody stocks.
    let mut baskets: Vec<Vec<ReserveItem>> = Vec::new();
    baskets.extend((0..200).map(|_| vec![ReserveItem::new("widget", 1)]));
    baskets.extend((0..30).map(|_| {
        vec![ReserveItem::new("gadget", 1), ReserveItem::new("gizmo", 1)]
    }));
    baskets.extend((0..3).map(|_| {
        vec![ReserveItem::new("gadget", 1), ReserveItem::new("discontinued", 1)]
    }));

    let simulation = CheckoutSimulation::new(store);
    let report = simulation
        .run(baskets)
        .instrument(info_span!("checkout_burst"))
        .await;

    info!(
        reserved = report.reserved,
        insufficient_stock = report.insufficient_stock,
        not_found = report.not_found,
        "Checkout burst complete"
    );
    for product in simulation.store().snapshot() {
        info!(product_id = %product.id, name = %product.name, stock = product.stock, "Final stock");
    }

    Ok(())
}
