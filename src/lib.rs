//! # Stock Reservation
//!
//! > **An in-memory stock-reservation core for order pipelines.**
//!
//! This crate tracks an integer stock level per product and lets many
//! concurrent callers reserve stock without ever overselling, and without
//! ever applying part of a reservation that spans several products.
//!
//! ## Design
//!
//! ### One Lock, One Invariant
//! The default [`InventoryStore`](inventory::InventoryStore) keeps every product
//! in one `HashMap` behind a single readers–writer lock. Reads share it, and
//! each reservation holds it exclusively for the whole check-and-update. The
//! store therefore behaves as if every call ran alone, in lock-acquisition
//! order.
//!
//! ### All-or-Nothing Baskets
//! `reserve_multiple` first folds the request into a
//! [`ReservationPlan`](model::ReservationPlan) (duplicate products summed,
//! zero quantities rejected), then validates every line and only then applies
//! them, all inside one critical section.
//!
//! ### Per-Product Locks (opt-in)
//! [`ShardedInventoryStore`](inventory::ShardedInventoryStore) trades the single
//! lock for one lock per product, acquired in ascending id order, for
//! workloads where writers mostly touch unrelated products. Both stores
//! implement [`StockReservation`](inventory::StockReservation).
//!
//! ### Observability
//! Every reserve call is traced with `tracing` at `debug` level. See
//! [`runtime::setup_tracing`].
//!
//! ## Module Tour
//!
//! - [`model`] - [`Product`](model::Product), [`ProductId`](model::ProductId),
//!   [`ReserveItem`](model::ReserveItem) and the aggregated plan.
//! - [`inventory`] - The stores, their contract and [`InventoryError`](inventory::InventoryError).
//! - [`runtime`] - Tracing setup, config and the concurrent [`CheckoutSimulation`](runtime::CheckoutSimulation).
//!
//! ## Running the Demo
//!
//! ```bash
//! RUST_LOG=info cargo run
//! INVENTORY_LOCKING=per-product RUST_LOG=debug cargo run
//! ```

pub mod inventory;
pub mod model;
pub mod runtime;
