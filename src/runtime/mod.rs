//! Runtime support around the inventory core.
//!
//! This module contains everything the demo binary and the concurrency tests
//! need that is not part of the reservation contract itself:
//!
//! - **Observability setup**: [`setup_tracing`]
//! - **Configuration**: [`InventoryConfig`], read from the environment
//! - **Load generation**: [`CheckoutSimulation`], many concurrent checkout
//!   tasks against one shared store

pub mod config;
pub mod simulation;
pub mod tracing;

pub use self::config::*;
pub use self::simulation::*;
pub use self::tracing::*;
