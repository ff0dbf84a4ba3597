//! Startup configuration for the demo binary.
//!
//! The inventory core itself reads no environment. Only the binary calls
//! [`InventoryConfig::from_env`].

use crate::inventory::LockingStrategy;
use thiserror::Error;

/// Environment variable selecting the store implementation.
pub const LOCKING_ENV: &str = "INVENTORY_LOCKING";

/// Errors that can occur while reading configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("INVENTORY_LOCKING: {0}")]
    InvalidLocking(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InventoryConfig {
    pub locking: LockingStrategy,
}

impl InventoryConfig {
    /// Reads `INVENTORY_LOCKING` (`global`, `per-product` or `sharded`).
    /// Unset means [`LockingStrategy::Global`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let locking = match lookup(LOCKING_ENV) {
            Some(value) => value.parse().map_err(ConfigError::InvalidLocking)?,
            None => LockingStrategy::default(),
        };
        Ok(Self { locking })
    }
}
