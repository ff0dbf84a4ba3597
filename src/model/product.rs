//! Product records and their identifiers.

use serde::{Deserialize, Serialize};

use std::borrow::Borrow;
use std::fmt::Display;

/// Type-safe identifier for Products.
///
/// Implements `Borrow<str>` so stores keyed by `ProductId` can be queried
/// with a plain `&str`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for ProductId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Represents a product tracked by the inventory.
///
/// The identifier and name are fixed when the store is seeded; only `stock`
/// changes afterwards, and only through the reserve operations of a
/// [`StockReservation`](crate::inventory::StockReservation) store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub stock: u32,
}

impl Product {
    /// Creates a new Product instance.
    ///
    /// # Arguments
    /// * `id` - Unique identifier
    /// * `name` - Display name
    /// * `stock` - Units available for reservation
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, stock: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            stock,
        }
    }
}
