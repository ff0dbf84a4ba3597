//! Error types for the inventory stores.

use crate::model::ProductId;
use thiserror::Error;

/// Result type returned by every reserve operation.
pub type InventoryResult<T> = Result<T, InventoryError>;

/// Errors that can occur during stock reservation.
///
/// Every variant is a failed precondition. A store that returns one of these
/// has left its state untouched.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InventoryError {
    /// The requested product is not in the store.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// The requested quantity exceeds the available stock.
    #[error("Insufficient stock for {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: ProductId,
        requested: u64,
        available: u32,
    },

    /// The provided quantity is zero.
    #[error("Invalid quantity for {product_id}: {quantity}")]
    InvalidQuantity { product_id: ProductId, quantity: u32 },
}

impl InventoryError {
    pub fn product_id(&self) -> &ProductId {
        match self {
            InventoryError::ProductNotFound(id) => id,
            InventoryError::InsufficientStock { product_id, .. } => product_id,
            InventoryError::InvalidQuantity { product_id, .. } => product_id,
        }
    }

    pub fn is_insufficient_stock(&self) -> bool {
        matches!(self, InventoryError::InsufficientStock { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, InventoryError::ProductNotFound(_))
    }
}
