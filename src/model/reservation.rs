//! Reservation requests and their aggregated plan form.

use crate::inventory::{InventoryError, InventoryResult};
use crate::model::ProductId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One line of a multi-item reservation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReserveItem {
    pub product_id: ProductId,
    pub quantity: u32,
}

impl ReserveItem {
    pub fn new(product_id: impl Into<ProductId>, quantity: u32) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// A single product's aggregated demand within a [`ReservationPlan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanLine {
    pub product_id: ProductId,
    /// Sum of every requested quantity for this product. Wider than `u32`
    /// so that summing duplicates cannot overflow.
    pub quantity: u64,
}

/// The validated, aggregated form of a list of [`ReserveItem`]s.
///
/// Built before any store lock is taken. Each distinct product appears once,
/// in the order of its first occurrence in the request, with the quantities
/// of repeated lines summed. Stores validate and apply plan lines, never raw
/// items, so a request naming the same product twice is checked against its
/// combined demand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservationPlan {
    lines: Vec<PlanLine>,
}

impl ReservationPlan {
    /// Aggregates `items` into a plan.
    ///
    /// # Errors
    /// Returns [`InventoryError::InvalidQuantity`] for the first item whose
    /// quantity is zero.
    pub fn from_items(items: &[ReserveItem]) -> InventoryResult<Self> {
        let mut lines: Vec<PlanLine> = Vec::with_capacity(items.len());
        let mut index: HashMap<&str, usize> = HashMap::with_capacity(items.len());

        for item in items {
            if item.quantity == 0 {
                return Err(InventoryError::InvalidQuantity {
                    product_id: item.product_id.clone(),
                    quantity: item.quantity,
                });
            }
            match index.get(item.product_id.as_str()) {
                Some(&at) => lines[at].quantity += u64::from(item.quantity),
                None => {
                    index.insert(item.product_id.as_str(), lines.len());
                    lines.push(PlanLine {
                        product_id: item.product_id.clone(),
                        quantity: u64::from(item.quantity),
                    });
                }
            }
        }

        Ok(Self { lines })
    }

    pub fn lines(&self) -> &[PlanLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_keeps_first_occurrence_order() {
        let plan = ReservationPlan::from_items(&[
            ReserveItem::new("b", 1),
            ReserveItem::new("a", 2),
            ReserveItem::new("b", 3),
        ])
        .unwrap();

        assert_eq!(
            plan.lines(),
            &[
                PlanLine {
                    product_id: "b".into(),
                    quantity: 4,
                },
                PlanLine {
                    product_id: "a".into(),
                    quantity: 2,
                },
            ]
        );
    }

    #[test]
    fn test_plan_sums_without_overflow() {
        let plan = ReservationPlan::from_items(&[
            ReserveItem::new("a", u32::MAX),
            ReserveItem::new("a", u32::MAX),
        ])
        .unwrap();

        assert_eq!(plan.lines()[0].quantity, 2 * u64::from(u32::MAX));
    }

    #[test]
    fn test_plan_rejects_zero_quantity() {
        let result = ReservationPlan::from_items(&[
            ReserveItem::new("a", 1),
            ReserveItem::new("b", 0),
        ]);

        assert_eq!(
            result,
            Err(InventoryError::InvalidQuantity {
                product_id: "b".into(),
                quantity: 0,
            })
        );
    }

    #[test]
    fn test_empty_request_gives_empty_plan() {
        let plan = ReservationPlan::from_items(&[]).unwrap();
        assert!(plan.is_empty());
        assert_eq!(plan.len(), 0);
    }
}
