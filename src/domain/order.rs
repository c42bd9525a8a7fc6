//! Order lifecycle and order-entry normalization.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::cart::{PizzaKind, PizzaRef};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "order_status", rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Preparing,
    OutForDelivery,
    Delivered,
}

impl OrderStatus {
    fn rank(self) -> u8 {
        match self {
            OrderStatus::Pending => 0,
            OrderStatus::Preparing => 1,
            OrderStatus::OutForDelivery => 2,
            OrderStatus::Delivered => 3,
        }
    }

    /// Transitions are forward-only: the target must be strictly later in
    /// the lifecycle. Skipping ahead is allowed, going back is not.
    pub fn can_advance_to(self, next: OrderStatus) -> bool {
        next.rank() > self.rank()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Preparing => "preparing",
            OrderStatus::OutForDelivery => "out_for_delivery",
            OrderStatus::Delivered => "delivered",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Error)]
#[error("Invalid order status")]
pub struct UnknownOrderStatus;

impl FromStr for OrderStatus {
    type Err = UnknownOrderStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "preparing" => Ok(OrderStatus::Preparing),
            "out_for_delivery" => Ok(OrderStatus::OutForDelivery),
            "delivered" => Ok(OrderStatus::Delivered),
            _ => Err(UnknownOrderStatus),
        }
    }
}

/// One order entry as received on the wire.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderEntryRequest {
    pub custom_pizza_id: Option<Uuid>,
    pub variety_pizza_id: Option<Uuid>,
    pub quantity: Option<i32>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderEntryError {
    #[error("Each item must have either customPizzaId or varietyPizzaId")]
    MissingReference,
    #[error("An item cannot reference both a custom pizza and a variety")]
    AmbiguousReference,
    #[error("Quantity must be at least 1")]
    InvalidQuantity,
}

/// Turns raw entries into tagged references, rejecting the whole list on
/// the first bad entry. Quantity defaults to 1.
pub fn normalize_entries(
    entries: &[OrderEntryRequest],
) -> Result<Vec<(PizzaRef, i32)>, OrderEntryError> {
    let mut normalized = Vec::with_capacity(entries.len());
    for entry in entries {
        let pizza = match (entry.custom_pizza_id, entry.variety_pizza_id) {
            (Some(id), None) => PizzaRef { kind: PizzaKind::Custom, id },
            (None, Some(id)) => PizzaRef { kind: PizzaKind::Variety, id },
            (Some(_), Some(_)) => return Err(OrderEntryError::AmbiguousReference),
            (None, None) => return Err(OrderEntryError::MissingReference),
        };
        let quantity = entry.quantity.unwrap_or(1);
        if quantity < 1 {
            return Err(OrderEntryError::InvalidQuantity);
        }
        normalized.push((pizza, quantity));
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(
        custom: Option<Uuid>,
        variety: Option<Uuid>,
        quantity: Option<i32>,
    ) -> OrderEntryRequest {
        OrderEntryRequest { custom_pizza_id: custom, variety_pizza_id: variety, quantity }
    }

    #[test]
    fn quantity_defaults_to_one() {
        let id = Uuid::new_v4();
        let normalized = normalize_entries(&[entry(Some(id), None, None)]).unwrap();
        assert_eq!(normalized, vec![(PizzaRef { kind: PizzaKind::Custom, id }, 1)]);
    }

    #[test]
    fn entry_without_any_reference_rejects_the_list() {
        let id = Uuid::new_v4();
        let err = normalize_entries(&[
            entry(Some(id), None, Some(2)),
            entry(None, None, Some(1)),
        ])
        .unwrap_err();
        assert_eq!(err, OrderEntryError::MissingReference);
    }

    #[test]
    fn entry_with_both_references_is_rejected() {
        let err =
            normalize_entries(&[entry(Some(Uuid::new_v4()), Some(Uuid::new_v4()), None)])
                .unwrap_err();
        assert_eq!(err, OrderEntryError::AmbiguousReference);
    }

    #[test]
    fn non_positive_quantity_is_rejected() {
        let err = normalize_entries(&[entry(Some(Uuid::new_v4()), None, Some(0))]).unwrap_err();
        assert_eq!(err, OrderEntryError::InvalidQuantity);
    }

    #[test]
    fn status_moves_forward_only() {
        assert!(OrderStatus::Pending.can_advance_to(OrderStatus::Preparing));
        assert!(OrderStatus::Preparing.can_advance_to(OrderStatus::OutForDelivery));
        assert!(OrderStatus::Pending.can_advance_to(OrderStatus::Delivered)); // skip ahead
        assert!(!OrderStatus::Delivered.can_advance_to(OrderStatus::Pending));
        assert!(!OrderStatus::Preparing.can_advance_to(OrderStatus::Preparing));
    }

    #[test]
    fn status_parses_wire_names() {
        assert_eq!("out_for_delivery".parse::<OrderStatus>().unwrap(), OrderStatus::OutForDelivery);
        assert!("cancelled".parse::<OrderStatus>().is_err());
    }
}
