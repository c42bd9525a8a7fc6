//! Cart contents: merge-on-add, replace-or-drop on update, silent remove.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "pizza_kind", rename_all = "lowercase")]
pub enum PizzaKind {
    Custom,
    Variety,
}

impl fmt::Display for PizzaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PizzaKind::Custom => write!(f, "custom"),
            PizzaKind::Variety => write!(f, "variety"),
        }
    }
}

#[derive(Debug, Error)]
#[error("Invalid pizza type")]
pub struct UnknownPizzaKind;

impl FromStr for PizzaKind {
    type Err = UnknownPizzaKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "custom" => Ok(PizzaKind::Custom),
            "variety" => Ok(PizzaKind::Variety),
            _ => Err(UnknownPizzaKind),
        }
    }
}

/// Tagged reference to either a custom pizza or a catalog variety.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PizzaRef {
    pub kind: PizzaKind,
    pub id: Uuid,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CartEntry {
    pub pizza: PizzaRef,
    pub quantity: i32,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Item not found in cart")]
pub struct EntryNotFound;

/// The ordered item list of one user's cart.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CartContents {
    entries: Vec<CartEntry>,
}

impl CartContents {
    pub fn from_entries(entries: Vec<CartEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merges with an existing `(kind, id)` entry by incrementing its
    /// quantity, otherwise appends. The cart never holds duplicates.
    pub fn add(&mut self, pizza: PizzaRef, quantity: i32) {
        if let Some(existing) = self.entries.iter_mut().find(|e| e.pizza == pizza) {
            existing.quantity += quantity;
        } else {
            self.entries.push(CartEntry { pizza, quantity });
        }
    }

    /// Removing an absent entry is a no-op: the cart is returned unchanged.
    pub fn remove(&mut self, pizza: PizzaRef) {
        self.entries.retain(|e| e.pizza != pizza);
    }

    /// Sets the quantity exactly; a value of zero or below drops the entry.
    pub fn set_quantity(&mut self, pizza: PizzaRef, quantity: i32) -> Result<(), EntryNotFound> {
        let index = self
            .entries
            .iter()
            .position(|e| e.pizza == pizza)
            .ok_or(EntryNotFound)?;
        if quantity <= 0 {
            self.entries.remove(index);
        } else {
            self.entries[index].quantity = quantity;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn custom(id: Uuid) -> PizzaRef {
        PizzaRef { kind: PizzaKind::Custom, id }
    }

    #[test]
    fn adding_same_reference_merges_quantities() {
        let id = Uuid::new_v4();
        let mut cart = CartContents::default();
        cart.add(custom(id), 2);
        assert_eq!(cart.entries(), &[CartEntry { pizza: custom(id), quantity: 2 }]);
        cart.add(custom(id), 1);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.entries()[0].quantity, 3);
    }

    #[test]
    fn same_id_different_kind_is_a_distinct_entry() {
        let id = Uuid::new_v4();
        let mut cart = CartContents::default();
        cart.add(custom(id), 1);
        cart.add(PizzaRef { kind: PizzaKind::Variety, id }, 1);
        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn update_to_zero_removes_the_entry() {
        let id = Uuid::new_v4();
        let mut cart = CartContents::default();
        cart.add(custom(id), 3);
        cart.set_quantity(custom(id), 0).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn update_sets_quantity_exactly() {
        let id = Uuid::new_v4();
        let mut cart = CartContents::default();
        cart.add(custom(id), 3);
        cart.set_quantity(custom(id), 7).unwrap();
        assert_eq!(cart.entries()[0].quantity, 7);
    }

    #[test]
    fn update_of_absent_entry_errors() {
        let mut cart = CartContents::default();
        assert_eq!(cart.set_quantity(custom(Uuid::new_v4()), 1), Err(EntryNotFound));
    }

    #[test]
    fn remove_of_absent_entry_is_silent() {
        let id = Uuid::new_v4();
        let mut cart = CartContents::default();
        cart.add(custom(id), 2);
        cart.remove(custom(Uuid::new_v4()));
        assert_eq!(cart.len(), 1);
        cart.remove(custom(id));
        assert!(cart.is_empty());
    }

    #[test]
    fn add_then_merge_then_drop_example() {
        let x = Uuid::new_v4();
        let mut cart = CartContents::default();
        cart.add(custom(x), 2);
        cart.add(custom(x), 1);
        assert_eq!(cart.entries(), &[CartEntry { pizza: custom(x), quantity: 3 }]);
        cart.set_quantity(custom(x), 0).unwrap();
        assert!(cart.is_empty());
    }
}
