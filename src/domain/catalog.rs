//! Ingredient catalog logic: the assembler's resolve/price step and the
//! variety writer's availability check.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "ingredient_category", rename_all = "lowercase")]
pub enum Category {
    Base,
    Sauce,
    Cheese,
    Veggies,
    Meat,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Base => "base",
            Category::Sauce => "sauce",
            Category::Cheese => "cheese",
            Category::Veggies => "veggies",
            Category::Meat => "meat",
        };
        write!(f, "{}", name)
    }
}

/// The catalog fields the assembler needs, decoupled from the stored record.
#[derive(Clone, Debug)]
pub struct CatalogEntry {
    pub id: Uuid,
    pub name: String,
    pub category: Category,
    pub price: i64,
    pub stock: i32,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AvailabilityError {
    #[error("{0} is not available or inactive.")]
    NotAvailable(String),
    #[error("{0} is out of stock.")]
    OutOfStock(String),
}

/// One stock decrement target per occurrence in the flattened name list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Occurrence {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ResolvedRecipe {
    pub occurrences: Vec<Occurrence>,
    pub price: i64,
}

/// Resolves every requested name against the active catalog, failing on the
/// first missing or depleted ingredient. Duplicate names are kept: each
/// occurrence is priced and later decremented separately.
pub fn resolve_occurrences(
    names: &[String],
    catalog: &[CatalogEntry],
) -> Result<ResolvedRecipe, AvailabilityError> {
    let by_name: HashMap<&str, &CatalogEntry> =
        catalog.iter().map(|entry| (entry.name.as_str(), entry)).collect();

    let mut occurrences = Vec::with_capacity(names.len());
    let mut price = 0i64;
    for name in names {
        let entry = by_name
            .get(name.as_str())
            .ok_or_else(|| AvailabilityError::NotAvailable(name.clone()))?;
        if entry.stock <= 0 {
            return Err(AvailabilityError::OutOfStock(name.clone()));
        }
        price += entry.price;
        occurrences.push(Occurrence { id: entry.id, name: name.clone() });
    }
    Ok(ResolvedRecipe { occurrences, price })
}

/// Variety creation check: unlike the assembler this collects every
/// unavailable `(name, category)` pair before reporting.
pub fn unavailable_pairs(required: &[(String, Category)], catalog: &[CatalogEntry]) -> Vec<String> {
    required
        .iter()
        .filter(|(name, category)| {
            !catalog
                .iter()
                .any(|entry| entry.name == *name && entry.category == *category && entry.stock > 0)
        })
        .map(|(name, category)| format!("{} ({})", name, category))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, category: Category, price: i64, stock: i32) -> CatalogEntry {
        CatalogEntry { id: Uuid::new_v4(), name: name.into(), category, price, stock }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn resolves_and_prices_the_worked_example() {
        let catalog = vec![
            entry("Thin Crust", Category::Base, 50, 10),
            entry("Tomato", Category::Sauce, 20, 5),
            entry("Mozzarella", Category::Cheese, 30, 8),
        ];
        let resolved =
            resolve_occurrences(&names(&["Thin Crust", "Tomato", "Mozzarella"]), &catalog).unwrap();
        assert_eq!(resolved.price, 100);
        assert_eq!(resolved.occurrences.len(), 3);
    }

    #[test]
    fn duplicate_occurrences_are_priced_per_occurrence() {
        let catalog = vec![
            entry("Thin Crust", Category::Base, 50, 10),
            entry("Tomato", Category::Sauce, 20, 5),
            entry("Mozzarella", Category::Cheese, 30, 8),
            entry("Onion", Category::Veggies, 10, 4),
        ];
        let resolved = resolve_occurrences(
            &names(&["Thin Crust", "Tomato", "Mozzarella", "Onion", "Onion"]),
            &catalog,
        )
        .unwrap();
        assert_eq!(resolved.price, 120);
        // Two decrement targets for the doubled veggie.
        let onions = resolved.occurrences.iter().filter(|o| o.name == "Onion").count();
        assert_eq!(onions, 2);
    }

    #[test]
    fn unknown_name_fails_whole_request() {
        let catalog = vec![entry("Thin Crust", Category::Base, 50, 10)];
        let err = resolve_occurrences(&names(&["Thin Crust", "Pesto"]), &catalog).unwrap_err();
        assert_eq!(err, AvailabilityError::NotAvailable("Pesto".into()));
        assert_eq!(err.to_string(), "Pesto is not available or inactive.");
    }

    #[test]
    fn depleted_ingredient_fails_whole_request() {
        let catalog = vec![
            entry("Thin Crust", Category::Base, 50, 10),
            entry("Tomato", Category::Sauce, 20, 0),
        ];
        let err = resolve_occurrences(&names(&["Thin Crust", "Tomato"]), &catalog).unwrap_err();
        assert_eq!(err, AvailabilityError::OutOfStock("Tomato".into()));
    }

    #[test]
    fn variety_check_collects_all_failures() {
        let catalog = vec![
            entry("Thin Crust", Category::Base, 50, 10),
            entry("Tomato", Category::Sauce, 20, 0),
        ];
        let required = vec![
            ("Thin Crust".to_string(), Category::Base),
            ("Tomato".to_string(), Category::Sauce),
            ("Mozzarella".to_string(), Category::Cheese),
        ];
        let unavailable = unavailable_pairs(&required, &catalog);
        assert_eq!(unavailable, vec!["Tomato (sauce)", "Mozzarella (cheese)"]);
    }

    #[test]
    fn variety_check_requires_matching_category() {
        // Same name under a different category does not satisfy the pair.
        let catalog = vec![entry("Pepperoni", Category::Veggies, 15, 5)];
        let required = vec![("Pepperoni".to_string(), Category::Meat)];
        assert_eq!(unavailable_pairs(&required, &catalog), vec!["Pepperoni (meat)"]);
    }
}
