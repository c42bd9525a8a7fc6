//! The ingredient shape shared by custom pizzas and varieties.

use serde::Deserialize;
use validator::Validate;

use crate::domain::catalog::Category;

/// A requested ingredient combination: one base, sauce and cheese plus
/// optional veggie and meat selections.
#[derive(Clone, Debug, Deserialize, Validate)]
pub struct Recipe {
    #[validate(length(min = 1, message = "base is required"))]
    pub base: String,
    #[validate(length(min = 1, message = "sauce is required"))]
    pub sauce: String,
    #[validate(length(min = 1, message = "cheese is required"))]
    pub cheese: String,
    #[serde(default)]
    pub veggies: Vec<String>,
    #[serde(default)]
    pub meat: Vec<String>,
}

impl Recipe {
    /// Flattened occurrence list in request order. Deliberately not
    /// deduplicated: the same name twice prices and decrements twice.
    pub fn flattened(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(3 + self.veggies.len() + self.meat.len());
        names.push(self.base.clone());
        names.push(self.sauce.clone());
        names.push(self.cheese.clone());
        names.extend(self.veggies.iter().cloned());
        names.extend(self.meat.iter().cloned());
        names
    }

    /// `(name, category)` pairs for the variety writer's stricter check.
    pub fn category_pairs(&self) -> Vec<(String, Category)> {
        let mut pairs = vec![
            (self.base.clone(), Category::Base),
            (self.sauce.clone(), Category::Sauce),
            (self.cheese.clone(), Category::Cheese),
        ];
        pairs.extend(self.veggies.iter().map(|v| (v.clone(), Category::Veggies)));
        pairs.extend(self.meat.iter().map(|m| (m.clone(), Category::Meat)));
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe() -> Recipe {
        Recipe {
            base: "Thin Crust".into(),
            sauce: "Tomato".into(),
            cheese: "Mozzarella".into(),
            veggies: vec!["Onion".into(), "Onion".into()],
            meat: vec!["Pepperoni".into()],
        }
    }

    #[test]
    fn flattens_in_request_order_without_deduplication() {
        assert_eq!(
            recipe().flattened(),
            vec!["Thin Crust", "Tomato", "Mozzarella", "Onion", "Onion", "Pepperoni"]
        );
    }

    #[test]
    fn pairs_carry_the_owning_category() {
        let pairs = recipe().category_pairs();
        assert_eq!(pairs.len(), 6);
        assert_eq!(pairs[0], ("Thin Crust".to_string(), Category::Base));
        assert_eq!(pairs[5], ("Pepperoni".to_string(), Category::Meat));
    }

    #[test]
    fn empty_mandatory_ingredient_fails_validation() {
        let mut r = recipe();
        r.sauce = String::new();
        assert!(r.validate().is_err());
    }
}
