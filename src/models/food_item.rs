//! Food Item model
//!
//! Catalog entries and the user-facing input shapes that create them.

use std::fmt;

use rmcp::schemars;
use serde::{Deserialize, Serialize};

use super::Nutrition;

/// Catalog identifier, unique for the lifetime of a catalog
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    schemars::JsonSchema,
)]
#[serde(transparent)]
pub struct FoodItemId(pub u64);

impl fmt::Display for FoodItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A food item in the catalog. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub id: FoodItemId,
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub fats: f64,
    pub carbs: f64,
}

impl FoodItem {
    pub fn new(id: FoodItemId, draft: FoodItemDraft) -> Self {
        Self {
            id,
            name: draft.name,
            calories: draft.nutrition.calories,
            protein: draft.nutrition.protein,
            fats: draft.nutrition.fats,
            carbs: draft.nutrition.carbs,
        }
    }

    pub fn nutrition(&self) -> Nutrition {
        Nutrition::new(self.calories, self.protein, self.fats, self.carbs)
    }

    /// Case-insensitive substring match on the name
    pub fn matches(&self, term: &str) -> bool {
        self.name.to_lowercase().contains(&term.trim().to_lowercase())
    }
}

/// A validated food item that has not been assigned an id yet.
///
/// Also the shape returned by the nutrition lookup for review before
/// submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItemDraft {
    pub name: String,
    #[serde(flatten)]
    pub nutrition: Nutrition,
}

/// A form field that may arrive as a number or as text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(untagged)]
pub enum FieldInput {
    Number(f64),
    Text(String),
}

impl FieldInput {
    /// The numeric value, if the input is a finite number or numeric text
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            FieldInput::Number(n) => *n,
            FieldInput::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }

    /// Numeric value, defaulting empty or non-numeric input to 0
    pub fn coerce(&self) -> f64 {
        self.as_number().unwrap_or(0.0)
    }
}

impl From<f64> for FieldInput {
    fn from(n: f64) -> Self {
        FieldInput::Number(n)
    }
}

impl From<&str> for FieldInput {
    fn from(s: &str) -> Self {
        FieldInput::Text(s.to_string())
    }
}

/// Raw "add food item" form input
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FoodItemForm {
    pub name: String,
    pub calories: Option<FieldInput>,
    pub protein: Option<FieldInput>,
    pub fats: Option<FieldInput>,
    pub carbs: Option<FieldInput>,
}

impl FoodItemForm {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }
}

impl From<FoodItemDraft> for FoodItemForm {
    fn from(draft: FoodItemDraft) -> Self {
        Self {
            name: draft.name,
            calories: Some(draft.nutrition.calories.into()),
            protein: Some(draft.nutrition.protein.into()),
            fats: Some(draft.nutrition.fats.into()),
            carbs: Some(draft.nutrition.carbs.into()),
        }
    }
}

/// The catalog a fresh tracker starts with
pub fn seed_catalog() -> Vec<FoodItem> {
    let seed = [
        ("Apple", 95.0, 0.5, 0.3, 25.0),
        ("Chicken Breast", 165.0, 31.0, 3.6, 0.0),
        ("Brown Rice", 216.0, 4.5, 1.8, 45.0),
        ("Salmon", 206.0, 22.0, 13.0, 0.0),
        ("Broccoli", 55.0, 3.7, 0.6, 11.0),
    ];

    seed.iter()
        .zip(1u64..)
        .map(|(&(name, calories, protein, fats, carbs), id)| FoodItem {
            id: FoodItemId(id),
            name: name.to_string(),
            calories,
            protein,
            fats,
            carbs,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_input_coercion() {
        assert_eq!(FieldInput::from("12.5").coerce(), 12.5);
        assert_eq!(FieldInput::from(" 7 ").coerce(), 7.0);
        assert_eq!(FieldInput::from("").coerce(), 0.0);
        assert_eq!(FieldInput::from("lots").coerce(), 0.0);
        assert_eq!(FieldInput::from(f64::NAN).coerce(), 0.0);
        assert_eq!(FieldInput::from(3.0).as_number(), Some(3.0));
        assert_eq!(FieldInput::from("abc").as_number(), None);
    }

    #[test]
    fn test_field_input_deserializes_numbers_and_text() {
        let n: FieldInput = serde_json::from_str("95").unwrap();
        let t: FieldInput = serde_json::from_str("\"95\"").unwrap();
        assert_eq!(n.coerce(), 95.0);
        assert_eq!(t.coerce(), 95.0);
    }

    #[test]
    fn test_seed_catalog_ids_are_unique() {
        let catalog = seed_catalog();
        assert_eq!(catalog.len(), 5);
        let mut ids: Vec<_> = catalog.iter().map(|i| i.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), 5);
        assert_eq!(catalog[0].name, "Apple");
        assert_eq!(catalog[3].calories, 206.0);
    }

    #[test]
    fn test_matches_is_case_insensitive() {
        let catalog = seed_catalog();
        let hits: Vec<_> = catalog.iter().filter(|i| i.matches("RICE")).collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Brown Rice");
        assert!(catalog.iter().all(|i| i.matches("")));
    }

    #[test]
    fn test_draft_serializes_flat() {
        let draft = FoodItemDraft {
            name: "Banana".to_string(),
            nutrition: Nutrition::new(105.0, 1.3, 0.4, 27.0),
        };
        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(value["name"], "Banana");
        assert_eq!(value["calories"], 105.0);
        assert_eq!(value["carbs"], 27.0);
    }
}
