//! Data models
//!
//! Catalog entries, selection sets and the history maps.

mod food_item;
mod history;
mod nutrition;
mod selection;

pub use food_item::{seed_catalog, FieldInput, FoodItem, FoodItemDraft, FoodItemForm, FoodItemId};
pub use history::{NutritionHistory, StepHistory, WeightHistory};
pub use nutrition::{DailyTotals, Nutrition};
pub use selection::{SelectedEntry, SelectionSet};
