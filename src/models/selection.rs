//! Selection set model
//!
//! The food items chosen on one date, with quantities.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{FoodItem, FoodItemId};

/// A food item selected on a date. `count` is never 0; emptied entries are removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedEntry {
    #[serde(flatten)]
    pub item: FoodItem,
    pub count: u32,
}

impl SelectedEntry {
    pub fn new(item: FoodItem) -> Self {
        Self { item, count: 1 }
    }
}

/// Per-date selection set, keyed by food item id
pub type SelectionSet = BTreeMap<FoodItemId, SelectedEntry>;
