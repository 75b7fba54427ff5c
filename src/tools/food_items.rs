//! Food Item MCP Tools
//!
//! Tools for browsing and extending the food catalog.

use serde::Serialize;

use super::error_message;
use crate::models::{FoodItem, FoodItemForm, FoodItemId, SelectedEntry};
use crate::store::KeyValueStore;
use crate::tracker::Tracker;

/// Response for list_food_items
#[derive(Debug, Serialize)]
pub struct ListFoodItemsResponse {
    pub items: Vec<FoodItemSummary>,
    pub total: usize,
    pub query: Option<String>,
}

/// Catalog entry as shown in list results
#[derive(Debug, Serialize)]
pub struct FoodItemSummary {
    pub id: FoodItemId,
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub fats: f64,
    pub carbs: f64,
    /// How many are selected on the active date
    pub selected_count: u32,
}

impl FoodItemSummary {
    fn new(item: &FoodItem, selected_count: u32) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            calories: item.calories,
            protein: item.protein,
            fats: item.fats,
            carbs: item.carbs,
            selected_count,
        }
    }
}

/// Response for add_food_item / add_and_log_food_item
#[derive(Debug, Serialize)]
pub struct AddFoodItemResponse {
    pub item: FoodItem,
    pub logged: bool,
    /// The item's entry on the active date, when it was logged
    pub entry: Option<SelectedEntry>,
    pub date: String,
}

/// List the catalog, optionally filtered by a case-insensitive name search
pub fn list_food_items<S: KeyValueStore>(
    tracker: &Tracker<S>,
    query: Option<&str>,
) -> Result<ListFoodItemsResponse, String> {
    let query = query.map(str::trim).filter(|q| !q.is_empty());
    let matches = match query {
        Some(q) => tracker.search_catalog(q),
        None => tracker.catalog().iter().collect(),
    };

    let items: Vec<FoodItemSummary> = matches
        .into_iter()
        .map(|item| {
            let count = tracker.selections().get(&item.id).map(|e| e.count).unwrap_or(0);
            FoodItemSummary::new(item, count)
        })
        .collect();

    Ok(ListFoodItemsResponse {
        total: items.len(),
        items,
        query: query.map(str::to_string),
    })
}

/// Add a food item to the catalog, and optionally log it on the active date
pub fn add_food_item<S: KeyValueStore>(
    tracker: &mut Tracker<S>,
    form: FoodItemForm,
    log: bool,
) -> Result<AddFoodItemResponse, String> {
    let (item, entry) = if log {
        let (item, entry) = tracker.add_and_log_food_item(form).map_err(error_message)?;
        (item, Some(entry))
    } else {
        (tracker.add_food_item(form).map_err(error_message)?, None)
    };

    Ok(AddFoodItemResponse {
        item,
        logged: log,
        entry,
        date: tracker.selected_date().to_string(),
    })
}
