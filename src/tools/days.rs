//! Daily Log MCP Tools
//!
//! Tools for picking the active date and logging food on it.

use chrono::NaiveDate;
use serde::Serialize;

use super::error_message;
use crate::models::{DailyTotals, FoodItemId, SelectedEntry};
use crate::store::KeyValueStore;
use crate::tracker::Tracker;

/// One line of the daily log
#[derive(Debug, Serialize)]
pub struct DailyLogEntry {
    pub id: FoodItemId,
    pub name: String,
    pub count: u32,
    pub calories: f64,
    pub protein: f64,
    pub fats: f64,
    pub carbs: f64,
}

impl From<&SelectedEntry> for DailyLogEntry {
    fn from(entry: &SelectedEntry) -> Self {
        Self {
            id: entry.item.id,
            name: entry.item.name.clone(),
            count: entry.count,
            calories: entry.item.calories,
            protein: entry.item.protein,
            fats: entry.item.fats,
            carbs: entry.item.carbs,
        }
    }
}

/// Response for get_daily_log and change_date
#[derive(Debug, Serialize)]
pub struct DailyLogResponse {
    pub date: String,
    pub entries: Vec<DailyLogEntry>,
    pub totals: DailyTotals,
}

/// Response for select_food_item / remove_selected_item
#[derive(Debug, Serialize)]
pub struct SelectionResponse {
    pub date: String,
    pub id: FoodItemId,
    pub name: String,
    /// Count left on the date; 0 when the entry was removed
    pub count: u32,
    pub totals: DailyTotals,
}

/// The active date's selections and totals
pub fn get_daily_log<S: KeyValueStore>(tracker: &Tracker<S>) -> DailyLogResponse {
    DailyLogResponse {
        date: tracker.selected_date().to_string(),
        entries: tracker.selections().values().map(DailyLogEntry::from).collect(),
        totals: tracker.daily_totals(),
    }
}

/// Switch the active date
pub fn change_date<S: KeyValueStore>(
    tracker: &mut Tracker<S>,
    date: NaiveDate,
) -> Result<DailyLogResponse, String> {
    tracker
        .change_selected_date(date)
        .map_err(|e| format!("Failed to load {}: {}", date, error_message(e)))?;
    Ok(get_daily_log(tracker))
}

/// Select one more of a catalog item on the active date
pub fn select_food_item<S: KeyValueStore>(
    tracker: &mut Tracker<S>,
    id: FoodItemId,
) -> Result<SelectionResponse, String> {
    let entry = tracker.select_food_item_by_id(id).map_err(error_message)?;

    Ok(SelectionResponse {
        date: tracker.selected_date().to_string(),
        id,
        name: entry.item.name,
        count: entry.count,
        totals: tracker.daily_totals(),
    })
}

/// Remove one of an item from the active date
pub fn remove_selected_item<S: KeyValueStore>(
    tracker: &mut Tracker<S>,
    id: FoodItemId,
) -> Result<SelectionResponse, String> {
    let name = tracker
        .selections()
        .get(&id)
        .map(|e| e.item.name.clone())
        .unwrap_or_default();
    let remaining = tracker.remove_selected_item(id).map_err(error_message)?;

    Ok(SelectionResponse {
        date: tracker.selected_date().to_string(),
        id,
        name,
        count: remaining.map(|e| e.count).unwrap_or(0),
        totals: tracker.daily_totals(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn test_select_and_remove() {
        let store = MemoryStore::new();
        let mut tracker = Tracker::open(&store, date(10)).unwrap();

        select_food_item(&mut tracker, FoodItemId(1)).unwrap();
        let second = select_food_item(&mut tracker, FoodItemId(1)).unwrap();
        assert_eq!(second.count, 2);
        assert_eq!(second.totals.calories, 190);

        let removed = remove_selected_item(&mut tracker, FoodItemId(1)).unwrap();
        assert_eq!(removed.count, 1);
        let removed = remove_selected_item(&mut tracker, FoodItemId(1)).unwrap();
        assert_eq!(removed.count, 0);
        assert_eq!(removed.name, "Apple");
        assert_eq!(removed.totals, DailyTotals::default());

        assert!(remove_selected_item(&mut tracker, FoodItemId(1)).is_err());
        assert!(select_food_item(&mut tracker, FoodItemId(42)).is_err());
    }

    #[test]
    fn test_change_date_and_log() {
        let store = MemoryStore::new();
        let mut tracker = Tracker::open(&store, date(10)).unwrap();
        select_food_item(&mut tracker, FoodItemId(4)).unwrap();

        let other = change_date(&mut tracker, date(11)).unwrap();
        assert_eq!(other.date, "2024-05-11");
        assert!(other.entries.is_empty());

        let back = change_date(&mut tracker, date(10)).unwrap();
        assert_eq!(back.entries.len(), 1);
        assert_eq!(back.entries[0].name, "Salmon");
        assert_eq!(back.totals.protein, 22);
    }
}
