//! Tracker state controller
//!
//! Owns the catalog, the active date's selection set and the history maps.
//! Every mutation validates first, then mutates, recomputes the derived
//! nutrition totals and writes the affected keys back to the store.

mod draft;
mod error;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::lookup::{LookupError, NutritionLookup};
use crate::models::{
    seed_catalog, DailyTotals, FieldInput, FoodItem, FoodItemDraft, FoodItemForm, FoodItemId,
    Nutrition, NutritionHistory, SelectedEntry, SelectionSet, StepHistory, WeightHistory,
};
use crate::nutrition::{compute_daily_totals, format_date, Dashboard};
use crate::store::{
    KeyValueStore, CATALOG_KEY, NUTRITION_HISTORY_KEY, STEP_HISTORY_KEY, WEIGHT_HISTORY_KEY,
};

pub use draft::{DraftSlot, RequestTicket};
pub use error::{TrackerError, TrackerResult};

pub struct Tracker<S: KeyValueStore> {
    store: S,
    catalog: Vec<FoodItem>,
    next_id: u64,
    selected_date: NaiveDate,
    selections: SelectionSet,
    nutrition_history: NutritionHistory,
    weight_history: WeightHistory,
    step_history: StepHistory,
    draft: DraftSlot,
}

impl<S: KeyValueStore> Tracker<S> {
    /// Load all state from `store` with `date` as the active date.
    ///
    /// An empty store is seeded with the default catalog.
    pub fn open(store: S, date: NaiveDate) -> TrackerResult<Self> {
        let catalog = match store.load::<Vec<FoodItem>>(CATALOG_KEY)? {
            Some(catalog) if !catalog.is_empty() => catalog,
            _ => {
                let catalog = seed_catalog();
                persist(&store, CATALOG_KEY, &catalog);
                catalog
            }
        };
        let next_id = catalog.iter().map(|item| item.id.0).max().unwrap_or(0) + 1;

        let nutrition_history = store.load(NUTRITION_HISTORY_KEY)?.unwrap_or_default();
        let weight_history = store.load(WEIGHT_HISTORY_KEY)?.unwrap_or_default();
        let step_history = store.load(STEP_HISTORY_KEY)?.unwrap_or_default();
        let stored = store.load::<SelectionSet>(&format_date(date))?;

        let mut tracker = Self {
            store,
            catalog,
            next_id,
            selected_date: date,
            selections: SelectionSet::new(),
            nutrition_history,
            weight_history,
            step_history,
            draft: DraftSlot::default(),
        };
        tracker.activate(date, stored);

        info!(
            catalog = tracker.catalog.len(),
            date = %date,
            "Tracker state loaded"
        );
        Ok(tracker)
    }

    // --- Read access ---

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn catalog(&self) -> &[FoodItem] {
        &self.catalog
    }

    /// Catalog items whose name contains `term`, ignoring case
    pub fn search_catalog(&self, term: &str) -> Vec<&FoodItem> {
        self.catalog.iter().filter(|item| item.matches(term)).collect()
    }

    pub fn find_item(&self, id: FoodItemId) -> Option<&FoodItem> {
        self.catalog.iter().find(|item| item.id == id)
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.selected_date
    }

    pub fn selections(&self) -> &SelectionSet {
        &self.selections
    }

    /// Totals for the active date
    pub fn daily_totals(&self) -> DailyTotals {
        compute_daily_totals(&self.selections)
    }

    pub fn nutrition_history(&self) -> &NutritionHistory {
        &self.nutrition_history
    }

    pub fn weight_history(&self) -> &WeightHistory {
        &self.weight_history
    }

    pub fn step_history(&self) -> &StepHistory {
        &self.step_history
    }

    /// The seven-day dashboard ending at `reference`
    pub fn dashboard(&self, reference: NaiveDate) -> Dashboard {
        Dashboard::build(
            reference,
            &self.nutrition_history,
            &self.weight_history,
            &self.step_history,
        )
    }

    pub fn draft(&self) -> &DraftSlot {
        &self.draft
    }

    // --- Catalog ---

    /// Validate a form and append the new item to the catalog
    pub fn add_food_item(&mut self, form: FoodItemForm) -> TrackerResult<FoodItem> {
        let draft = validate_form(&form)?;

        let item = FoodItem::new(FoodItemId(self.next_id), draft);
        self.next_id += 1;
        self.catalog.push(item.clone());
        self.persist(CATALOG_KEY, &self.catalog);

        info!(id = %item.id, name = %item.name, "Food item added");
        Ok(item)
    }

    /// Add a new item and select it on the active date
    pub fn add_and_log_food_item(
        &mut self,
        form: FoodItemForm,
    ) -> TrackerResult<(FoodItem, SelectedEntry)> {
        let item = self.add_food_item(form)?;
        let entry = self.select_food_item(&item);
        Ok((item, entry))
    }

    // --- Selections ---

    /// Select one more of `item` on the active date
    pub fn select_food_item(&mut self, item: &FoodItem) -> SelectedEntry {
        let entry = self
            .selections
            .entry(item.id)
            .and_modify(|entry| entry.count += 1)
            .or_insert_with(|| SelectedEntry::new(item.clone()))
            .clone();

        debug!(id = %item.id, count = entry.count, date = %self.selected_date, "Item selected");
        self.commit_selections();
        entry
    }

    /// Select by id, resolving against the catalog and then the active
    /// selection set
    pub fn select_food_item_by_id(&mut self, id: FoodItemId) -> TrackerResult<SelectedEntry> {
        let item = self
            .find_item(id)
            .or_else(|| self.selections.get(&id).map(|entry| &entry.item))
            .cloned()
            .ok_or_else(|| TrackerError::validation(format!("Unknown food item: {}", id)))?;

        Ok(self.select_food_item(&item))
    }

    /// Remove one of `id` from the active date. Returns the remaining entry,
    /// or `None` when the last one was removed.
    pub fn remove_selected_item(&mut self, id: FoodItemId) -> TrackerResult<Option<SelectedEntry>> {
        let remaining = match self.selections.get_mut(&id) {
            Some(entry) if entry.count > 1 => {
                entry.count -= 1;
                Some(entry.clone())
            }
            Some(_) => {
                self.selections.remove(&id);
                None
            }
            None => {
                return Err(TrackerError::validation(format!(
                    "Food item {} is not selected on {}",
                    id, self.selected_date
                )))
            }
        };

        debug!(
            id = %id,
            count = remaining.as_ref().map(|e| e.count).unwrap_or(0),
            date = %self.selected_date,
            "Item removed"
        );
        self.commit_selections();
        Ok(remaining)
    }

    /// Make `date` the active date, loading its selection set from the store
    pub fn change_selected_date(&mut self, date: NaiveDate) -> TrackerResult<()> {
        let stored = self.store.load::<SelectionSet>(&format_date(date))?;
        self.activate(date, stored);
        info!(date = %date, items = self.selections.len(), "Selected date changed");
        Ok(())
    }

    // --- Weight & steps ---

    /// Record the weight for `date`, replacing any earlier value
    pub fn log_weight(&mut self, date: NaiveDate, weight: impl Into<FieldInput>) -> TrackerResult<f64> {
        let weight = weight
            .into()
            .as_number()
            .ok_or_else(|| TrackerError::validation("Weight must be a number"))?;
        if weight <= 0.0 {
            return Err(TrackerError::validation("Weight must be greater than 0"));
        }

        self.weight_history.insert(date, weight);
        self.persist(WEIGHT_HISTORY_KEY, &self.weight_history);
        info!(date = %date, weight, "Weight logged");
        Ok(weight)
    }

    /// Record the step count for `date`, replacing any earlier value
    pub fn log_steps(&mut self, date: NaiveDate, steps: impl Into<FieldInput>) -> TrackerResult<u64> {
        let steps = parse_steps(&steps.into())?;

        self.step_history.insert(date, steps);
        self.persist(STEP_HISTORY_KEY, &self.step_history);
        info!(date = %date, steps, "Steps logged");
        Ok(steps)
    }

    // --- Nutrition lookup ---

    /// Start a lookup: checks the inputs and takes a fencing ticket
    pub fn begin_lookup(&mut self, food_name: &str, credential: &str) -> TrackerResult<RequestTicket> {
        if food_name.trim().is_empty() {
            return Err(TrackerError::validation("name required"));
        }
        if credential.trim().is_empty() {
            return Err(LookupError::Credential.into());
        }
        Ok(self.draft.begin())
    }

    /// Finish a lookup started with [`Tracker::begin_lookup`].
    ///
    /// A successful result becomes the current draft unless a newer lookup
    /// has been started since.
    pub fn finish_lookup(
        &mut self,
        ticket: RequestTicket,
        result: Result<FoodItemDraft, LookupError>,
    ) -> TrackerResult<FoodItemDraft> {
        match result {
            Ok(draft) => {
                if self.draft.complete(ticket, draft.clone()) {
                    Ok(draft)
                } else {
                    debug!(ticket = ticket.id(), "Dropping stale lookup result");
                    Err(TrackerError::Superseded)
                }
            }
            Err(e) => {
                if !self.draft.fail(ticket) {
                    debug!(ticket = ticket.id(), "Dropping stale lookup failure");
                }
                warn!(error = %e, "Nutrition lookup failed");
                Err(e.into())
            }
        }
    }

    /// Look up nutrition for `food_name` and keep the result as the draft
    pub fn fetch_and_apply_nutrition(
        &mut self,
        lookup: &dyn NutritionLookup,
        food_name: &str,
        credential: &str,
    ) -> TrackerResult<FoodItemDraft> {
        let ticket = self.begin_lookup(food_name, credential)?;
        let result = lookup.lookup(food_name.trim(), credential);
        self.finish_lookup(ticket, result)
    }

    /// Add the current draft to the catalog, optionally logging it too
    pub fn submit_draft(&mut self, log: bool) -> TrackerResult<FoodItem> {
        let draft = self
            .draft
            .draft()
            .cloned()
            .ok_or_else(|| TrackerError::validation("No nutrition draft to submit"))?;

        let item = if log {
            self.add_and_log_food_item(draft.into())?.0
        } else {
            self.add_food_item(draft.into())?
        };
        self.draft.clear();
        Ok(item)
    }

    // --- Internals ---

    /// Install `stored` as the active selection set and bring its history
    /// entry in line with it
    fn activate(&mut self, date: NaiveDate, stored: Option<SelectionSet>) {
        let was_stored = stored.is_some();
        self.selected_date = date;
        self.selections = stored.unwrap_or_default();

        if was_stored {
            let totals = compute_daily_totals(&self.selections);
            if self.nutrition_history.get(&date) != Some(&totals) {
                warn!(date = %date, "Nutrition history out of date, recomputing");
                self.nutrition_history.insert(date, totals);
                self.persist(NUTRITION_HISTORY_KEY, &self.nutrition_history);
            }
        }
    }

    /// Recompute the active date's totals and persist both keys
    fn commit_selections(&mut self) {
        let totals = compute_daily_totals(&self.selections);
        self.nutrition_history.insert(self.selected_date, totals);

        self.persist(&format_date(self.selected_date), &self.selections);
        self.persist(NUTRITION_HISTORY_KEY, &self.nutrition_history);
    }

    fn persist<T: Serialize>(&self, key: &str, value: &T) {
        persist(&self.store, key, value);
    }
}

/// Fire-and-forget write; failures are logged, never surfaced
fn persist<S: KeyValueStore, T: Serialize>(store: &S, key: &str, value: &T) {
    if let Err(e) = store.save(key, value) {
        warn!(key, error = %e, "Persistence write failed");
    }
}

/// Largest step count an `f64` holds exactly
const MAX_EXACT_STEPS: f64 = 9_007_199_254_740_992.0;

/// Whole, non-negative step count. Integer text is read as-is; anything
/// else goes through `f64` and must be exactly representable.
fn parse_steps(input: &FieldInput) -> TrackerResult<u64> {
    if let FieldInput::Text(s) = input {
        if let Ok(steps) = s.trim().parse::<u64>() {
            return Ok(steps);
        }
    }

    let steps = input
        .as_number()
        .ok_or_else(|| TrackerError::validation("Steps must be a number"))?;
    if steps < 0.0 || steps.fract() != 0.0 {
        return Err(TrackerError::validation("Steps must be a whole number of at least 0"));
    }
    if steps > MAX_EXACT_STEPS {
        return Err(TrackerError::validation("Steps value is too large"));
    }
    Ok(steps as u64)
}

/// Turn raw form input into a draft: a name is required, numbers default to
/// 0, negatives are refused
fn validate_form(form: &FoodItemForm) -> TrackerResult<FoodItemDraft> {
    let name = form.name.trim();
    if name.is_empty() {
        return Err(TrackerError::validation("name required"));
    }

    let field = |label: &str, input: &Option<FieldInput>| -> TrackerResult<f64> {
        let value = input.as_ref().map(FieldInput::coerce).unwrap_or(0.0);
        if value < 0.0 {
            return Err(TrackerError::validation(format!("{} cannot be negative", label)));
        }
        Ok(value)
    };

    Ok(FoodItemDraft {
        name: name.to_string(),
        nutrition: Nutrition {
            calories: field("calories", &form.calories)?,
            protein: field("protein", &form.protein)?,
            fats: field("fats", &form.fats)?,
            carbs: field("carbs", &form.carbs)?,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, StoreResult};

    struct FixedLookup(Result<FoodItemDraft, ()>);

    impl NutritionLookup for FixedLookup {
        fn lookup(&self, _food_name: &str, credential: &str) -> Result<FoodItemDraft, LookupError> {
            if credential.is_empty() {
                return Err(LookupError::Credential);
            }
            self.0
                .clone()
                .map_err(|_| LookupError::Parse("no JSON object".to_string()))
        }
    }

    /// Reads from the wrapped store, refuses every write
    struct ReadOnlyStore(MemoryStore);

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, key: &str) -> StoreResult<Option<serde_json::Value>> {
            self.0.get(key)
        }

        fn set(&self, _key: &str, _value: &serde_json::Value) -> StoreResult<()> {
            Err(serde_json::from_str::<serde_json::Value>("{").unwrap_err().into())
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn tracker(store: &MemoryStore) -> Tracker<&MemoryStore> {
        Tracker::open(store, date("2024-05-10")).unwrap()
    }

    fn apple<S: KeyValueStore>(tracker: &Tracker<S>) -> FoodItem {
        tracker.search_catalog("apple")[0].clone()
    }

    fn banana_draft() -> FoodItemDraft {
        FoodItemDraft {
            name: "1 medium banana".to_string(),
            nutrition: Nutrition::new(105.0, 1.3, 0.4, 27.0),
        }
    }

    #[test]
    fn test_open_seeds_catalog() {
        let store = MemoryStore::new();
        let tracker = tracker(&store);
        assert_eq!(tracker.catalog().len(), 5);
        assert!(tracker.selections().is_empty());
        assert!(store.get(CATALOG_KEY).unwrap().is_some());
        // Nothing but the seeded catalog is written on a fresh open
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_failed_writes_keep_in_memory_state() {
        let mut tracker = Tracker::open(ReadOnlyStore(MemoryStore::new()), date("2024-05-10")).unwrap();
        assert_eq!(tracker.catalog().len(), 5);
        let apple = apple(&tracker);

        let entry = tracker.select_food_item(&apple);
        assert_eq!(entry.count, 1);
        assert_eq!(tracker.selections()[&apple.id].count, 1);
        assert_eq!(tracker.nutrition_history()[&date("2024-05-10")].calories, 95);

        assert_eq!(tracker.log_weight(date("2024-05-10"), 70.0).unwrap(), 70.0);
        assert_eq!(tracker.log_steps(date("2024-05-10"), "4000").unwrap(), 4000);
        assert_eq!(tracker.step_history()[&date("2024-05-10")], 4000);

        let item = tracker.add_food_item(FoodItemForm::named("Toast")).unwrap();
        assert_eq!(tracker.find_item(item.id), Some(&item));
        assert!(tracker.store().0.is_empty());
    }

    #[test]
    fn test_add_food_item_coerces_fields() {
        let store = MemoryStore::new();
        let mut tracker = tracker(&store);

        let item = tracker
            .add_food_item(FoodItemForm {
                name: "  Greek Yogurt ".to_string(),
                calories: Some("100".into()),
                protein: Some(17.0.into()),
                fats: Some("".into()),
                carbs: None,
            })
            .unwrap();

        assert_eq!(item.id, FoodItemId(6));
        assert_eq!(item.name, "Greek Yogurt");
        assert_eq!(item.calories, 100.0);
        assert_eq!(item.protein, 17.0);
        assert_eq!(item.fats, 0.0);
        assert_eq!(item.carbs, 0.0);
        assert_eq!(tracker.catalog().len(), 6);
        assert!(tracker.selections().is_empty());
    }

    #[test]
    fn test_add_food_item_requires_name() {
        let store = MemoryStore::new();
        let mut tracker = tracker(&store);
        let before = tracker.catalog().to_vec();

        let err = tracker.add_food_item(FoodItemForm::named("   ")).unwrap_err();
        assert!(matches!(err, TrackerError::Validation(ref m) if m == "name required"));
        assert_eq!(tracker.catalog(), before.as_slice());

        let err = tracker
            .add_food_item(FoodItemForm { calories: Some((-5.0).into()), ..FoodItemForm::named("Bad") })
            .unwrap_err();
        assert!(matches!(err, TrackerError::Validation(_)));
        assert_eq!(tracker.catalog(), before.as_slice());
    }

    #[test]
    fn test_ids_survive_reopen() {
        let store = MemoryStore::new();
        {
            let mut tracker = tracker(&store);
            tracker.add_food_item(FoodItemForm::named("Toast")).unwrap();
        }
        let mut tracker = tracker(&store);
        assert_eq!(tracker.catalog().len(), 6);
        let item = tracker.add_food_item(FoodItemForm::named("Jam")).unwrap();
        assert_eq!(item.id, FoodItemId(7));
    }

    #[test]
    fn test_select_and_remove_round_trip() {
        let store = MemoryStore::new();
        let mut tracker = tracker(&store);
        let apple = apple(&tracker);

        let entry = tracker.select_food_item(&apple);
        assert_eq!(entry.count, 1);
        assert_eq!(tracker.nutrition_history()[&date("2024-05-10")].calories, 95);

        assert_eq!(tracker.remove_selected_item(apple.id).unwrap(), None);
        assert!(tracker.selections().is_empty());
        assert_eq!(
            tracker.nutrition_history()[&date("2024-05-10")],
            DailyTotals::default()
        );
    }

    #[test]
    fn test_remove_decrements_before_deleting() {
        let store = MemoryStore::new();
        let mut tracker = tracker(&store);
        let apple = apple(&tracker);

        tracker.select_food_item(&apple);
        tracker.select_food_item(&apple);
        tracker.select_food_item(&apple);

        let remaining = tracker.remove_selected_item(apple.id).unwrap().unwrap();
        assert_eq!(remaining.count, 2);
        assert_eq!(tracker.selections()[&apple.id].count, 2);
        assert_eq!(tracker.daily_totals().calories, 190);
    }

    #[test]
    fn test_remove_missing_item_is_rejected() {
        let store = MemoryStore::new();
        let mut tracker = tracker(&store);
        let err = tracker.remove_selected_item(FoodItemId(1)).unwrap_err();
        assert!(matches!(err, TrackerError::Validation(_)));
        assert!(tracker.nutrition_history().is_empty());
    }

    #[test]
    fn test_selection_survives_date_change() {
        let store = MemoryStore::new();
        let mut tracker = tracker(&store);
        let apple = apple(&tracker);

        tracker.select_food_item(&apple);
        tracker.select_food_item(&apple);

        tracker.change_selected_date(date("2024-05-11")).unwrap();
        assert!(tracker.selections().is_empty());
        assert_eq!(tracker.selected_date(), date("2024-05-11"));

        tracker.change_selected_date(date("2024-05-10")).unwrap();
        assert_eq!(tracker.selections()[&apple.id].count, 2);
        assert_eq!(tracker.daily_totals().calories, 190);
        // Visiting a date doesn't invent a history entry for it
        assert!(!tracker.nutrition_history().contains_key(&date("2024-05-11")));
    }

    #[test]
    fn test_stale_history_is_repaired_on_load() {
        let store = MemoryStore::new();
        {
            let mut tracker = tracker(&store);
            let apple = apple(&tracker);
            tracker.select_food_item(&apple);
        }
        // Simulate a crash between the selection write and the history write
        store.save(NUTRITION_HISTORY_KEY, &NutritionHistory::new()).unwrap();

        let tracker = tracker(&store);
        assert_eq!(tracker.nutrition_history()[&date("2024-05-10")].calories, 95);
    }

    #[test]
    fn test_add_and_log() {
        let store = MemoryStore::new();
        let mut tracker = tracker(&store);

        let (item, entry) = tracker
            .add_and_log_food_item(FoodItemForm {
                calories: Some(250.0.into()),
                ..FoodItemForm::named("Bagel")
            })
            .unwrap();
        assert_eq!(entry.count, 1);
        assert_eq!(entry.item, item);
        assert_eq!(tracker.daily_totals().calories, 250);

        assert!(tracker.add_and_log_food_item(FoodItemForm::named("")).is_err());
        assert_eq!(tracker.selections().len(), 1);
    }

    #[test]
    fn test_select_by_id() {
        let store = MemoryStore::new();
        let mut tracker = tracker(&store);
        assert_eq!(tracker.select_food_item_by_id(FoodItemId(4)).unwrap().item.name, "Salmon");
        assert!(tracker.select_food_item_by_id(FoodItemId(99)).is_err());
    }

    #[test]
    fn test_log_weight_and_steps() {
        let store = MemoryStore::new();
        let mut tracker = tracker(&store);
        let day = date("2024-05-09");

        assert_eq!(tracker.log_weight(day, "72.4").unwrap(), 72.4);
        assert_eq!(tracker.log_weight(day, 71.9).unwrap(), 71.9);
        assert_eq!(tracker.weight_history()[&day], 71.9);

        assert!(tracker.log_weight(day, "heavy").is_err());
        assert!(tracker.log_weight(day, 0.0).is_err());
        assert_eq!(tracker.weight_history()[&day], 71.9);

        assert_eq!(tracker.log_steps(day, 8042.0).unwrap(), 8042);
        assert!(tracker.log_steps(day, "many").is_err());
        assert!(tracker.log_steps(day, -1.0).is_err());
        assert!(tracker.log_steps(day, 10.5).is_err());
        assert_eq!(tracker.step_history()[&day], 8042);

        let reopened = Tracker::open(&store, day).unwrap();
        assert_eq!(reopened.weight_history()[&day], 71.9);
        assert_eq!(reopened.step_history()[&day], 8042);
    }

    #[test]
    fn test_log_steps_rejects_inexact_counts() {
        let store = MemoryStore::new();
        let mut tracker = tracker(&store);
        let day = date("2024-05-09");

        // Integer text keeps every digit
        assert_eq!(tracker.log_steps(day, "9007199254740993").unwrap(), 9_007_199_254_740_993);
        assert_eq!(tracker.log_steps(day, " 12000 ").unwrap(), 12000);
        assert_eq!(tracker.log_steps(day, "300.0").unwrap(), 300);

        for input in [FieldInput::from(1e30), "1e30".into(), "99999999999999999999".into()] {
            let err = tracker.log_steps(day, input).unwrap_err();
            assert!(matches!(err, TrackerError::Validation(_)));
        }
        assert_eq!(tracker.step_history()[&day], 300);
        assert_eq!(tracker.log_steps(day, MAX_EXACT_STEPS).unwrap(), 9_007_199_254_740_992);
    }

    #[test]
    fn test_dashboard_reflects_state() {
        let store = MemoryStore::new();
        let mut tracker = tracker(&store);
        let apple = apple(&tracker);
        tracker.select_food_item(&apple);
        tracker.log_steps(date("2024-05-10"), 1000.0).unwrap();

        let dashboard = tracker.dashboard(date("2024-05-10"));
        assert_eq!(dashboard.calories.last().unwrap().value, 95);
        assert_eq!(dashboard.combined.last().unwrap().normalized_steps, 100.0);
        assert_eq!(dashboard.combined[0].normalized_calories, 0.0);
    }

    #[test]
    fn test_fetch_and_apply_nutrition() {
        let store = MemoryStore::new();
        let mut tracker = tracker(&store);
        let catalog_len = tracker.catalog().len();

        let ok = FixedLookup(Ok(banana_draft()));
        let draft = tracker.fetch_and_apply_nutrition(&ok, "banana", "key").unwrap();
        assert_eq!(draft, banana_draft());
        assert_eq!(tracker.draft().draft(), Some(&banana_draft()));
        assert_eq!(tracker.catalog().len(), catalog_len);

        let err = tracker.fetch_and_apply_nutrition(&ok, "banana", "").unwrap_err();
        assert!(matches!(err, TrackerError::Lookup(LookupError::Credential)));

        let bad = FixedLookup(Err(()));
        let err = tracker.fetch_and_apply_nutrition(&bad, "banana", "key").unwrap_err();
        assert!(matches!(err, TrackerError::Lookup(LookupError::Parse(_))));
        // The earlier draft is kept
        assert_eq!(tracker.draft().draft(), Some(&banana_draft()));
        assert_eq!(tracker.catalog().len(), catalog_len);
    }

    #[test]
    fn test_stale_lookup_cannot_overwrite_newer_draft() {
        let store = MemoryStore::new();
        let mut tracker = tracker(&store);

        let first = tracker.begin_lookup("egg", "key").unwrap();
        let second = tracker.begin_lookup("banana", "key").unwrap();

        tracker.finish_lookup(second, Ok(banana_draft())).unwrap();
        let egg = FoodItemDraft { name: "1 egg".to_string(), nutrition: Nutrition::new(72.0, 6.0, 5.0, 0.0) };
        let err = tracker.finish_lookup(first, Ok(egg)).unwrap_err();

        assert!(matches!(err, TrackerError::Superseded));
        assert_eq!(tracker.draft().draft().unwrap().name, "1 medium banana");
    }

    #[test]
    fn test_submit_draft() {
        let store = MemoryStore::new();
        let mut tracker = tracker(&store);
        assert!(tracker.submit_draft(true).is_err());

        let ok = FixedLookup(Ok(banana_draft()));
        tracker.fetch_and_apply_nutrition(&ok, "banana", "key").unwrap();
        let item = tracker.submit_draft(true).unwrap();

        assert_eq!(item.name, "1 medium banana");
        assert_eq!(tracker.selections()[&item.id].count, 1);
        assert_eq!(tracker.daily_totals().carbs, 27);
        assert!(tracker.draft().draft().is_none());
    }
}
