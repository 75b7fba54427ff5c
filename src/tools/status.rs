//! Nutrack Status Tool
//!
//! Provides runtime status information about the nutrack service.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::store::KeyValueStore;
use crate::tracker::Tracker;

/// Usage instructions for AI assistants
pub const TRACKER_INSTRUCTIONS: &str = r#"
# Nutrition Tracker Instructions

The tracker keeps a food catalog, a per-day food log, and daily weight and
step counts. All dates are `YYYY-MM-DD` and default to today (local time).

## Logging food

1. `list_food_items` with a `query` to find an item (case-insensitive).
2. `select_food_item` with its `id` to log one serving on the active date.
   Selecting the same item again increases its count.
3. `remove_selected_item` takes one serving away; the entry disappears
   when its count reaches 0.
4. `get_daily_log` shows the active date's entries and rounded totals.

The active date starts as today. Use `change_date` to log or review
another day; each day keeps its own log.

## Adding food items

`add_food_item` needs a `name`. `calories`, `protein`, `fats` and `carbs`
(grams) may be numbers or numeric text; anything empty or non-numeric is
stored as 0. Negative values are rejected. Set `log: true` to also log the
new item on the active date.

Names should include the serving, e.g. "1 medium banana" or
"100g cooked rice", because every value is per serving.

## Auto-fill

1. `lookup_nutrition` with a food name asks the nutrition service for the
   values. It needs an API key, either `api_key` or the `GROQ_API_KEY`
   environment variable.
2. Review the returned draft (`get_nutrition_draft` shows it again).
3. `submit_nutrition_draft` adds it to the catalog (`log: true` also logs it).

Starting a new lookup replaces any lookup still running; only the newest
result is kept. If a lookup fails, try again.

## Weight and steps

`log_weight` and `log_steps` record one value per date; logging again
replaces the earlier value. Weight must be above 0, steps a whole number.

## Dashboard

`get_dashboard` returns seven days of calories, macros, weight and steps
ending at `date`, plus a combined series where each metric is scaled to its
weekly maximum (0-100). `render_dashboard_charts` writes the five charts as
PNG files and returns their paths.
"#;

/// Tracker contents summary for the status tool
#[derive(Debug, Clone, Serialize)]
pub struct TrackerSummary {
    pub selected_date: String,
    pub catalog_items: usize,
    pub days_logged: usize,
    pub weight_entries: usize,
    pub step_entries: usize,
    pub lookup_pending: bool,
}

impl TrackerSummary {
    pub fn of<S: KeyValueStore>(tracker: &Tracker<S>) -> Self {
        Self {
            selected_date: tracker.selected_date().to_string(),
            catalog_items: tracker.catalog().len(),
            days_logged: tracker.nutrition_history().len(),
            weight_entries: tracker.weight_history().len(),
            step_entries: tracker.step_history().len(),
            lookup_pending: tracker.draft().is_busy(),
        }
    }
}

/// Runtime status of the nutrack service
#[derive(Debug, Clone, Serialize)]
pub struct NutrackStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,
    pub lookup_key_configured: bool,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,

    pub tracker: TrackerSummary,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    pub fn get_status(&self, tracker: TrackerSummary, lookup_key_configured: bool) -> NutrackStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        // Get process info
        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        NutrackStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            lookup_key_configured,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
            tracker,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::NaiveDate;

    #[test]
    fn test_status_reports_tracker_summary() {
        let store = MemoryStore::new();
        let tracker = Tracker::open(&store, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()).unwrap();

        let status = StatusTracker::new(PathBuf::from("/nonexistent/nutrack.db"))
            .get_status(TrackerSummary::of(&tracker), false);

        assert_eq!(status.database_size_bytes, None);
        assert_eq!(status.process_id, std::process::id());
        assert_eq!(status.tracker.catalog_items, 5);
        assert_eq!(status.tracker.selected_date, "2024-06-01");
        assert!(!status.tracker.lookup_pending);
    }
}
