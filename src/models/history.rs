//! History maps
//!
//! Persisted per-date values: derived nutrition totals and logged weight and
//! steps. Dates serialize as `YYYY-MM-DD` keys.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::DailyTotals;

pub type NutritionHistory = BTreeMap<NaiveDate, DailyTotals>;

/// Weight in kilograms; dates without a measurement have no entry
pub type WeightHistory = BTreeMap<NaiveDate, f64>;

/// Step counts; dates without an entry count as 0 when displayed
pub type StepHistory = BTreeMap<NaiveDate, u64>;
