//! Daily nutrition aggregation

use crate::models::{DailyTotals, Nutrition, SelectionSet};

/// Sum `field × count` over a selection set, rounding each field.
///
/// Rounds half away from zero, which matches round-half-up for the
/// non-negative values the tracker admits.
pub fn compute_daily_totals(selections: &SelectionSet) -> DailyTotals {
    let total: Nutrition = selections
        .values()
        .map(|entry| entry.item.nutrition() * f64::from(entry.count))
        .sum();

    total.round()
}
