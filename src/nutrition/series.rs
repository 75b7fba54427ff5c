//! Time series over the history maps
//!
//! Builds the fixed-length, date-aligned series the dashboard charts draw.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use serde::Serialize;

/// Number of days shown on the dashboard
pub const DASHBOARD_DAYS: usize = 7;

/// One value on one date
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint<T> {
    pub date: NaiveDate,
    pub value: T,
}

/// A value together with its share of the series maximum, in percent
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedPoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
    pub normalized: Option<f64>,
}

/// The `n` calendar dates ending at `reference` (inclusive), oldest first
pub fn last_n_days(n: usize, reference: NaiveDate) -> Vec<NaiveDate> {
    let mut dates: Vec<NaiveDate> = (0..n as u64)
        .filter_map(|back| reference.checked_sub_days(Days::new(back)))
        .collect();
    dates.reverse();
    dates
}

/// `YYYY-MM-DD`, the format used for store keys and series labels
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Look each date up in `history`, substituting `default` for missing dates
pub fn build_series<V, T, F>(
    dates: &[NaiveDate],
    history: &BTreeMap<NaiveDate, V>,
    extract: F,
    default: T,
) -> Vec<SeriesPoint<T>>
where
    F: Fn(&V) -> T,
    T: Clone,
{
    dates
        .iter()
        .map(|date| SeriesPoint {
            date: *date,
            value: history.get(date).map(&extract).unwrap_or_else(|| default.clone()),
        })
        .collect()
}

/// Scale present values to 0-100 relative to the series maximum.
///
/// Absent values stay absent. A maximum of 0 normalizes every present value
/// to 0.
pub fn normalize<T>(series: &[SeriesPoint<T>]) -> Vec<NormalizedPoint>
where
    T: Copy + Into<Option<f64>>,
{
    let values: Vec<Option<f64>> = series.iter().map(|p| p.value.into()).collect();
    let max = values
        .iter()
        .flatten()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);

    series
        .iter()
        .zip(values)
        .map(|(point, value)| NormalizedPoint {
            date: point.date,
            value,
            normalized: value.map(|v| if max > 0.0 { v / max * 100.0 } else { 0.0 }),
        })
        .collect()
}
