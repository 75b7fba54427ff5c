//! Seven-day dashboard
//!
//! Derives every series the home view charts from the three history maps.

use chrono::NaiveDate;
use serde::Serialize;

use super::series::{build_series, last_n_days, normalize, SeriesPoint, DASHBOARD_DAYS};
use crate::models::{DailyTotals, NutritionHistory, StepHistory, WeightHistory};

/// Protein, fats and carbs for one day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacroPoint {
    pub date: NaiveDate,
    pub protein: i64,
    pub fats: i64,
    pub carbs: i64,
}

/// Calories, weight and steps for one day, each also as a percentage of its
/// own maximum over the window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinedPoint {
    pub date: NaiveDate,
    pub calories: i64,
    pub weight: Option<f64>,
    pub steps: u64,
    pub normalized_calories: f64,
    pub normalized_weight: Option<f64>,
    pub normalized_steps: f64,
}

/// All dashboard series for the window ending at `end_date`
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub calories: Vec<SeriesPoint<i64>>,
    pub macros: Vec<MacroPoint>,
    pub weight: Vec<SeriesPoint<Option<f64>>>,
    pub steps: Vec<SeriesPoint<u64>>,
    pub combined: Vec<CombinedPoint>,
}

impl Dashboard {
    pub fn build(
        reference: NaiveDate,
        nutrition: &NutritionHistory,
        weight: &WeightHistory,
        steps: &StepHistory,
    ) -> Self {
        Self::build_days(DASHBOARD_DAYS, reference, nutrition, weight, steps)
    }

    pub fn build_days(
        days: usize,
        reference: NaiveDate,
        nutrition: &NutritionHistory,
        weight: &WeightHistory,
        steps: &StepHistory,
    ) -> Self {
        let dates = last_n_days(days, reference);

        let totals = build_series(&dates, nutrition, |t| *t, DailyTotals::default());
        let calories: Vec<SeriesPoint<i64>> = totals
            .iter()
            .map(|p| SeriesPoint { date: p.date, value: p.value.calories })
            .collect();
        let macros = totals
            .iter()
            .map(|p| MacroPoint {
                date: p.date,
                protein: p.value.protein,
                fats: p.value.fats,
                carbs: p.value.carbs,
            })
            .collect();
        let weight_series = build_series(&dates, weight, |w| Some(*w), None);
        let step_series = build_series(&dates, steps, |s| *s, 0);

        let combined = combine(&calories, &weight_series, &step_series);

        Self {
            start_date: dates.first().copied().unwrap_or(reference),
            end_date: reference,
            calories,
            macros,
            weight: weight_series,
            steps: step_series,
            combined,
        }
    }
}

fn as_f64<T: Copy>(series: &[SeriesPoint<T>], f: impl Fn(T) -> f64) -> Vec<SeriesPoint<f64>> {
    series
        .iter()
        .map(|p| SeriesPoint { date: p.date, value: f(p.value) })
        .collect()
}

fn combine(
    calories: &[SeriesPoint<i64>],
    weight: &[SeriesPoint<Option<f64>>],
    steps: &[SeriesPoint<u64>],
) -> Vec<CombinedPoint> {
    let calories_norm = normalize(&as_f64(calories, |c| c as f64));
    let steps_norm = normalize(&as_f64(steps, |s| s as f64));
    let weight_norm = normalize(weight);

    calories
        .iter()
        .zip(weight)
        .zip(steps)
        .enumerate()
        .map(|(i, ((c, w), s))| CombinedPoint {
            date: c.date,
            calories: c.value,
            weight: w.value,
            steps: s.value,
            normalized_calories: calories_norm[i].normalized.unwrap_or(0.0),
            normalized_weight: weight_norm[i].normalized,
            normalized_steps: steps_norm[i].normalized.unwrap_or(0.0),
        })
        .collect()
}
