//! Shared nutrition data structures
//!
//! Used by food items, selection sets and the daily history.

use serde::{Deserialize, Serialize};

/// Nutritional values of one serving
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    pub calories: f64,
    pub protein: f64, // grams
    pub fats: f64,    // grams
    pub carbs: f64,   // grams
}

impl Nutrition {
    pub fn new(calories: f64, protein: f64, fats: f64, carbs: f64) -> Self {
        Self {
            calories,
            protein,
            fats,
            carbs,
        }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Scale nutrition values by a multiplier
    pub fn scale(&self, multiplier: f64) -> Self {
        Self {
            calories: self.calories * multiplier,
            protein: self.protein * multiplier,
            fats: self.fats * multiplier,
            carbs: self.carbs * multiplier,
        }
    }

    /// Round every field to the nearest whole number
    pub fn round(&self) -> DailyTotals {
        DailyTotals {
            calories: self.calories.round() as i64,
            protein: self.protein.round() as i64,
            fats: self.fats.round() as i64,
            carbs: self.carbs.round() as i64,
        }
    }
}

impl std::ops::Add for Nutrition {
    type Output = Nutrition;

    fn add(self, other: Nutrition) -> Nutrition {
        Nutrition {
            calories: self.calories + other.calories,
            protein: self.protein + other.protein,
            fats: self.fats + other.fats,
            carbs: self.carbs + other.carbs,
        }
    }
}

impl std::ops::Mul<f64> for Nutrition {
    type Output = Nutrition;

    fn mul(self, multiplier: f64) -> Nutrition {
        self.scale(multiplier)
    }
}

impl std::iter::Sum for Nutrition {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Nutrition::zero(), |acc, n| acc + n)
    }
}

/// Rounded totals for one day, as kept in the nutrition history
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTotals {
    pub calories: i64,
    pub protein: i64,
    pub fats: i64,
    pub carbs: i64,
}
