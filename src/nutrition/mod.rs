//! Nutrition aggregation module
//!
//! Pure functions deriving daily totals and dashboard series from raw logs.

pub mod aggregate;
pub mod dashboard;
pub mod series;

pub use aggregate::compute_daily_totals;
pub use dashboard::{CombinedPoint, Dashboard, MacroPoint};
pub use series::{
    build_series, format_date, last_n_days, normalize, NormalizedPoint, SeriesPoint,
    DASHBOARD_DAYS,
};
