//! Dashboard MCP Tools

use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;

use super::charts::{write_charts, ChartFile, ChartKind};
use crate::models::DailyTotals;
use crate::nutrition::Dashboard;
use crate::store::KeyValueStore;
use crate::tracker::Tracker;

/// Response for get_dashboard
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    #[serde(flatten)]
    pub dashboard: Dashboard,
    /// Seven-day totals over the window
    pub week_totals: DailyTotals,
    pub days_with_food: usize,
    pub days_with_weight: usize,
    pub days_with_steps: usize,
}

/// Response for render_dashboard_charts
#[derive(Debug, Serialize)]
pub struct RenderChartsResponse {
    pub success: bool,
    pub date_range: String,
    pub charts: Vec<ChartFile>,
    pub message: String,
}

/// The seven-day dashboard ending at `reference`
pub fn get_dashboard<S: KeyValueStore>(tracker: &Tracker<S>, reference: NaiveDate) -> DashboardResponse {
    let dashboard = tracker.dashboard(reference);

    let week_totals = dashboard.macros.iter().zip(&dashboard.calories).fold(
        DailyTotals::default(),
        |acc, (m, c)| DailyTotals {
            calories: acc.calories + c.value,
            protein: acc.protein + m.protein,
            fats: acc.fats + m.fats,
            carbs: acc.carbs + m.carbs,
        },
    );
    let days_with_food = dashboard.calories.iter().filter(|p| p.value > 0).count();
    let days_with_weight = dashboard.weight.iter().filter(|p| p.value.is_some()).count();
    let days_with_steps = dashboard.steps.iter().filter(|p| p.value > 0).count();

    DashboardResponse {
        dashboard,
        week_totals,
        days_with_food,
        days_with_weight,
        days_with_steps,
    }
}

/// Render dashboard charts as PNG files under `dir`. An empty `kinds`
/// renders all five.
pub fn render_dashboard_charts(
    dashboard: &Dashboard,
    kinds: &[ChartKind],
    dir: &Path,
) -> Result<RenderChartsResponse, String> {
    let kinds = if kinds.is_empty() { &ChartKind::ALL[..] } else { kinds };

    let charts = write_charts(dashboard, kinds, dir)?;

    Ok(RenderChartsResponse {
        success: true,
        date_range: format!("{} to {}", dashboard.start_date, dashboard.end_date),
        message: format!("Rendered {} chart(s) to {}", charts.len(), dir.display()),
        charts,
    })
}
