//! Dashboard chart rendering
//!
//! Draws the five dashboard charts with plotters into an RGB buffer and
//! encodes them as PNG.

use std::ops::Range;
use std::path::Path;

use image::{DynamicImage, ImageFormat, RgbImage};
use plotters::coord::Shift;
use plotters::prelude::*;
use rmcp::schemars;
use serde::{Deserialize, Serialize};

use crate::nutrition::{format_date, Dashboard};

pub const CHART_WIDTH: u32 = 800;
pub const CHART_HEIGHT: u32 = 400;

const PURPLE: RGBColor = RGBColor(136, 132, 216);
const GREEN: RGBColor = RGBColor(130, 202, 157);
const GOLD: RGBColor = RGBColor(255, 198, 88);

type Root<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Calories,
    Macros,
    Weight,
    Steps,
    Combined,
}

impl ChartKind {
    pub const ALL: [ChartKind; 5] = [
        ChartKind::Calories,
        ChartKind::Macros,
        ChartKind::Weight,
        ChartKind::Steps,
        ChartKind::Combined,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ChartKind::Calories => "calories",
            ChartKind::Macros => "macros",
            ChartKind::Weight => "weight",
            ChartKind::Steps => "steps",
            ChartKind::Combined => "combined",
        }
    }

    /// Render this chart for `dashboard` as PNG bytes
    pub fn render(&self, dashboard: &Dashboard, width: u32, height: u32) -> Result<Vec<u8>, String> {
        match self {
            ChartKind::Calories => generate_calories_chart(dashboard, width, height),
            ChartKind::Macros => generate_macros_chart(dashboard, width, height),
            ChartKind::Weight => generate_weight_chart(dashboard, width, height),
            ChartKind::Steps => generate_steps_chart(dashboard, width, height),
            ChartKind::Combined => generate_combined_chart(dashboard, width, height),
        }
    }
}

/// A chart written to disk
#[derive(Debug, Serialize)]
pub struct ChartFile {
    pub kind: ChartKind,
    pub file_path: String,
    pub size_bytes: usize,
}

/// Render `kinds` and write them to `dir` as `<kind>-<end date>.png`
pub fn write_charts(
    dashboard: &Dashboard,
    kinds: &[ChartKind],
    dir: &Path,
) -> Result<Vec<ChartFile>, String> {
    std::fs::create_dir_all(dir)
        .map_err(|e| format!("Failed to create chart directory {}: {}", dir.display(), e))?;

    kinds
        .iter()
        .map(|kind| {
            let png = kind
                .render(dashboard, CHART_WIDTH, CHART_HEIGHT)
                .map_err(|e| format!("Failed to render {} chart: {}", kind.name(), e))?;
            let path = dir.join(format!("{}-{}.png", kind.name(), format_date(dashboard.end_date)));
            std::fs::write(&path, &png)
                .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;

            Ok(ChartFile {
                kind: *kind,
                file_path: path.display().to_string(),
                size_bytes: png.len(),
            })
        })
        .collect()
}

// ============================================================================
// Charts
// ============================================================================

pub fn generate_calories_chart(d: &Dashboard, width: u32, height: u32) -> Result<Vec<u8>, String> {
    let labels = labels(d);
    let calories: Vec<f64> = d.calories.iter().map(|p| p.value as f64).collect();
    render(width, height, |root| {
        draw_bars(root, "Daily Calories", "kcal", &labels, &[("Calories", PURPLE, calories)])
    })
}

pub fn generate_macros_chart(d: &Dashboard, width: u32, height: u32) -> Result<Vec<u8>, String> {
    let labels = labels(d);
    let groups: [(&str, RGBColor, Vec<f64>); 3] = [
        ("Protein", PURPLE, d.macros.iter().map(|m| m.protein as f64).collect()),
        ("Fats", GREEN, d.macros.iter().map(|m| m.fats as f64).collect()),
        ("Carbs", GOLD, d.macros.iter().map(|m| m.carbs as f64).collect()),
    ];
    render(width, height, |root| draw_bars(root, "Daily Macronutrients", "grams", &labels, &groups))
}

pub fn generate_weight_chart(d: &Dashboard, width: u32, height: u32) -> Result<Vec<u8>, String> {
    let labels = labels(d);
    let weights: Vec<Option<f64>> = d.weight.iter().map(|p| p.value).collect();
    let y_range = padded_range(&weights);
    render(width, height, |root| {
        draw_lines(root, "Weight", "weight", &labels, y_range, &[("Weight", PURPLE, weights)])
    })
}

pub fn generate_steps_chart(d: &Dashboard, width: u32, height: u32) -> Result<Vec<u8>, String> {
    let labels = labels(d);
    let steps: Vec<f64> = d.steps.iter().map(|p| p.value as f64).collect();
    render(width, height, |root| {
        draw_bars(root, "Daily Steps", "steps", &labels, &[("Steps", GREEN, steps)])
    })
}

pub fn generate_combined_chart(d: &Dashboard, width: u32, height: u32) -> Result<Vec<u8>, String> {
    let labels = labels(d);
    let series: [(&str, RGBColor, Vec<Option<f64>>); 3] = [
        ("Calories", PURPLE, d.combined.iter().map(|c| Some(c.normalized_calories)).collect()),
        ("Weight", GREEN, d.combined.iter().map(|c| c.normalized_weight).collect()),
        ("Steps", GOLD, d.combined.iter().map(|c| Some(c.normalized_steps)).collect()),
    ];
    render(width, height, |root| {
        draw_lines(root, "Calories, Weight and Steps", "% of weekly max", &labels, 0.0..105.0, &series)
    })
}

// ============================================================================
// Drawing helpers
// ============================================================================

fn labels(d: &Dashboard) -> Vec<String> {
    d.calories.iter().map(|p| p.date.format("%m/%d").to_string()).collect()
}

/// Date label for a tick, blank between days
fn label_at(labels: &[String], x: f64) -> String {
    let i = x.round();
    if (x - i).abs() > 1e-6 || i < 0.0 {
        return String::new();
    }
    labels.get(i as usize).cloned().unwrap_or_default()
}

/// Consecutive present values as (index, value) runs, so absent days show as gaps
fn present_runs(values: &[Option<f64>]) -> Vec<Vec<(f64, f64)>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for (i, value) in values.iter().enumerate() {
        match value {
            Some(v) => current.push((i as f64, *v)),
            None if !current.is_empty() => runs.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

/// Min/max of the present values with some headroom
fn padded_range(values: &[Option<f64>]) -> Range<f64> {
    let present = values.iter().flatten().copied();
    let min = present.clone().fold(f64::INFINITY, f64::min);
    let max = present.fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return 0.0..100.0;
    }
    let pad = ((max - min) * 0.1).max(1.0);
    (min - pad).max(0.0)..(max + pad)
}

fn render<F>(width: u32, height: u32, draw: F) -> Result<Vec<u8>, String>
where
    F: FnOnce(&Root<'_>) -> Result<(), String>,
{
    let mut buffer = vec![0u8; (width * height * 3) as usize];

    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(|e| e.to_string())?;
        draw(&root)?;
        root.present().map_err(|e| e.to_string())?;
    }

    // Convert RGB buffer to PNG
    let img = RgbImage::from_raw(width, height, buffer)
        .ok_or("Failed to create image from buffer")?;

    let mut png_bytes = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut std::io::Cursor::new(&mut png_bytes), ImageFormat::Png)
        .map_err(|e| e.to_string())?;

    Ok(png_bytes)
}

fn draw_bars(
    root: &Root<'_>,
    caption: &str,
    y_desc: &str,
    labels: &[String],
    groups: &[(&str, RGBColor, Vec<f64>)],
) -> Result<(), String> {
    let days = labels.len() as f64;
    let y_max = groups
        .iter()
        .flat_map(|(_, _, values)| values.iter().copied())
        .fold(0.0, f64::max);
    let y_max = if y_max > 0.0 { y_max * 1.1 } else { 1.0 };

    let mut chart = ChartBuilder::on(root)
        .caption(caption, ("sans-serif", 20))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5..(days - 0.5), 0.0..y_max)
        .map_err(|e| e.to_string())?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len())
        .x_label_formatter(&|x| label_at(labels, *x))
        .y_desc(y_desc)
        .draw()
        .map_err(|e| e.to_string())?;

    let bar_width = 0.8 / groups.len().max(1) as f64;
    for (g, (name, color, values)) in groups.iter().enumerate() {
        let color = *color;
        chart
            .draw_series(values.iter().enumerate().map(|(i, v)| {
                let x0 = i as f64 - 0.4 + g as f64 * bar_width;
                Rectangle::new([(x0, 0.0), (x0 + bar_width, *v)], color.filled())
            }))
            .map_err(|e| e.to_string())?
            .label(*name)
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(|e| e.to_string())
}

fn draw_lines(
    root: &Root<'_>,
    caption: &str,
    y_desc: &str,
    labels: &[String],
    y_range: Range<f64>,
    series: &[(&str, RGBColor, Vec<Option<f64>>)],
) -> Result<(), String> {
    let days = labels.len() as f64;

    let mut chart = ChartBuilder::on(root)
        .caption(caption, ("sans-serif", 20))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5..(days - 0.5), y_range)
        .map_err(|e| e.to_string())?;

    chart
        .configure_mesh()
        .x_labels(labels.len())
        .x_label_formatter(&|x| label_at(labels, *x))
        .y_desc(y_desc)
        .draw()
        .map_err(|e| e.to_string())?;

    for (name, color, values) in series {
        let color = *color;
        for run in present_runs(values) {
            chart
                .draw_series(LineSeries::new(run, color.stroke_width(2)))
                .map_err(|e| e.to_string())?;
        }

        chart
            .draw_series(
                values
                    .iter()
                    .enumerate()
                    .filter_map(|(i, v)| v.map(|v| Circle::new((i as f64, v), 3, color.filled()))),
            )
            .map_err(|e| e.to_string())?
            .label(*name)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_present_runs_split_on_gaps() {
        let runs = present_runs(&[Some(70.0), Some(71.0), None, None, Some(69.5), None, Some(70.2)]);
        assert_eq!(runs.len(), 3);
        assert_eq!(runs[0], vec![(0.0, 70.0), (1.0, 71.0)]);
        assert_eq!(runs[1], vec![(4.0, 69.5)]);
        assert_eq!(runs[2], vec![(6.0, 70.2)]);
        assert!(present_runs(&[None, None]).is_empty());
    }

    #[test]
    fn test_label_at() {
        let labels: Vec<String> = ["05/04", "05/05"].iter().map(|s| s.to_string()).collect();
        assert_eq!(label_at(&labels, 0.0), "05/04");
        assert_eq!(label_at(&labels, 1.0), "05/05");
        assert_eq!(label_at(&labels, 0.5), "");
        assert_eq!(label_at(&labels, -0.5), "");
        assert_eq!(label_at(&labels, 2.0), "");
    }

    #[test]
    fn test_padded_range() {
        let range = padded_range(&[Some(70.0), None, Some(80.0)]);
        assert!((range.start - 69.0).abs() < 1e-9);
        assert!((range.end - 81.0).abs() < 1e-9);
        assert_eq!(padded_range(&[None, None]), 0.0..100.0);
    }

    #[test]
    fn test_chart_kind_names() {
        let names: Vec<&str> = ChartKind::ALL.iter().map(ChartKind::name).collect();
        assert_eq!(names, ["calories", "macros", "weight", "steps", "combined"]);
        let kind: ChartKind = serde_json::from_str("\"combined\"").unwrap();
        assert_eq!(kind, ChartKind::Combined);
    }
}
