//! Utility to print the seven-day dashboard for a database
//!
//! Usage: dashboard_snapshot [YYYY-MM-DD] [--charts]
//!
//! With `--charts` the five PNG charts are also written to NUTRACK_CHART_DIR.

use nutrack::config::Config;
use nutrack::db::Database;
use nutrack::store::SqliteStore;
use nutrack::tools::{dashboard, parse_date};
use nutrack::tracker::Tracker;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let with_charts = args.iter().any(|a| a == "--charts");
    let date_arg = args.iter().find(|a| !a.starts_with("--")).map(String::as_str);
    let reference = parse_date(date_arg)?;

    let config = Config::from_env();
    eprintln!("Database path: {}", config.database_path.display());
    if !config.database_path.exists() {
        return Err(format!("No database at {}", config.database_path.display()).into());
    }

    let store = SqliteStore::new(Database::new(&config.database_path)?)?;
    let tracker = Tracker::open(store, reference)?;

    let snapshot = dashboard::get_dashboard(&tracker, reference);
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    if with_charts {
        let rendered = dashboard::render_dashboard_charts(&snapshot.dashboard, &[], &config.chart_dir)?;
        for chart in rendered.charts {
            eprintln!("  {} -> {}", chart.kind.name(), chart.file_path);
        }
    }

    Ok(())
}
