//! Export Module
//!
//! Writes the dashboard snapshot from the Reports pane.
//!
//! - 'e' key triggers export
//! - Summary and recent activity → JSON
//! - Cars and tours → CSV
//! - Files saved to <data dir>/exports/

mod csv_export;
mod json_export;

use crate::app::App;
use crate::config;
use crate::core::{Action, NotifyLevel, ViewId};
use crate::domain::DashboardSnapshot;
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the export directory path, creating it if needed
fn get_export_dir() -> std::io::Result<PathBuf> {
    let export_dir = config::data_dir()
        .map(|dir| dir.join("exports"))
        .unwrap_or_else(|| PathBuf::from(".owner-dash").join("exports"));
    fs::create_dir_all(&export_dir)?;
    Ok(export_dir)
}

/// Generate a timestamped filename
fn generate_filename(prefix: &str, extension: &str) -> String {
    let timestamp = Local::now().format("%Y-%m-%d-%H%M%S");
    format!("{}-{}.{}", prefix, timestamp, extension)
}

/// Export the dashboard if the Reports pane is active
pub fn export_current_view(app: &App) -> Action {
    if app.active_view() != ViewId::Reports {
        return Action::Notify(
            "Open Reports to export the dashboard".to_string(),
            NotifyLevel::Warn,
        );
    }

    let export_dir = match get_export_dir() {
        Ok(dir) => dir,
        Err(e) => {
            return Action::Notify(
                format!("Failed to create export directory: {}", e),
                NotifyLevel::Error,
            )
        }
    };

    export_snapshot(&export_dir, &app.model().data)
}

/// Write report JSON and fleet CSV into `dir`
pub fn export_snapshot(dir: &Path, snapshot: &DashboardSnapshot) -> Action {
    if *snapshot == DashboardSnapshot::default() {
        return Action::Notify("No dashboard data to export".to_string(), NotifyLevel::Warn);
    }

    let report_name = generate_filename("dashboard", "json");
    let fleet_name = generate_filename("fleet", "csv");
    let exported_at = Local::now().to_rfc3339();

    let rows = match json_export::write_report(&dir.join(&report_name), snapshot, &exported_at) {
        Ok(rows) => rows,
        Err(e) => return Action::Notify(format!("Export failed: {}", e), NotifyLevel::Error),
    };

    match csv_export::write_fleet(&dir.join(&fleet_name), &snapshot.cars, &snapshot.tours) {
        Ok(count) => {
            log::info!("exported dashboard to {}", dir.display());
            Action::Notify(
                format!(
                    "Exported {} activity rows to {} and {} fleet rows to {}",
                    rows, report_name, count, fleet_name
                ),
                NotifyLevel::Info,
            )
        }
        Err(e) => Action::Notify(format!("Export failed: {}", e), NotifyLevel::Error),
    }
}
