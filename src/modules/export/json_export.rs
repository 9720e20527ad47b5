//! JSON Export
//!
//! Writes summary counters and recent activity to a JSON file.

use crate::domain::{DashboardSnapshot, DashboardSummary, RecentBookingEntry, RecentMessageEntry};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportableReport<'a> {
    exported_at: String,
    summary: &'a DashboardSummary,
    recent_bookings: &'a [RecentBookingEntry],
    recent_messages: &'a [RecentMessageEntry],
}

/// Write the report; returns the number of activity rows written
pub fn write_report(
    path: &Path,
    snapshot: &DashboardSnapshot,
    exported_at: &str,
) -> Result<usize, Box<dyn std::error::Error>> {
    let report = ExportableReport {
        exported_at: exported_at.to_string(),
        summary: &snapshot.summary,
        recent_bookings: &snapshot.recent_bookings,
        recent_messages: &snapshot.recent_messages,
    };

    let json = serde_json::to_string_pretty(&report)?;
    let mut file = File::create(path)?;
    file.write_all(json.as_bytes())?;
    file.write_all(b"\n")?;

    Ok(snapshot.recent_bookings.len() + snapshot.recent_messages.len())
}
