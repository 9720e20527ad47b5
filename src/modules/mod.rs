//! Console modules
//!
//! - dashboard: data aggregation and archive/restore of fleet records
//! - export: JSON/CSV export of the dashboard (Reports pane)

pub mod dashboard;
pub mod export;
