//! Dashboard module - data aggregation and record availability

mod aggregator;
mod availability;

pub use aggregator::{merge, DashboardAggregator, RefreshOutcome};
pub use availability::{AvailabilityOutcome, AvailabilityRequest, AvailabilityToggler};
