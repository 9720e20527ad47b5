//! Dashboard data aggregation
//!
//! One aggregation issues the analytics, car list and tour list requests
//! concurrently and waits for all three before merging. Each successful,
//! well-formed response fills its slice of the snapshot; a malformed or
//! `success: false` response leaves that slice at its default. A transport
//! failure on any request fails the whole aggregation.

use std::sync::Arc;

use crate::domain::normalize::{bookings_from, cars_from, messages_from, summary_from, tours_from};
use crate::domain::{DashboardSnapshot, FLEET_LIMIT};
use crate::infrastructure::api::{ApiEnvelope, DataService, PageRequest};

/// Result of one aggregation, applied by the controller
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    Loaded(DashboardSnapshot),
    Failed(String),
}

pub struct DashboardAggregator {
    service: Arc<dyn DataService>,
    page: PageRequest,
}

impl DashboardAggregator {
    pub fn new(service: Arc<dyn DataService>) -> Self {
        Self::with_page_limit(service, FLEET_LIMIT as u32)
    }

    pub fn with_page_limit(service: Arc<dyn DataService>, limit: u32) -> Self {
        Self {
            service,
            page: PageRequest::first(limit.max(1)),
        }
    }

    pub async fn aggregate(&self) -> RefreshOutcome {
        let (analytics, cars, tours) = futures::join!(
            self.service.fetch_dashboard_analytics(),
            self.service.fetch_all_cars(self.page),
            self.service.fetch_all_tours(self.page),
        );

        match (analytics, cars, tours) {
            (Ok(analytics), Ok(cars), Ok(tours)) => {
                RefreshOutcome::Loaded(merge(&analytics, &cars, &tours))
            }
            (analytics, cars, tours) => {
                let err = [analytics.err(), cars.err(), tours.err()]
                    .into_iter()
                    .flatten()
                    .next();
                let message = match err {
                    Some(err) => {
                        log::warn!("dashboard refresh failed: {err}");
                        format!("Failed to load dashboard data: {err}")
                    }
                    None => "Failed to load dashboard data".to_string(),
                };
                RefreshOutcome::Failed(message)
            }
        }
    }
}

/// Merge three settled responses into a snapshot
pub fn merge(analytics: &ApiEnvelope, cars: &ApiEnvelope, tours: &ApiEnvelope) -> DashboardSnapshot {
    let mut snapshot = DashboardSnapshot::default();

    if analytics.success {
        match summary_from(&analytics.data) {
            Some(summary) => snapshot.summary = summary,
            None => log::debug!("analytics response has no summary object"),
        }
        snapshot.recent_bookings = bookings_from(&analytics.data);
        snapshot.recent_messages = messages_from(&analytics.data);
    } else {
        log::debug!(
            "analytics response not successful: {}",
            analytics.message.as_deref().unwrap_or("no message")
        );
    }

    if cars.success {
        snapshot.cars = cars_from(&cars.data).unwrap_or_default();
    }
    if tours.success {
        snapshot.tours = tours_from(&tours.data).unwrap_or_default();
    }

    snapshot.truncate();
    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_skips_unsuccessful_slices() {
        let analytics = ApiEnvelope::ok(json!({
            "summary": {"totalCars": 3},
            "recentBookings": [{"_id": "b1"}],
        }));
        let cars = ApiEnvelope::failed("nope");
        let tours = ApiEnvelope::ok(json!([{"_id": "t1", "title": "Reef"}]));

        let snapshot = merge(&analytics, &cars, &tours);
        assert_eq!(snapshot.summary.total_cars, 3);
        assert_eq!(snapshot.recent_bookings.len(), 1);
        assert!(snapshot.cars.is_empty());
        assert_eq!(snapshot.tours.len(), 1);
    }

    #[test]
    fn test_merge_ignores_data_of_failed_envelope() {
        let mut analytics = ApiEnvelope::ok(json!({"summary": {"totalCars": 9}}));
        analytics.success = false;
        let empty = ApiEnvelope::ok(json!([]));
        let snapshot = merge(&analytics, &empty, &empty);
        assert_eq!(snapshot.summary.total_cars, 0);
    }

    #[test]
    fn test_merge_non_list_fleet_payload() {
        let analytics = ApiEnvelope::ok(json!({}));
        let cars = ApiEnvelope::ok(json!({"unexpected": true}));
        let tours = ApiEnvelope::ok(json!(null));
        let snapshot = merge(&analytics, &cars, &tours);
        assert_eq!(snapshot, DashboardSnapshot::default());
    }
}
