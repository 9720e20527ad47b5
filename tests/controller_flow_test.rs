//! Controller state transitions driven by the in-memory backend

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use chrono::Utc;
use owner_dash::app::{App, StatusLevel};
use owner_dash::core::ViewId;
use owner_dash::domain::{
    DashboardSnapshot, DashboardSummary, FleetKind, NotificationCategory, NotificationCenter,
    NotificationEvent, Session,
};
use owner_dash::infrastructure::api::{MockDataService, MockEndpoint, MockReply};
use owner_dash::infrastructure::{RuntimeBridge, RuntimeCommand, RuntimeEvent};
use owner_dash::modules::dashboard::{
    AvailabilityOutcome, AvailabilityRequest, AvailabilityToggler, DashboardAggregator,
    RefreshOutcome,
};
use serde_json::json;

fn fleet_service() -> MockDataService {
    MockDataService::new()
        .with_cars(vec![
            json!({"_id": "c1", "brand": "Toyota", "model": "Vios", "available": true}),
            json!({"_id": "c2", "brand": "Honda", "model": "City", "available": true}),
        ])
        .with_tours(vec![json!({"_id": "t1", "title": "Island Hopping", "available": false})])
        .with_bookings(vec![json!({
            "_id": "b1",
            "customer": {"firstName": "Ana", "lastName": "Cruz"},
            "car": {"brand": "Toyota", "model": "Vios"},
            "totalPrice": 90,
            "status": "pending",
        })])
        .with_messages(vec![json!({
            "_id": "m1",
            "name": "Ben Reyes",
            "subject": "Airport pickup",
            "status": "new",
        })])
}

async fn mounted(service: Arc<MockDataService>) -> (App, DashboardAggregator) {
    let aggregator = DashboardAggregator::new(service);
    let mut app = App::new(Session::default(), "/owner");
    assert!(app.take_refresh_request(), "mount should request a refresh");
    app.refresh_with(&aggregator).await;
    (app, aggregator)
}

#[tokio::test]
async fn test_first_refresh_loads_then_later_ones_refresh() {
    let service = Arc::new(fleet_service());
    let aggregator = DashboardAggregator::new(service);

    let mut app = App::new(Session::default(), "/owner");
    assert!(app.model().loading);
    assert!(!app.model().refreshing);

    app.refresh_with(&aggregator).await;
    assert!(!app.model().loading);
    assert!(!app.model().refreshing);
    assert_eq!(app.model().data.cars.len(), 2);
    assert_eq!(app.model().data.summary.total_cars, 2);

    app.request_refresh();
    assert!(app.model().refreshing);
    assert!(!app.model().loading, "loading and refreshing are never both set");
}

#[tokio::test]
async fn test_transport_failure_resets_the_view_model() {
    let service = Arc::new(fleet_service());
    let (mut app, aggregator) = mounted(service.clone()).await;
    assert!(!app.model().data.cars.is_empty());

    service
        .push_reply(MockEndpoint::Tours, MockReply::Unavailable("timeout".into()))
        .await;
    app.refresh_with(&aggregator).await;

    let model = app.model();
    assert_eq!(model.data.summary, DashboardSummary::default());
    assert!(model.data.recent_bookings.is_empty());
    assert!(model.data.recent_messages.is_empty());
    assert!(model.data.cars.is_empty());
    assert!(model.error.as_deref().is_some_and(|e| e.contains("timeout")));
    assert!(!model.loading);
    assert!(!model.refreshing);
    assert_eq!(app.notifications().unread_count(NotificationCategory::System), 1);

    // Next successful refresh clears the error
    app.refresh_with(&aggregator).await;
    assert!(app.model().error.is_none());
    assert_eq!(app.model().data.cars.len(), 2);
}

#[test]
fn test_success_after_failure_clears_error() {
    let mut app = App::new(Session::default(), "/owner");
    assert!(app.take_refresh_request());
    app.request_refresh();

    app.finish_refresh(RefreshOutcome::Failed(
        "Failed to load dashboard data: timeout".to_string(),
    ));
    assert!(app.model().error.is_some());

    app.finish_refresh(RefreshOutcome::Loaded(DashboardSnapshot {
        summary: DashboardSummary {
            total_cars: 7,
            ..Default::default()
        },
        ..Default::default()
    }));
    assert_eq!(app.model().error, None);
    assert_eq!(app.model().data.summary.total_cars, 7);
    assert!(!app.model().loading);
    assert!(!app.model().refreshing);
}

#[tokio::test]
async fn test_archive_patches_locally_before_refetch() {
    let service = Arc::new(fleet_service());
    let (mut app, _aggregator) = mounted(service.clone()).await;
    assert!(app.model().data.cars[0].available);

    app.toggle_selected_availability();
    let request = app
        .take_availability_request()
        .expect("selected car should be queued");
    assert_eq!(request, AvailabilityRequest::new(FleetKind::Car, "c1", false));

    let outcome = AvailabilityToggler::new(service.clone())
        .set_availability(request)
        .await;
    app.apply_availability(outcome);

    // Step 1 happened without any refetch
    assert!(!app.model().data.cars[0].available);
    assert!(app.model().data.cars[1].available);
    assert_eq!(service.call_count(MockEndpoint::Cars).await, 1);
    // Step 2 is queued
    assert!(app.take_refresh_request());
    assert_eq!(
        service.stored_availability(FleetKind::Car, "c1").await,
        Some(false)
    );
}

#[tokio::test]
async fn test_restore_tour() {
    let service = Arc::new(fleet_service());
    let (mut app, aggregator) = mounted(service.clone()).await;

    app.switch_fleet_focus();
    app.toggle_selected_availability();
    let request = app.take_availability_request().expect("tour queued");
    assert!(request.available);

    let outcome = AvailabilityToggler::new(service.clone())
        .set_availability(request)
        .await;
    app.apply_availability(outcome);
    assert!(app.model().data.tours[0].available);

    app.take_refresh_request();
    app.refresh_with(&aggregator).await;
    assert!(app.model().data.tours[0].available);
    assert_eq!(app.model().data.summary.total_tours, 1);
}

#[tokio::test]
async fn test_failed_update_leaves_snapshot_and_error_untouched() {
    let service = Arc::new(
        fleet_service().script(
            MockEndpoint::UpdateCar,
            MockReply::Unavailable("connection reset".into()),
        ),
    );
    let (mut app, _aggregator) = mounted(service.clone()).await;
    let before = app.model().data.clone();

    app.toggle_selected_availability();
    let request = app.take_availability_request().expect("queued");
    let outcome = AvailabilityToggler::new(service.clone())
        .set_availability(request)
        .await;
    assert!(matches!(outcome, AvailabilityOutcome::Failed { .. }));
    app.apply_availability(outcome);

    assert_eq!(app.model().data, before);
    assert!(app.model().error.is_none());
    assert!(!app.take_refresh_request(), "failed update must not resync");
    let (text, level) = app.status_text().expect("warning shown");
    assert_eq!(level, StatusLevel::Warn);
    assert!(text.contains("connection reset"));
}

#[tokio::test]
async fn test_update_for_missing_record_is_a_failure() {
    let service = Arc::new(fleet_service());
    let (mut app, _aggregator) = mounted(service.clone()).await;
    let outcome = AvailabilityToggler::new(service)
        .set_availability(AvailabilityRequest::new(FleetKind::Car, "gone", false))
        .await;
    app.apply_availability(outcome);
    assert!(app.model().error.is_none());
    assert_eq!(app.status_text().map(|(_, level)| level), Some(StatusLevel::Warn));
}

#[tokio::test]
async fn test_refresh_announces_pending_bookings_and_new_messages_once() {
    let service = Arc::new(fleet_service());
    let (mut app, aggregator) = mounted(service).await;

    assert_eq!(app.nav_badge(ViewId::ManageBookings), Some(1));
    assert_eq!(app.nav_badge(ViewId::Messages), Some(1));
    assert_eq!(app.notifications().unread_total(), 2);
    let messages: Vec<&str> = app
        .notifications()
        .list()
        .iter()
        .map(|event| event.message.as_str())
        .collect();
    assert!(messages.contains(&"New booking from Ana Cruz for Toyota Vios"));
    assert!(messages.contains(&"New message from Ben Reyes: Airport pickup"));

    app.request_refresh();
    app.take_refresh_request();
    app.refresh_with(&aggregator).await;
    assert_eq!(app.notifications().len(), 2);

    app.mark_all_read();
    assert_eq!(app.nav_badge(ViewId::ManageBookings), Some(0));
    assert_eq!(app.nav_badge(ViewId::Messages), Some(0));
}

#[test]
fn test_badge_counts_from_mixed_list() {
    let now = Utc::now();
    let mut center = NotificationCenter::new();
    center.insert(NotificationEvent::new(1, NotificationCategory::Booking, "b", now));
    center.insert(NotificationEvent::new(2, NotificationCategory::Message, "m", now));
    let mut system = NotificationEvent::new(3, NotificationCategory::System, "s", now);
    system.read = true;
    center.insert(system);

    assert_eq!(center.unread_count(NotificationCategory::Booking), 1);
    assert_eq!(center.unread_count(NotificationCategory::Message), 1);
    assert_eq!(center.unread_count(NotificationCategory::System), 0);

    center.mark_all_read();
    center.mark_all_read();
    assert_eq!(center.unread_count(NotificationCategory::Booking), 0);
    assert_eq!(center.unread_count(NotificationCategory::Message), 0);
    assert_eq!(center.len(), 3);
}

#[test]
fn test_exactly_one_refresh_per_entry_into_dashboard() {
    let mut app = App::new(Session::default(), "/owner/reports");
    assert!(!app.take_refresh_request());

    app.navigate("/owner");
    assert!(app.take_refresh_request());
    assert!(!app.take_refresh_request());

    // Already on the dashboard
    app.navigate("/owner/dashboard");
    assert!(!app.take_refresh_request());

    app.navigate("/owner/manage-cars");
    assert!(!app.take_refresh_request());
    app.navigate_to(ViewId::Dashboard);
    assert!(app.take_refresh_request());
}

/// Drive the controller the way the binary does, through the runtime bridge
fn pump_until(app: &mut App, bridge: &RuntimeBridge, settled: usize) -> Vec<u64> {
    let deadline = Instant::now() + Duration::from_secs(5);
    let mut applied = Vec::new();
    while applied.len() < settled && Instant::now() < deadline {
        for event in bridge.poll_events() {
            if let RuntimeEvent::RefreshFinished(outcome) = event {
                app.finish_refresh(outcome);
                applied.push(app.model().data.summary.total_cars);
            }
        }
        thread::sleep(Duration::from_millis(10));
    }
    applied
}

#[test]
fn test_overlapping_refreshes_last_settled_wins() {
    let slow = json!({"success": true, "data": {"summary": {"totalCars": 1}}});
    let fast = json!({"success": true, "data": {"summary": {"totalCars": 2}}});
    let service = Arc::new(
        MockDataService::new()
            .script(
                MockEndpoint::Analytics,
                MockReply::DelayedBody(Duration::from_millis(300), slow),
            )
            .script(MockEndpoint::Analytics, MockReply::Body(fast)),
    );
    let bridge = RuntimeBridge::new(service, 10).expect("runtime");

    let mut app = App::new(Session::default(), "/owner");
    assert!(app.take_refresh_request());
    bridge.send(RuntimeCommand::Refresh).expect("send");
    app.request_refresh();
    assert!(app.take_refresh_request());
    bridge.send(RuntimeCommand::Refresh).expect("send");

    let applied = pump_until(&mut app, &bridge, 2);
    assert_eq!(applied, vec![2, 1], "completions apply in settle order");
    assert_eq!(app.model().data.summary.total_cars, 1);
    assert!(!app.model().loading);
    assert!(!app.model().refreshing);
}
