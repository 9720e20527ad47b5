use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use chrono::Utc;

use crate::core::{is_owner_path, resolve, Action, NotifyLevel, ViewId, OWNER_ROOT};
use crate::domain::{
    BookingStatus, DashboardSnapshot, FleetKind, MessageStatus, NotificationCategory,
    NotificationCenter, Session, ViewModel,
};
use crate::modules::dashboard::{
    AvailabilityOutcome, AvailabilityRequest, DashboardAggregator, RefreshOutcome,
};

const STATUS_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub level: StatusLevel,
    pub since: Instant,
}

/// Entries of the user menu in the top bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserMenuItem {
    Profile,
    CustomerSite,
    SignOut,
}

impl UserMenuItem {
    pub const ALL: [UserMenuItem; 3] = [
        UserMenuItem::Profile,
        UserMenuItem::CustomerSite,
        UserMenuItem::SignOut,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            UserMenuItem::Profile => "Profile Settings",
            UserMenuItem::CustomerSite => "View Customer Site",
            UserMenuItem::SignOut => "Sign Out",
        }
    }

    pub fn key(&self) -> char {
        match self {
            UserMenuItem::Profile => 'p',
            UserMenuItem::CustomerSite => 'c',
            UserMenuItem::SignOut => 'o',
        }
    }

    pub fn action(&self) -> Action {
        match self {
            UserMenuItem::Profile => Action::Navigate("/owner/profile".to_string()),
            UserMenuItem::CustomerSite => Action::Navigate("/customer-dashboard".to_string()),
            UserMenuItem::SignOut => Action::Logout,
        }
    }
}

/// Owner console controller.
///
/// Owns the view model, the notification feed and all pane toggles. Async work
/// is requested through the `pending_*` slots and its results come back through
/// `finish_refresh` and `apply_availability`.
#[derive(Debug)]
pub struct App {
    path: String,
    active_view: ViewId,
    model: ViewModel,
    refresh_started: bool,
    notifications: NotificationCenter,
    session: Session,
    pub sidebar_open: bool,
    pub user_menu_open: bool,
    pub notifications_open: bool,
    pub dark_mode: bool,
    pub help_open: bool,
    fleet_focus: FleetKind,
    selected_car: usize,
    selected_tour: usize,
    pub status: Option<StatusMessage>,
    pending_refresh_request: bool,
    pending_availability_request: Option<AvailabilityRequest>,
    announced_bookings: BTreeSet<String>,
    announced_messages: BTreeSet<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(session: Session, start_path: &str) -> Self {
        let path = if is_owner_path(start_path) {
            start_path.to_string()
        } else {
            log::warn!("start path {start_path} is outside the owner area, using {OWNER_ROOT}");
            OWNER_ROOT.to_string()
        };
        let active_view = resolve(&path);

        let mut app = Self {
            path,
            active_view,
            model: ViewModel::default(),
            refresh_started: false,
            notifications: NotificationCenter::new(),
            session,
            sidebar_open: false,
            user_menu_open: false,
            notifications_open: false,
            dark_mode: false,
            help_open: false,
            fleet_focus: FleetKind::Car,
            selected_car: 0,
            selected_tour: 0,
            status: None,
            pending_refresh_request: false,
            pending_availability_request: None,
            announced_bookings: BTreeSet::new(),
            announced_messages: BTreeSet::new(),
            should_quit: false,
        };
        // Initial mount counts as a transition into the dashboard
        if app.active_view == ViewId::Dashboard {
            app.request_refresh();
        }
        app
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn active_view(&self) -> ViewId {
        self.active_view
    }

    pub fn model(&self) -> &ViewModel {
        &self.model
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Top bar title for the current pane
    pub fn title(&self) -> &'static str {
        self.active_view.title()
    }

    pub fn navigate(&mut self, path: &str) {
        let previous = self.active_view;
        self.path = path.to_string();
        self.sidebar_open = false;
        self.user_menu_open = false;
        self.notifications_open = false;

        if !is_owner_path(path) {
            log::info!("leaving owner console for {path}");
            self.should_quit = true;
            return;
        }

        self.active_view = resolve(path);
        log::debug!("navigate {path} -> {:?}", self.active_view);
        if self.active_view == ViewId::Dashboard && previous != ViewId::Dashboard {
            self.request_refresh();
        }
    }

    pub fn navigate_to(&mut self, view: ViewId) {
        self.navigate(&view.href());
    }

    // --- dashboard data -------------------------------------------------

    /// Mark a refresh as in flight and queue it for the worker
    pub fn request_refresh(&mut self) {
        self.begin_refresh();
        self.pending_refresh_request = true;
    }

    fn begin_refresh(&mut self) {
        self.model.error = None;
        if self.refresh_started {
            self.model.loading = false;
            self.model.refreshing = true;
        } else {
            self.refresh_started = true;
            self.model.loading = true;
            self.model.refreshing = false;
        }
        log::info!("dashboard refresh started");
    }

    pub fn take_refresh_request(&mut self) -> bool {
        if self.pending_refresh_request {
            self.pending_refresh_request = false;
            true
        } else {
            false
        }
    }

    /// Apply a settled aggregation. Completions are applied in arrival order.
    pub fn finish_refresh(&mut self, outcome: RefreshOutcome) {
        self.model.loading = false;
        self.model.refreshing = false;

        match outcome {
            RefreshOutcome::Loaded(snapshot) => {
                log::info!(
                    "dashboard refreshed: {} cars, {} tours",
                    snapshot.cars.len(),
                    snapshot.tours.len()
                );
                self.announce(&snapshot);
                self.model.data = snapshot;
                self.model.error = None;
                self.clamp_selection();
            }
            RefreshOutcome::Failed(message) => {
                log::warn!("{message}");
                self.model.data = DashboardSnapshot::default();
                // Repeated failures collapse into the unread one on top
                let repeated = self
                    .notifications
                    .latest_unread()
                    .is_some_and(|event| {
                        event.category == NotificationCategory::System && event.message == message
                    });
                if !repeated {
                    self.notifications
                        .push(NotificationCategory::System, message.clone(), Utc::now());
                }
                self.model.error = Some(message);
                self.clamp_selection();
            }
        }
    }

    /// Run one refresh inline on the caller's runtime
    pub async fn refresh_with(&mut self, aggregator: &DashboardAggregator) {
        self.begin_refresh();
        let outcome = aggregator.aggregate().await;
        self.finish_refresh(outcome);
    }

    /// Push notifications for pending bookings and new messages seen for the first time
    fn announce(&mut self, snapshot: &DashboardSnapshot) {
        let now = Utc::now();
        // Only ids still in the recent lists can be seen again
        self.announced_bookings
            .retain(|id| snapshot.recent_bookings.iter().any(|b| &b.id == id));
        self.announced_messages
            .retain(|id| snapshot.recent_messages.iter().any(|m| &m.id == id));
        // Oldest first so the newest entry ends up at the front
        for booking in snapshot.recent_bookings.iter().rev() {
            if booking.status != BookingStatus::Pending
                || !self.announced_bookings.insert(booking.id.clone())
            {
                continue;
            }
            let customer = booking.customer_name();
            let message = match (customer.is_empty(), booking.item_name.is_empty()) {
                (false, false) => format!("New booking from {customer} for {}", booking.item_name),
                (false, true) => format!("New booking from {customer}"),
                _ => "New booking received".to_string(),
            };
            self.notifications
                .push(NotificationCategory::Booking, message, now);
        }
        for entry in snapshot.recent_messages.iter().rev() {
            if entry.status != MessageStatus::New
                || !self.announced_messages.insert(entry.id.clone())
            {
                continue;
            }
            let message = if entry.sender_name.is_empty() {
                format!("New message: {}", entry.subject)
            } else {
                format!("New message from {}: {}", entry.sender_name, entry.subject)
            };
            self.notifications
                .push(NotificationCategory::Message, message, now);
        }
    }

    // --- archive / restore ----------------------------------------------

    /// Queue an archive/restore of the selected fleet row
    pub fn toggle_selected_availability(&mut self) {
        if self.active_view != ViewId::Dashboard {
            return;
        }
        let kind = self.fleet_focus;
        let Some(record) = self
            .model
            .data
            .fleet_record(kind, self.selected_index(kind))
        else {
            self.set_status(format!("No {} selected", kind.label()), StatusLevel::Warn);
            return;
        };

        let request = AvailabilityRequest::new(kind, record.id(), !record.available());
        let progress = if request.available { "Restoring" } else { "Archiving" };
        let text = format!("{progress} {}...", record.display_name());
        self.pending_availability_request = Some(request);
        self.set_status(text, StatusLevel::Info);
    }

    pub fn take_availability_request(&mut self) -> Option<AvailabilityRequest> {
        self.pending_availability_request.take()
    }

    /// Step 1 of a successful update: patch the local record in place
    pub fn patch_availability(&mut self, request: &AvailabilityRequest) -> bool {
        let patched = self
            .model
            .data
            .patch_availability(request.kind, &request.id, request.available);
        if !patched {
            log::debug!("{} {} not in snapshot, nothing to patch", request.kind.label(), request.id);
        }
        patched
    }

    /// Step 2 of a successful update: ask for an authoritative refetch
    pub fn request_resync(&mut self) {
        self.request_refresh();
    }

    pub fn apply_availability(&mut self, outcome: AvailabilityOutcome) {
        match outcome {
            AvailabilityOutcome::Applied(request) => {
                self.patch_availability(&request);
                self.request_resync();
                self.set_status(
                    format!("{} {}d", capitalize(request.kind.label()), request.verb()),
                    StatusLevel::Info,
                );
            }
            AvailabilityOutcome::Failed { request, message } => {
                log::warn!(
                    "{} {} {} failed: {message}",
                    request.kind.label(),
                    request.id,
                    request.verb()
                );
                self.set_status(
                    format!("Could not {} {}: {message}", request.verb(), request.kind.label()),
                    StatusLevel::Warn,
                );
            }
        }
    }

    // --- fleet selection ------------------------------------------------

    pub fn fleet_focus(&self) -> FleetKind {
        self.fleet_focus
    }

    pub fn switch_fleet_focus(&mut self) {
        self.fleet_focus = self.fleet_focus.other();
    }

    pub fn selected_index(&self, kind: FleetKind) -> usize {
        match kind {
            FleetKind::Car => self.selected_car,
            FleetKind::Tour => self.selected_tour,
        }
    }

    pub fn move_selection(&mut self, delta: isize) {
        let len = self.model.data.fleet_len(self.fleet_focus);
        let slot = match self.fleet_focus {
            FleetKind::Car => &mut self.selected_car,
            FleetKind::Tour => &mut self.selected_tour,
        };
        if len == 0 {
            *slot = 0;
            return;
        }
        let next = (*slot as isize + delta).clamp(0, len as isize - 1);
        *slot = next as usize;
    }

    fn clamp_selection(&mut self) {
        let cars = self.model.data.cars.len();
        let tours = self.model.data.tours.len();
        self.selected_car = self.selected_car.min(cars.saturating_sub(1));
        self.selected_tour = self.selected_tour.min(tours.saturating_sub(1));
    }

    // --- toggles and overlays -------------------------------------------

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_open = !self.sidebar_open;
    }

    pub fn toggle_user_menu(&mut self) {
        self.user_menu_open = !self.user_menu_open;
        if self.user_menu_open {
            self.notifications_open = false;
        }
    }

    pub fn toggle_notifications(&mut self) {
        self.notifications_open = !self.notifications_open;
        if self.notifications_open {
            self.user_menu_open = false;
        }
    }

    pub fn toggle_dark_mode(&mut self) {
        self.dark_mode = !self.dark_mode;
    }

    pub fn toggle_help(&mut self) {
        self.help_open = !self.help_open;
    }

    /// Close the top-most overlay. Returns false when nothing was open.
    pub fn close_overlay(&mut self) -> bool {
        if self.help_open {
            self.help_open = false;
        } else if self.user_menu_open {
            self.user_menu_open = false;
        } else if self.notifications_open {
            self.notifications_open = false;
        } else if self.sidebar_open {
            self.sidebar_open = false;
        } else {
            return false;
        }
        true
    }

    pub fn mark_all_read(&mut self) {
        self.notifications.mark_all_read();
    }

    /// Sidebar badge for a pane, `None` for panes without one
    pub fn nav_badge(&self, view: ViewId) -> Option<usize> {
        match view {
            ViewId::ManageBookings => {
                Some(self.notifications.unread_count(NotificationCategory::Booking))
            }
            ViewId::Messages => Some(self.notifications.unread_count(NotificationCategory::Message)),
            _ => None,
        }
    }

    pub fn select_user_menu_item(&mut self, item: UserMenuItem) {
        self.user_menu_open = false;
        self.apply_action(item.action());
    }

    pub fn logout(&mut self) {
        log::info!("signing out");
        self.session.logout();
        self.navigate("/");
    }

    // --- status line ----------------------------------------------------

    pub fn set_status(&mut self, text: impl Into<String>, level: StatusLevel) {
        self.status = Some(StatusMessage {
            text: text.into(),
            level,
            since: Instant::now(),
        });
    }

    pub fn status_text(&self) -> Option<(&str, StatusLevel)> {
        self.status
            .as_ref()
            .map(|status| (status.text.as_str(), status.level))
    }

    pub fn on_tick(&mut self) {
        if let Some(status) = self.status.as_ref() {
            if status.since.elapsed() > STATUS_TTL {
                self.status = None;
            }
        }
    }

    /// Apply an action returned by a menu or exporter
    pub fn apply_action(&mut self, action: Action) {
        match action {
            Action::None => {}
            Action::Navigate(path) => self.navigate(&path),
            Action::Notify(msg, level) => {
                let level = match level {
                    NotifyLevel::Info => StatusLevel::Info,
                    NotifyLevel::Warn => StatusLevel::Warn,
                    NotifyLevel::Error => StatusLevel::Error,
                };
                self.set_status(msg, level);
            }
            Action::Refresh => self.request_refresh(),
            Action::Logout => self.logout(),
        }
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Car, RecentBookingEntry, RecentMessageEntry};

    fn car(id: &str, available: bool) -> Car {
        Car {
            id: id.to_string(),
            brand: "Honda".to_string(),
            model: "City".to_string(),
            year: None,
            price_per_day: 30.0,
            available,
        }
    }

    fn loaded_app() -> App {
        let mut app = App::new(Session::default(), "/owner");
        app.take_refresh_request();
        app.finish_refresh(RefreshOutcome::Loaded(DashboardSnapshot {
            cars: vec![car("c1", true), car("c2", false)],
            ..Default::default()
        }));
        app
    }

    #[test]
    fn test_mount_on_dashboard_requests_refresh() {
        let mut app = App::new(Session::default(), "/owner/dashboard");
        assert!(app.model().loading);
        assert!(!app.model().refreshing);
        assert!(app.take_refresh_request());
        assert!(!app.take_refresh_request());
    }

    #[test]
    fn test_mount_elsewhere_does_not_refresh() {
        let mut app = App::new(Session::default(), "/owner/reports");
        assert_eq!(app.active_view(), ViewId::Reports);
        assert!(!app.take_refresh_request());
        assert!(!app.model().loading);
    }

    #[test]
    fn test_outside_start_path_falls_back_to_root() {
        let app = App::new(Session::default(), "/admin");
        assert_eq!(app.path(), OWNER_ROOT);
        assert_eq!(app.active_view(), ViewId::Dashboard);
    }

    #[test]
    fn test_second_refresh_sets_refreshing() {
        let mut app = loaded_app();
        app.request_refresh();
        assert!(app.model().refreshing);
        assert!(!app.model().loading);
    }

    #[test]
    fn test_toggle_selected_queues_inverse_availability() {
        let mut app = loaded_app();
        app.toggle_selected_availability();
        let request = app.take_availability_request().unwrap();
        assert_eq!(request, AvailabilityRequest::new(FleetKind::Car, "c1", false));

        app.move_selection(1);
        app.toggle_selected_availability();
        let request = app.take_availability_request().unwrap();
        assert_eq!(request, AvailabilityRequest::new(FleetKind::Car, "c2", true));
    }

    #[test]
    fn test_toggle_without_rows_warns() {
        let mut app = loaded_app();
        app.switch_fleet_focus();
        app.toggle_selected_availability();
        assert!(app.take_availability_request().is_none());
        assert_eq!(app.status_text().map(|(_, level)| level), Some(StatusLevel::Warn));
    }

    #[test]
    fn test_selection_is_clamped() {
        let mut app = loaded_app();
        app.move_selection(10);
        assert_eq!(app.selected_index(FleetKind::Car), 1);
        app.move_selection(-10);
        assert_eq!(app.selected_index(FleetKind::Car), 0);
    }

    #[test]
    fn test_announce_only_once_per_id() {
        let mut app = loaded_app();
        let snapshot = DashboardSnapshot {
            recent_bookings: vec![RecentBookingEntry {
                id: "b1".to_string(),
                customer_first_name: "Ana".to_string(),
                customer_last_name: "Cruz".to_string(),
                item_name: "Toyota Vios".to_string(),
                total_price: 120.0,
                status: BookingStatus::Pending,
            }],
            recent_messages: vec![RecentMessageEntry {
                id: "m1".to_string(),
                sender_name: "Ben".to_string(),
                subject: "Pickup time".to_string(),
                status: MessageStatus::Read,
            }],
            ..Default::default()
        };
        app.finish_refresh(RefreshOutcome::Loaded(snapshot.clone()));
        app.finish_refresh(RefreshOutcome::Loaded(snapshot));

        assert_eq!(app.notifications().len(), 1);
        assert_eq!(
            app.notifications().list()[0].message,
            "New booking from Ana Cruz for Toyota Vios"
        );
        assert_eq!(app.nav_badge(ViewId::ManageBookings), Some(1));
        assert_eq!(app.nav_badge(ViewId::Messages), Some(0));
        assert_eq!(app.nav_badge(ViewId::Reports), None);
    }

    #[test]
    fn test_repeated_failures_collapse_into_one_notification() {
        let mut app = loaded_app();
        for _ in 0..5 {
            app.request_refresh();
            app.finish_refresh(RefreshOutcome::Failed("Failed to load dashboard data".to_string()));
        }
        assert_eq!(app.notifications().len(), 1);
        assert_eq!(app.notifications().unread_total(), 1);

        // Once read, the next failure is news again
        app.mark_all_read();
        app.finish_refresh(RefreshOutcome::Failed("Failed to load dashboard data".to_string()));
        assert_eq!(app.notifications().len(), 2);

        app.finish_refresh(RefreshOutcome::Failed("timeout".to_string()));
        assert_eq!(app.notifications().len(), 3);
        assert_eq!(app.notifications().list()[0].category, NotificationCategory::System);
    }

    #[test]
    fn test_announced_ids_follow_the_recent_lists() {
        let mut app = loaded_app();
        let booking = |id: &str| RecentBookingEntry {
            id: id.to_string(),
            customer_first_name: "Ana".to_string(),
            customer_last_name: String::new(),
            item_name: String::new(),
            total_price: 0.0,
            status: BookingStatus::Pending,
        };
        for id in ["b1", "b2", "b3"] {
            app.finish_refresh(RefreshOutcome::Loaded(DashboardSnapshot {
                recent_bookings: vec![booking(id)],
                ..Default::default()
            }));
        }
        assert_eq!(app.notifications().len(), 3);
        assert_eq!(app.announced_bookings.len(), 1);
        assert!(app.announced_bookings.contains("b3"));
        assert!(app.announced_messages.is_empty());
    }

    #[test]
    fn test_user_menu_and_notifications_are_exclusive() {
        let mut app = loaded_app();
        app.toggle_user_menu();
        app.toggle_notifications();
        assert!(app.notifications_open);
        assert!(!app.user_menu_open);
        assert!(app.close_overlay());
        assert!(!app.close_overlay());
    }

    #[test]
    fn test_sign_out_quits() {
        let mut app = loaded_app();
        app.toggle_user_menu();
        app.select_user_menu_item(UserMenuItem::SignOut);
        assert!(!app.session().is_signed_in());
        assert!(app.should_quit);
        assert_eq!(app.path(), "/");
    }

    #[test]
    fn test_status_expires() {
        let mut app = loaded_app();
        app.set_status("hello", StatusLevel::Info);
        app.on_tick();
        assert!(app.status.is_some());
        if let Some(status) = app.status.as_mut() {
            status.since = Instant::now() - Duration::from_secs(5);
        }
        app.on_tick();
        assert!(app.status.is_none());
    }
}
