//! Path to view resolution for the owner console

/// Root path of the owner area
pub const OWNER_ROOT: &str = "/owner";

/// Panes of the owner console
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewId {
    Dashboard,
    ManageCars,
    ManageTours,
    ManageBookings,
    Reports,
    ContentManagement,
    Messages,
    EmployeeManagement,
    CustomerView,
}

impl ViewId {
    pub const ALL: [ViewId; 9] = [
        ViewId::Dashboard,
        ViewId::ManageCars,
        ViewId::ManageTours,
        ViewId::ManageBookings,
        ViewId::Reports,
        ViewId::ContentManagement,
        ViewId::Messages,
        ViewId::EmployeeManagement,
        ViewId::CustomerView,
    ];

    /// Path segment that selects this view, `None` for the dashboard root
    pub fn token(&self) -> Option<&'static str> {
        match self {
            ViewId::Dashboard => None,
            ViewId::ManageCars => Some("manage-cars"),
            ViewId::ManageTours => Some("manage-tours"),
            ViewId::ManageBookings => Some("manage-bookings"),
            ViewId::Reports => Some("reports"),
            ViewId::ContentManagement => Some("content-management"),
            ViewId::Messages => Some("messages"),
            ViewId::EmployeeManagement => Some("employee-management"),
            ViewId::CustomerView => Some("customer-view"),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ViewId::Dashboard => "Dashboard",
            ViewId::ManageCars => "Manage Cars",
            ViewId::ManageTours => "Manage Tours",
            ViewId::ManageBookings => "Manage Bookings",
            ViewId::Reports => "Reports",
            ViewId::ContentManagement => "Content Management",
            ViewId::Messages => "Messages",
            ViewId::EmployeeManagement => "Employee Management",
            ViewId::CustomerView => "Customer View",
        }
    }

    /// Canonical path used by the sidebar
    pub fn href(&self) -> String {
        match self.token() {
            Some(token) => format!("{OWNER_ROOT}/{token}"),
            None => OWNER_ROOT.to_string(),
        }
    }

    pub fn shortcut(&self) -> char {
        let index = ViewId::ALL
            .iter()
            .position(|view| view == self)
            .unwrap_or(0);
        char::from(b'1' + index as u8)
    }

    pub fn from_shortcut(key: char) -> Option<ViewId> {
        let digit = key.to_digit(10)? as usize;
        digit
            .checked_sub(1)
            .and_then(|index| ViewId::ALL.get(index).copied())
    }
}

/// Scan order for view tokens. The first token present in the path wins.
const SCAN_ORDER: [ViewId; 8] = [
    ViewId::ManageCars,
    ViewId::ManageTours,
    ViewId::ManageBookings,
    ViewId::Reports,
    ViewId::ContentManagement,
    ViewId::Messages,
    ViewId::EmployeeManagement,
    ViewId::CustomerView,
];

/// Resolve a navigation path to the active view.
///
/// Total and deterministic: unknown paths fall back to the dashboard.
pub fn resolve(path: &str) -> ViewId {
    if path == OWNER_ROOT || path == "/owner/dashboard" {
        return ViewId::Dashboard;
    }

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    SCAN_ORDER
        .iter()
        .copied()
        .find(|view| {
            view.token()
                .map(|token| segments.contains(&token))
                .unwrap_or(false)
        })
        .unwrap_or(ViewId::Dashboard)
}

/// Whether a path stays inside the owner console
pub fn is_owner_path(path: &str) -> bool {
    path == OWNER_ROOT || path.starts_with("/owner/")
}
