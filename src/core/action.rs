//! Actions that panes and menus return to the controller

/// Actions returned by menus and exporters to communicate state changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// No action needed
    None,

    /// Navigate to a path
    Navigate(String),

    /// Show notification in status bar
    Notify(String, NotifyLevel),

    /// Request a dashboard refresh
    Refresh,

    /// Sign out of the console
    Logout,
}

/// Notification levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyLevel {
    Info,
    Warn,
    Error,
}
