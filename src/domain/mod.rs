//! Domain layer - owner console data types
//!
//! - model: dashboard view model, fleet records
//! - normalize: lenient JSON to model conversion
//! - notifications: notification feed and badge counts
//! - session: signed-in owner display data

pub mod model;
pub mod normalize;
pub mod notifications;
pub mod session;

pub use model::{
    BookingStatus, Car, DashboardSnapshot, DashboardSummary, FleetKind, FleetRecord,
    MessageStatus, RecentBookingEntry, RecentMessageEntry, Tour, ViewModel, FLEET_LIMIT,
    RECENT_LIMIT,
};
pub use notifications::{NotificationCategory, NotificationCenter, NotificationEvent};
pub use session::{Session, UserProfile};
