//! Dashboard view model types

use serde::Serialize;

/// Recent bookings and messages kept on the dashboard
pub const RECENT_LIMIT: usize = 5;

/// Cars and tours kept in the fleet snapshot
pub const FLEET_LIMIT: usize = 10;

/// Aggregate counters. Unknown values are 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub total_cars: u64,
    pub total_tours: u64,
    pub total_bookings: u64,
    pub pending_bookings: u64,
    pub total_messages: u64,
    pub new_messages: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    /// Unknown values are treated as pending
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "confirmed" => BookingStatus::Confirmed,
            "cancelled" | "canceled" => BookingStatus::Cancelled,
            "completed" => BookingStatus::Completed,
            _ => BookingStatus::Pending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentBookingEntry {
    pub id: String,
    pub customer_first_name: String,
    pub customer_last_name: String,
    pub item_name: String,
    pub total_price: f64,
    pub status: BookingStatus,
}

impl RecentBookingEntry {
    pub fn customer_name(&self) -> String {
        format!("{} {}", self.customer_first_name, self.customer_last_name)
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    New,
    Read,
}

impl MessageStatus {
    /// Anything that is not explicitly read is new
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "read" | "replied" => MessageStatus::Read,
            _ => MessageStatus::New,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MessageStatus::New => "new",
            MessageStatus::Read => "read",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentMessageEntry {
    pub id: String,
    pub sender_name: String,
    pub subject: String,
    pub status: MessageStatus,
}

/// Which fleet list a record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FleetKind {
    Car,
    Tour,
}

impl FleetKind {
    pub fn label(&self) -> &'static str {
        match self {
            FleetKind::Car => "car",
            FleetKind::Tour => "tour",
        }
    }

    pub fn other(&self) -> FleetKind {
        match self {
            FleetKind::Car => FleetKind::Tour,
            FleetKind::Tour => FleetKind::Car,
        }
    }
}

/// Shared surface of cars and tours
pub trait FleetRecord {
    fn id(&self) -> &str;
    fn available(&self) -> bool;
    fn set_available(&mut self, available: bool);
    fn display_name(&self) -> String;
    fn price(&self) -> f64;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Car {
    pub id: String,
    pub brand: String,
    pub model: String,
    pub year: Option<u32>,
    pub price_per_day: f64,
    pub available: bool,
}

impl FleetRecord for Car {
    fn id(&self) -> &str {
        &self.id
    }

    fn available(&self) -> bool {
        self.available
    }

    fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    fn display_name(&self) -> String {
        let name = format!("{} {}", self.brand, self.model).trim().to_string();
        match self.year {
            Some(year) => format!("{name} ({year})"),
            None => name,
        }
    }

    fn price(&self) -> f64 {
        self.price_per_day
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tour {
    pub id: String,
    pub title: String,
    pub destination: String,
    pub duration: String,
    pub price: f64,
    pub available: bool,
}

impl FleetRecord for Tour {
    fn id(&self) -> &str {
        &self.id
    }

    fn available(&self) -> bool {
        self.available
    }

    fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    fn display_name(&self) -> String {
        if self.destination.is_empty() {
            self.title.clone()
        } else {
            format!("{} - {}", self.title, self.destination)
        }
    }

    fn price(&self) -> f64 {
        self.price
    }
}

/// Data slices produced by one aggregation
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub summary: DashboardSummary,
    pub recent_bookings: Vec<RecentBookingEntry>,
    pub recent_messages: Vec<RecentMessageEntry>,
    pub cars: Vec<Car>,
    pub tours: Vec<Tour>,
}

impl DashboardSnapshot {
    /// Clip every list to its display limit
    pub fn truncate(&mut self) {
        self.recent_bookings.truncate(RECENT_LIMIT);
        self.recent_messages.truncate(RECENT_LIMIT);
        self.cars.truncate(FLEET_LIMIT);
        self.tours.truncate(FLEET_LIMIT);
    }

    /// Set `available` on the record with the given id. Returns false when absent.
    pub fn patch_availability(&mut self, kind: FleetKind, id: &str, available: bool) -> bool {
        let record: Option<&mut dyn FleetRecord> = match kind {
            FleetKind::Car => self
                .cars
                .iter_mut()
                .find(|car| car.id == id)
                .map(|car| car as &mut dyn FleetRecord),
            FleetKind::Tour => self
                .tours
                .iter_mut()
                .find(|tour| tour.id == id)
                .map(|tour| tour as &mut dyn FleetRecord),
        };
        match record {
            Some(record) => {
                record.set_available(available);
                true
            }
            None => false,
        }
    }

    pub fn fleet_len(&self, kind: FleetKind) -> usize {
        match kind {
            FleetKind::Car => self.cars.len(),
            FleetKind::Tour => self.tours.len(),
        }
    }

    pub fn fleet_record(&self, kind: FleetKind, index: usize) -> Option<&dyn FleetRecord> {
        match kind {
            FleetKind::Car => self.cars.get(index).map(|car| car as &dyn FleetRecord),
            FleetKind::Tour => self.tours.get(index).map(|tour| tour as &dyn FleetRecord),
        }
    }
}

/// Everything the render layer needs for the dashboard pane.
///
/// `loading` and `refreshing` are never both set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewModel {
    pub data: DashboardSnapshot,
    pub loading: bool,
    pub refreshing: bool,
    pub error: Option<String>,
}

impl ViewModel {
    pub fn is_busy(&self) -> bool {
        self.loading || self.refreshing
    }
}
