//! In-memory backend for `--mock` mode and tests.
//!
//! Holds car, tour, booking and message fixtures as raw JSON so that the
//! normalization path is exercised exactly as with the HTTP backend. Analytics
//! are computed from the fixtures on every call, so archiving a car changes
//! the summary after the next refresh. Replies can be scripted per endpoint to
//! simulate failures, malformed payloads and slow responses.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Mutex;

use super::service::{ApiEnvelope, AvailabilityPatch, DataService, PageRequest, ServiceError};
use crate::domain::FleetKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockEndpoint {
    Analytics,
    Cars,
    Tours,
    UpdateCar,
    UpdateTour,
}

/// One scripted reply, consumed by the next call to its endpoint
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Return this body instead of the computed one
    Body(Value),
    /// Fail at the transport level
    Unavailable(String),
    /// Wait, then compute the normal reply
    Delay(Duration),
    /// Wait, then return this body
    DelayedBody(Duration, Value),
}

#[derive(Debug, Default)]
struct MockState {
    cars: Vec<Value>,
    tours: Vec<Value>,
    bookings: Vec<Value>,
    messages: Vec<Value>,
    scripted: HashMap<MockEndpoint, VecDeque<MockReply>>,
    calls: HashMap<MockEndpoint, usize>,
}

pub struct MockDataService {
    state: Mutex<MockState>,
    latency: Duration,
}

impl MockDataService {
    /// Empty backend: every list is empty, every call succeeds
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState::default()),
            latency: Duration::ZERO,
        }
    }

    /// Demo fleet with more rows than the dashboard shows
    pub fn demo() -> Self {
        let brands = [
            ("Toyota", "Vios"),
            ("Honda", "City"),
            ("Mitsubishi", "Montero"),
            ("Ford", "Ranger"),
            ("Nissan", "Navara"),
            ("Hyundai", "Accent"),
        ];
        let cars = (0..12)
            .map(|i| {
                let (brand, model) = brands[i % brands.len()];
                json!({
                    "_id": format!("car-{:02}", i + 1),
                    "brand": brand,
                    "model": model,
                    "year": 2018 + (i % 6),
                    "pricePerDay": 35 + (i as u64 * 5),
                    "available": i % 5 != 4,
                })
            })
            .collect();

        let destinations = [
            ("Island Hopping", "El Nido"),
            ("Chocolate Hills", "Bohol"),
            ("Rice Terraces", "Banaue"),
            ("Whale Shark Watching", "Oslob"),
        ];
        let tours = (0..11)
            .map(|i| {
                let (title, destination) = destinations[i % destinations.len()];
                json!({
                    "_id": format!("tour-{:02}", i + 1),
                    "title": title,
                    "destination": destination,
                    "duration": 1 + (i % 4),
                    "price": 80 + (i as u64 * 15),
                    "available": i % 6 != 5,
                })
            })
            .collect();

        let customers = [
            ("Ana", "Cruz"),
            ("Ben", "Santos"),
            ("Carla", "Reyes"),
            ("Dan", "Garcia"),
            ("Eva", "Lim"),
            ("Fe", "Tan"),
            ("Gio", "Ramos"),
        ];
        let statuses = ["pending", "confirmed", "completed", "pending", "cancelled"];
        let bookings = customers
            .iter()
            .enumerate()
            .map(|(i, (first, last))| {
                json!({
                    "_id": format!("booking-{:03}", 100 + i),
                    "customer": {"firstName": first, "lastName": last},
                    "itemName": if i % 2 == 0 { "Toyota Vios" } else { "Island Hopping" },
                    "totalPrice": 120 + i as u64 * 40,
                    "status": statuses[i % statuses.len()],
                })
            })
            .collect();

        let messages = [
            ("Liza", "Airport pickup?"),
            ("Marco", "Group discount"),
            ("Nina", "Change of dates"),
            ("Oscar", "Child seats"),
            ("Pia", "Refund request"),
            ("Quin", "Tour inclusions"),
        ]
        .iter()
        .enumerate()
        .map(|(i, (name, subject))| {
            json!({
                "_id": format!("msg-{:02}", i + 1),
                "name": name,
                "subject": subject,
                "status": if i < 2 { "new" } else { "read" },
            })
        })
        .collect();

        Self {
            state: Mutex::new(MockState {
                cars,
                tours,
                bookings,
                messages,
                ..Default::default()
            }),
            latency: Duration::ZERO,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_cars(mut self, cars: Vec<Value>) -> Self {
        self.state.get_mut().cars = cars;
        self
    }

    pub fn with_tours(mut self, tours: Vec<Value>) -> Self {
        self.state.get_mut().tours = tours;
        self
    }

    pub fn with_bookings(mut self, bookings: Vec<Value>) -> Self {
        self.state.get_mut().bookings = bookings;
        self
    }

    pub fn with_messages(mut self, messages: Vec<Value>) -> Self {
        self.state.get_mut().messages = messages;
        self
    }

    /// Queue a reply for the next call to `endpoint`
    pub fn script(mut self, endpoint: MockEndpoint, reply: MockReply) -> Self {
        self.state
            .get_mut()
            .scripted
            .entry(endpoint)
            .or_default()
            .push_back(reply);
        self
    }

    /// Queue a reply at runtime
    pub async fn push_reply(&self, endpoint: MockEndpoint, reply: MockReply) {
        self.state
            .lock()
            .await
            .scripted
            .entry(endpoint)
            .or_default()
            .push_back(reply);
    }

    pub async fn call_count(&self, endpoint: MockEndpoint) -> usize {
        self.state
            .lock()
            .await
            .calls
            .get(&endpoint)
            .copied()
            .unwrap_or(0)
    }

    /// Current stored availability of a fleet record
    pub async fn stored_availability(&self, kind: FleetKind, id: &str) -> Option<bool> {
        let state = self.state.lock().await;
        let list = match kind {
            FleetKind::Car => &state.cars,
            FleetKind::Tour => &state.tours,
        };
        list.iter()
            .find(|item| item.get("_id").and_then(Value::as_str) == Some(id))
            .map(|item| item.get("available").and_then(Value::as_bool).unwrap_or(true))
    }

    async fn next_reply(&self, endpoint: MockEndpoint) -> Option<MockReply> {
        let mut state = self.state.lock().await;
        *state.calls.entry(endpoint).or_insert(0) += 1;
        state
            .scripted
            .get_mut(&endpoint)
            .and_then(VecDeque::pop_front)
    }

    /// Resolve scripted behavior; `Ok(None)` means compute the normal reply
    async fn scripted(&self, endpoint: MockEndpoint) -> Result<Option<Value>, ServiceError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        match self.next_reply(endpoint).await {
            None => Ok(None),
            Some(MockReply::Body(body)) => Ok(Some(body)),
            Some(MockReply::Unavailable(message)) => Err(ServiceError::Unavailable(message)),
            Some(MockReply::Delay(delay)) => {
                tokio::time::sleep(delay).await;
                Ok(None)
            }
            Some(MockReply::DelayedBody(delay, body)) => {
                tokio::time::sleep(delay).await;
                Ok(Some(body))
            }
        }
    }

    async fn analytics_body(&self) -> Value {
        let state = self.state.lock().await;
        let available = |items: &[Value]| {
            items
                .iter()
                .filter(|item| item.get("available").and_then(Value::as_bool).unwrap_or(true))
                .count()
        };
        let with_status = |items: &[Value], status: &str| {
            items
                .iter()
                .filter(|item| item.get("status").and_then(Value::as_str) == Some(status))
                .count()
        };
        json!({
            "success": true,
            "data": {
                "summary": {
                    "totalCars": available(&state.cars),
                    "totalTours": available(&state.tours),
                    "totalBookings": state.bookings.len(),
                    "pendingBookings": with_status(&state.bookings, "pending"),
                    "totalMessages": state.messages.len(),
                    "newMessages": with_status(&state.messages, "new"),
                },
                "recentBookings": state.bookings,
                "recentMessages": state.messages,
            }
        })
    }

    async fn list_body(&self, kind: FleetKind, page: PageRequest) -> Value {
        let state = self.state.lock().await;
        let list = match kind {
            FleetKind::Car => &state.cars,
            FleetKind::Tour => &state.tours,
        };
        let start = (page.page.saturating_sub(1) as usize).saturating_mul(page.limit as usize);
        let items: Vec<Value> = list
            .iter()
            .skip(start)
            .take(page.limit as usize)
            .cloned()
            .collect();
        json!({ "success": true, "data": items })
    }

    async fn apply_update(&self, kind: FleetKind, id: &str, patch: AvailabilityPatch) -> Value {
        let mut state = self.state.lock().await;
        let list = match kind {
            FleetKind::Car => &mut state.cars,
            FleetKind::Tour => &mut state.tours,
        };
        let record = list
            .iter_mut()
            .find(|item| item.get("_id").and_then(Value::as_str) == Some(id));
        match record {
            Some(Value::Object(map)) => {
                map.insert("available".to_string(), Value::Bool(patch.available));
                json!({ "success": true, "data": Value::Object(map.clone()) })
            }
            _ => json!({ "success": false, "message": format!("{} {id} not found", kind.label()) }),
        }
    }
}

impl Default for MockDataService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DataService for MockDataService {
    async fn fetch_dashboard_analytics(&self) -> Result<ApiEnvelope, ServiceError> {
        let body = match self.scripted(MockEndpoint::Analytics).await? {
            Some(body) => body,
            None => self.analytics_body().await,
        };
        Ok(ApiEnvelope::from_value(body))
    }

    async fn fetch_all_cars(&self, page: PageRequest) -> Result<ApiEnvelope, ServiceError> {
        let body = match self.scripted(MockEndpoint::Cars).await? {
            Some(body) => body,
            None => self.list_body(FleetKind::Car, page).await,
        };
        Ok(ApiEnvelope::from_value(body))
    }

    async fn fetch_all_tours(&self, page: PageRequest) -> Result<ApiEnvelope, ServiceError> {
        let body = match self.scripted(MockEndpoint::Tours).await? {
            Some(body) => body,
            None => self.list_body(FleetKind::Tour, page).await,
        };
        Ok(ApiEnvelope::from_value(body))
    }

    async fn update_car(
        &self,
        id: &str,
        patch: AvailabilityPatch,
    ) -> Result<ApiEnvelope, ServiceError> {
        let body = match self.scripted(MockEndpoint::UpdateCar).await? {
            Some(body) => body,
            None => self.apply_update(FleetKind::Car, id, patch).await,
        };
        Ok(ApiEnvelope::from_value(body))
    }

    async fn update_tour(
        &self,
        id: &str,
        patch: AvailabilityPatch,
    ) -> Result<ApiEnvelope, ServiceError> {
        let body = match self.scripted(MockEndpoint::UpdateTour).await? {
            Some(body) => body,
            None => self.apply_update(FleetKind::Tour, id, patch).await,
        };
        Ok(ApiEnvelope::from_value(body))
    }

    fn endpoint_name(&self) -> String {
        "mock".to_string()
    }
}
