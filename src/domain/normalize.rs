//! Lenient conversion of backend JSON payloads into view model slices.
//!
//! The backend is not trusted to send complete objects. Every function here is
//! total: missing or malformed fields fall back to zero, empty strings or the
//! documented enum default, and list entries that are not objects are skipped.

use serde_json::{Map, Value};

use super::model::{
    BookingStatus, Car, DashboardSummary, MessageStatus, RecentBookingEntry, RecentMessageEntry,
    Tour, FLEET_LIMIT, RECENT_LIMIT,
};

/// Coerce a JSON value to a non-negative counter
pub fn coerce_count(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse::<u64>().unwrap_or(0),
        _ => 0,
    }
}

/// Coerce a JSON value to a non-negative amount
pub fn coerce_amount(value: Option<&Value>) -> f64 {
    let amount = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if amount.is_finite() && amount >= 0.0 {
        amount
    } else {
        0.0
    }
}

/// Summary counters from an analytics payload; `None` when there is no summary object
pub fn summary_from(data: &Value) -> Option<DashboardSummary> {
    let summary = data.get("summary")?.as_object()?;
    Some(DashboardSummary {
        total_cars: coerce_count(summary.get("totalCars")),
        total_tours: coerce_count(summary.get("totalTours")),
        total_bookings: coerce_count(summary.get("totalBookings")),
        pending_bookings: coerce_count(summary.get("pendingBookings")),
        total_messages: coerce_count(summary.get("totalMessages")),
        new_messages: coerce_count(summary.get("newMessages")),
    })
}

/// First five recent bookings of an analytics payload
pub fn bookings_from(data: &Value) -> Vec<RecentBookingEntry> {
    objects(data.get("recentBookings"))
        .filter_map(booking_from)
        .take(RECENT_LIMIT)
        .collect()
}

/// First five recent messages of an analytics payload
pub fn messages_from(data: &Value) -> Vec<RecentMessageEntry> {
    objects(data.get("recentMessages"))
        .filter_map(message_from)
        .take(RECENT_LIMIT)
        .collect()
}

/// Cars from a list payload; `None` when the payload is not a list
pub fn cars_from(data: &Value) -> Option<Vec<Car>> {
    let list = data.as_array()?;
    Some(
        list.iter()
            .filter_map(Value::as_object)
            .filter_map(car_from)
            .take(FLEET_LIMIT)
            .collect(),
    )
}

/// Tours from a list payload; `None` when the payload is not a list
pub fn tours_from(data: &Value) -> Option<Vec<Tour>> {
    let list = data.as_array()?;
    Some(
        list.iter()
            .filter_map(Value::as_object)
            .filter_map(tour_from)
            .take(FLEET_LIMIT)
            .collect(),
    )
}

fn objects(value: Option<&Value>) -> impl Iterator<Item = &Map<String, Value>> {
    value
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}

fn booking_from(obj: &Map<String, Value>) -> Option<RecentBookingEntry> {
    let id = id_of(obj)?;
    let customer = obj.get("customer").and_then(Value::as_object);
    let (first_name, last_name) = match customer {
        Some(customer) => (
            text(customer, &["firstName", "first_name"]),
            text(customer, &["lastName", "last_name"]),
        ),
        None => (
            text(obj, &["firstName", "first_name"]),
            text(obj, &["lastName", "last_name"]),
        ),
    };
    Some(RecentBookingEntry {
        id,
        customer_first_name: first_name,
        customer_last_name: last_name,
        item_name: item_name(obj),
        total_price: coerce_amount(obj.get("totalPrice").or_else(|| obj.get("total"))),
        status: BookingStatus::parse(&text(obj, &["status"])),
    })
}

fn item_name(obj: &Map<String, Value>) -> String {
    let direct = text(obj, &["itemName", "item_name"]);
    if !direct.is_empty() {
        return direct;
    }
    if let Some(item) = obj.get("item").and_then(Value::as_object) {
        let name = text(item, &["name", "title"]);
        if !name.is_empty() {
            return name;
        }
    }
    if let Some(car) = obj.get("car").and_then(Value::as_object) {
        let name = format!("{} {}", text(car, &["brand"]), text(car, &["model"]));
        return name.trim().to_string();
    }
    if let Some(tour) = obj.get("tour").and_then(Value::as_object) {
        return text(tour, &["title"]);
    }
    String::new()
}

fn message_from(obj: &Map<String, Value>) -> Option<RecentMessageEntry> {
    Some(RecentMessageEntry {
        id: id_of(obj)?,
        sender_name: text(obj, &["name", "senderName", "sender"]),
        subject: text(obj, &["subject"]),
        status: MessageStatus::parse(&text(obj, &["status"])),
    })
}

fn car_from(obj: &Map<String, Value>) -> Option<Car> {
    let year = coerce_count(obj.get("year"));
    Some(Car {
        id: id_of(obj)?,
        brand: text(obj, &["brand", "make"]),
        model: text(obj, &["model"]),
        year: u32::try_from(year).ok().filter(|y| *y > 0),
        price_per_day: coerce_amount(obj.get("pricePerDay").or_else(|| obj.get("price"))),
        available: availability(obj),
    })
}

fn tour_from(obj: &Map<String, Value>) -> Option<Tour> {
    Some(Tour {
        id: id_of(obj)?,
        title: text(obj, &["title", "name"]),
        destination: text(obj, &["destination"]),
        duration: duration_label(obj.get("duration")),
        price: coerce_amount(obj.get("price").or_else(|| obj.get("pricePerPerson"))),
        available: availability(obj),
    })
}

/// Missing `available` means the record has not been archived
fn availability(obj: &Map<String, Value>) -> bool {
    obj.get("available").and_then(Value::as_bool).unwrap_or(true)
}

fn duration_label(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => match n.as_u64() {
            Some(1) => "1 day".to_string(),
            Some(days) => format!("{days} days"),
            None => String::new(),
        },
        _ => String::new(),
    }
}

/// Record id from `_id` or `id`, string or integer
fn id_of(obj: &Map<String, Value>) -> Option<String> {
    ["_id", "id"].iter().find_map(|key| match obj.get(*key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn text(obj: &Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|key| obj.get(*key).and_then(Value::as_str))
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_count() {
        assert_eq!(coerce_count(Some(&json!(12))), 12);
        assert_eq!(coerce_count(Some(&json!(3.9))), 3);
        assert_eq!(coerce_count(Some(&json!("7"))), 7);
        assert_eq!(coerce_count(Some(&json!(-4))), 0);
        assert_eq!(coerce_count(Some(&json!("many"))), 0);
        assert_eq!(coerce_count(Some(&json!(null))), 0);
        assert_eq!(coerce_count(Some(&json!({"n": 1}))), 0);
        assert_eq!(coerce_count(None), 0);
    }

    #[test]
    fn test_summary_requires_object() {
        assert_eq!(summary_from(&json!({})), None);
        assert_eq!(summary_from(&json!({"summary": [1, 2]})), None);
        assert_eq!(summary_from(&json!({"summary": null})), None);
    }

    #[test]
    fn test_partial_summary_defaults_missing_counters() {
        let summary = summary_from(&json!({
            "summary": {"totalCars": 4, "pendingBookings": "2", "newMessages": -1}
        }))
        .unwrap();
        assert_eq!(summary.total_cars, 4);
        assert_eq!(summary.pending_bookings, 2);
        assert_eq!(summary.new_messages, 0);
        assert_eq!(summary.total_tours, 0);
        assert_eq!(summary.total_bookings, 0);
        assert_eq!(summary.total_messages, 0);
    }

    #[test]
    fn test_bookings_keep_order_and_limit() {
        let bookings: Vec<Value> = (0..8)
            .map(|i| json!({"_id": format!("b{i}"), "status": "confirmed"}))
            .collect();
        let parsed = bookings_from(&json!({ "recentBookings": bookings }));
        assert_eq!(parsed.len(), RECENT_LIMIT);
        assert_eq!(parsed[0].id, "b0");
        assert_eq!(parsed[4].id, "b4");
    }

    #[test]
    fn test_booking_fields() {
        let parsed = bookings_from(&json!({
            "recentBookings": [
                {
                    "_id": "b1",
                    "customer": {"firstName": "Ana", "lastName": "Cruz"},
                    "car": {"brand": "Honda", "model": "City"},
                    "totalPrice": 150.5,
                    "status": "mystery"
                },
                "not an object",
                {"firstName": "No", "lastName": "Id"}
            ]
        }));
        assert_eq!(parsed.len(), 1);
        let booking = &parsed[0];
        assert_eq!(booking.customer_name(), "Ana Cruz");
        assert_eq!(booking.item_name, "Honda City");
        assert_eq!(booking.total_price, 150.5);
        assert_eq!(booking.status, BookingStatus::Pending);
    }

    #[test]
    fn test_missing_lists_are_empty() {
        assert!(bookings_from(&json!({})).is_empty());
        assert!(messages_from(&json!({"recentMessages": "oops"})).is_empty());
    }

    #[test]
    fn test_cars_payload() {
        let cars = cars_from(&json!([
            {"_id": "c1", "brand": "Toyota", "model": "Vios", "year": 2021, "pricePerDay": 40, "available": false},
            {"id": 7, "brand": "Ford", "model": "Ranger"},
            {"brand": "Dropped"}
        ]))
        .unwrap();
        assert_eq!(cars.len(), 2);
        assert!(!cars[0].available);
        assert_eq!(cars[0].year, Some(2021));
        assert_eq!(cars[1].id, "7");
        assert!(cars[1].available);
        assert_eq!(cars[1].year, None);
        assert_eq!(cars_from(&json!({"cars": []})), None);
    }

    #[test]
    fn test_tour_duration_labels() {
        let tours = tours_from(&json!([
            {"_id": "t1", "title": "Falls", "duration": 1},
            {"_id": "t2", "title": "Reef", "duration": 3},
            {"_id": "t3", "title": "City", "duration": "Half day"}
        ]))
        .unwrap();
        assert_eq!(tours[0].duration, "1 day");
        assert_eq!(tours[1].duration, "3 days");
        assert_eq!(tours[2].duration, "Half day");
    }
}
