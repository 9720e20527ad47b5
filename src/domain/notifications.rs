//! In-memory notification feed and unread badge counts

use chrono::{DateTime, Duration, Utc};

/// Oldest events are dropped past this many
pub const MAX_EVENTS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationCategory {
    Booking,
    Message,
    System,
}

impl NotificationCategory {
    pub fn label(&self) -> &'static str {
        match self {
            NotificationCategory::Booking => "booking",
            NotificationCategory::Message => "message",
            NotificationCategory::System => "system",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NotificationEvent {
    pub id: u64,
    pub category: NotificationCategory,
    pub message: String,
    pub received_at: DateTime<Utc>,
    pub read: bool,
}

impl NotificationEvent {
    pub fn new(
        id: u64,
        category: NotificationCategory,
        message: impl Into<String>,
        received_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            category,
            message: message.into(),
            received_at,
            read: false,
        }
    }

    /// Relative time label such as "5 min ago"
    pub fn time_label(&self, now: DateTime<Utc>) -> String {
        relative_label(now.signed_duration_since(self.received_at))
    }
}

pub fn relative_label(elapsed: Duration) -> String {
    if elapsed < Duration::minutes(1) {
        "just now".to_string()
    } else if elapsed < Duration::hours(1) {
        format!("{} min ago", elapsed.num_minutes())
    } else if elapsed < Duration::days(1) {
        format!("{} h ago", elapsed.num_hours())
    } else {
        format!("{} d ago", elapsed.num_days())
    }
}

/// Ordered notification list, most recent first.
///
/// Events only move from unread to read, and only through `mark_all_read`.
#[derive(Debug, Clone, Default)]
pub struct NotificationCenter {
    events: Vec<NotificationEvent>,
    next_id: u64,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new unread event and return its id
    pub fn push(
        &mut self,
        category: NotificationCategory,
        message: impl Into<String>,
        received_at: DateTime<Utc>,
    ) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.insert(NotificationEvent::new(id, category, message, received_at));
        id
    }

    /// Insert an event produced elsewhere at the front of the list
    pub fn insert(&mut self, event: NotificationEvent) {
        self.next_id = self.next_id.max(event.id);
        self.events.insert(0, event);
        self.events.truncate(MAX_EVENTS);
    }

    /// Most recent event, if it is still unread
    pub fn latest_unread(&self) -> Option<&NotificationEvent> {
        self.events.first().filter(|event| !event.read)
    }

    pub fn list(&self) -> &[NotificationEvent] {
        &self.events
    }

    pub fn mark_all_read(&mut self) {
        for event in &mut self.events {
            event.read = true;
        }
    }

    pub fn unread_count(&self, category: NotificationCategory) -> usize {
        self.events
            .iter()
            .filter(|event| !event.read && event.category == category)
            .count()
    }

    pub fn unread_total(&self) -> usize {
        self.events.iter().filter(|event| !event.read).count()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
