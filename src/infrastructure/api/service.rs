//! Data service abstraction for the owner console backend

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Errors raised at the transport level.
///
/// A response that arrives but carries an unexpected shape is not an error;
/// it is surfaced as an `ApiEnvelope` and normalized by the caller.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },

    #[error("could not decode response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    #[error("network unavailable: {0}")]
    Unavailable(String),

    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// `{ success, data }` response envelope, parsed leniently
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ApiEnvelope {
    pub success: bool,
    pub data: Value,
    pub message: Option<String>,
}

impl ApiEnvelope {
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: Value::Null,
            message: Some(message.into()),
        }
    }

    /// Build an envelope from any JSON body. A missing or non-boolean
    /// `success` counts as failure.
    pub fn from_value(body: Value) -> Self {
        let success = body
            .get("success")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string);
        let data = match body {
            Value::Object(mut map) => map.remove("data").unwrap_or(Value::Null),
            _ => Value::Null,
        };
        Self {
            success,
            data,
            message,
        }
    }
}

/// Pagination for list endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    pub fn first(limit: u32) -> Self {
        Self { page: 1, limit }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first(10)
    }
}

/// Body of a car/tour availability update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AvailabilityPatch {
    pub available: bool,
}

/// Backend operations the console depends on
#[async_trait]
pub trait DataService: Send + Sync + 'static {
    /// Summary counters plus recent bookings and messages
    async fn fetch_dashboard_analytics(&self) -> Result<ApiEnvelope, ServiceError>;

    async fn fetch_all_cars(&self, page: PageRequest) -> Result<ApiEnvelope, ServiceError>;

    async fn fetch_all_tours(&self, page: PageRequest) -> Result<ApiEnvelope, ServiceError>;

    async fn update_car(
        &self,
        id: &str,
        patch: AvailabilityPatch,
    ) -> Result<ApiEnvelope, ServiceError>;

    async fn update_tour(
        &self,
        id: &str,
        patch: AvailabilityPatch,
    ) -> Result<ApiEnvelope, ServiceError>;

    /// Display name for the status bar
    fn endpoint_name(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_from_value() {
        let envelope = ApiEnvelope::from_value(json!({"success": true, "data": [1, 2]}));
        assert!(envelope.success);
        assert_eq!(envelope.data, json!([1, 2]));

        let envelope = ApiEnvelope::from_value(json!({"success": "yes", "message": "odd"}));
        assert!(!envelope.success);
        assert_eq!(envelope.data, Value::Null);
        assert_eq!(envelope.message.as_deref(), Some("odd"));

        let envelope = ApiEnvelope::from_value(json!([1, 2, 3]));
        assert!(!envelope.success);
    }

    #[test]
    fn test_patch_body() {
        let body = serde_json::to_value(AvailabilityPatch { available: false }).unwrap();
        assert_eq!(body, json!({"available": false}));
    }
}
