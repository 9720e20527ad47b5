//! reqwest implementation of the data service

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::service::{ApiEnvelope, AvailabilityPatch, DataService, PageRequest, ServiceError};

/// JSON REST client for the booking backend
pub struct HttpDataService {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpDataService {
    pub fn new(
        base_url: &str,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ServiceError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ServiceError::Client)?;
        Ok(Self {
            http,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get(&self, path: &str, page: Option<PageRequest>) -> Result<ApiEnvelope, ServiceError> {
        let url = self.endpoint_url(path);
        let mut request = self.http.get(&url);
        if let Some(page) = page {
            request = request.query(&[("page", page.page), ("limit", page.limit)]);
        }
        self.send(&url, request).await
    }

    async fn put(&self, path: &str, patch: AvailabilityPatch) -> Result<ApiEnvelope, ServiceError> {
        let url = self.endpoint_url(path);
        let request = self.http.put(&url).json(&patch);
        self.send(&url, request).await
    }

    async fn send(
        &self,
        url: &str,
        mut request: reqwest::RequestBuilder,
    ) -> Result<ApiEnvelope, ServiceError> {
        if let Some(token) = self.token.as_deref() {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|source| ServiceError::Transport {
            endpoint: url.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Status {
                endpoint: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body: Value = response.json().await.map_err(|err| ServiceError::Decode {
            endpoint: url.to_string(),
            message: err.to_string(),
        })?;

        log::debug!("{url} -> {status}");
        Ok(ApiEnvelope::from_value(body))
    }
}

#[async_trait]
impl DataService for HttpDataService {
    async fn fetch_dashboard_analytics(&self) -> Result<ApiEnvelope, ServiceError> {
        self.get("api/analytics/dashboard", None).await
    }

    async fn fetch_all_cars(&self, page: PageRequest) -> Result<ApiEnvelope, ServiceError> {
        self.get("api/cars", Some(page)).await
    }

    async fn fetch_all_tours(&self, page: PageRequest) -> Result<ApiEnvelope, ServiceError> {
        self.get("api/tours", Some(page)).await
    }

    async fn update_car(
        &self,
        id: &str,
        patch: AvailabilityPatch,
    ) -> Result<ApiEnvelope, ServiceError> {
        self.put(&format!("api/cars/{id}"), patch).await
    }

    async fn update_tour(
        &self,
        id: &str,
        patch: AvailabilityPatch,
    ) -> Result<ApiEnvelope, ServiceError> {
        self.put(&format!("api/tours/{id}"), patch).await
    }

    fn endpoint_name(&self) -> String {
        self.base_url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url_joins_cleanly() {
        let service =
            HttpDataService::new("http://localhost:5000/", None, Duration::from_secs(1)).unwrap();
        assert_eq!(
            service.endpoint_url("/api/cars"),
            "http://localhost:5000/api/cars"
        );
        assert_eq!(
            service.endpoint_url("api/analytics/dashboard"),
            "http://localhost:5000/api/analytics/dashboard"
        );
        assert_eq!(service.endpoint_name(), "http://localhost:5000");
    }

    #[test]
    fn test_blank_token_is_ignored() {
        let service =
            HttpDataService::new("http://x", Some("  ".to_string()), Duration::from_secs(1))
                .unwrap();
        assert!(service.token.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_a_transport_error() {
        // Port 9 (discard) on localhost is not expected to serve HTTP
        let service =
            HttpDataService::new("http://127.0.0.1:9", None, Duration::from_millis(300)).unwrap();
        let result = service.fetch_dashboard_analytics().await;
        assert!(result.is_err());
    }
}
