//! Archive/restore of a single car or tour record

use std::sync::Arc;

use crate::domain::FleetKind;
use crate::infrastructure::api::{AvailabilityPatch, DataService};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityRequest {
    pub kind: FleetKind,
    pub id: String,
    pub available: bool,
}

impl AvailabilityRequest {
    pub fn new(kind: FleetKind, id: impl Into<String>, available: bool) -> Self {
        Self {
            kind,
            id: id.into(),
            available,
        }
    }

    /// "archive" or "restore"
    pub fn verb(&self) -> &'static str {
        if self.available {
            "restore"
        } else {
            "archive"
        }
    }
}

/// Result of one update call, applied by the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvailabilityOutcome {
    Applied(AvailabilityRequest),
    Failed {
        request: AvailabilityRequest,
        message: String,
    },
}

pub struct AvailabilityToggler {
    service: Arc<dyn DataService>,
}

impl AvailabilityToggler {
    pub fn new(service: Arc<dyn DataService>) -> Self {
        Self { service }
    }

    /// Call the update endpoint. Never fails; failures are returned as outcomes.
    pub async fn set_availability(&self, request: AvailabilityRequest) -> AvailabilityOutcome {
        let patch = AvailabilityPatch {
            available: request.available,
        };
        let result = match request.kind {
            FleetKind::Car => self.service.update_car(&request.id, patch).await,
            FleetKind::Tour => self.service.update_tour(&request.id, patch).await,
        };

        let failure = match result {
            Ok(envelope) if envelope.success => None,
            Ok(envelope) => Some(
                envelope
                    .message
                    .unwrap_or_else(|| "update rejected by server".to_string()),
            ),
            Err(err) => Some(err.to_string()),
        };

        match failure {
            None => {
                log::info!(
                    "{} {} {}d",
                    request.kind.label(),
                    request.id,
                    request.verb()
                );
                AvailabilityOutcome::Applied(request)
            }
            Some(message) => {
                log::warn!(
                    "failed to {} {} {}: {message}",
                    request.verb(),
                    request.kind.label(),
                    request.id
                );
                AvailabilityOutcome::Failed { request, message }
            }
        }
    }
}
