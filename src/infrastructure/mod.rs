//! Infrastructure layer - External service integrations
//!
//! This layer contains:
//! - The owner data service (reqwest client and in-memory mock)
//! - Tokio runtime bridge for async operations

pub mod api;
pub mod runtime;

pub use api::{DataService, HttpDataService, MockDataService, ServiceError};
pub use runtime::{RuntimeBridge, RuntimeCommand, RuntimeEvent};
