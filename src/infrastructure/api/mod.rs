//! Owner data service - trait, HTTP client and in-memory backend

mod http;
mod mock;
mod service;

pub use http::HttpDataService;
pub use mock::{MockDataService, MockEndpoint, MockReply};
pub use service::{ApiEnvelope, AvailabilityPatch, DataService, PageRequest, ServiceError};
