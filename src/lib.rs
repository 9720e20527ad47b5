//! Owner console for a car and tour rental backend.
//!
//! The binary in `main.rs` drives [`app::App`] from a terminal event loop;
//! everything it needs is exposed here so integration tests can drive the
//! same controller against [`infrastructure::MockDataService`].

pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod infrastructure;
pub mod modules;
pub mod ui;
