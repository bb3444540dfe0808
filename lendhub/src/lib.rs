//! Lendhub library
//!
//! This library exposes the public API for integration testing.
//! Most functionality is in the binary, but we expose the services and
//! router creation for E2E testing.

pub mod api;
pub mod app_state;
pub mod http;
pub mod init_telemetry;
pub mod notification;
pub mod services;
pub mod settings;
pub mod stop_flag;
pub mod tasks;

// Re-export commonly used types for tests
pub use app_state::AppState;
