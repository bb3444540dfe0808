//! Shared types for the lendhub server.
//!
//! Everything in here is plain data: authorization reference data (permission
//! catalog, roles, assignments), the lending domain (locations, inventory,
//! bundles, loans) and the notification message types. The server crate owns
//! all behavior that touches settings, HTTP or the schedulers.

pub mod authorization;
pub mod inventory;
pub mod loans;
pub mod locations;
pub mod notification_types;
pub mod settings;
pub mod utils;
