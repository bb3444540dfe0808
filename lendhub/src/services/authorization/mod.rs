//! Location-scoped authorization for lendhub.
//!
//! Roles bundle permission keys, assignments tie a user to a role either
//! globally or for one location. Every check re-reads the current
//! assignment table and resolves the actor's effective permissions for the
//! requested scope token; there is no cross-request cache, so revocations
//! take effect on the next request.

pub mod scope;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use service::AuthorizationService;

// Re-export the reference data types for easy access
pub use lendhub_core::authorization::{
    AccessDecision, AuthConfig, DenyReason, EffectivePermissions, Permission, PermissionScope,
    RoleAssignment, RoleConfig,
};
