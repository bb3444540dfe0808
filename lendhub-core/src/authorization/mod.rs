//! Authorization reference data for lendhub.
//!
//! The permission catalog is static: every capability the API exposes is a
//! `Permission` with a fixed string key and a scope class. Roles bundle
//! permission keys, assignments tie a user to a role for one location (or
//! globally). The decision logic itself lives in the server crate; this
//! module only defines the data the decision is computed from.

pub mod permission;
pub mod types;

pub use permission::{Permission, PermissionScope};
pub use types::{
    AccessDecision, AuthConfig, DenyReason, EffectivePermissions, RoleAssignment, RoleConfig,
};
