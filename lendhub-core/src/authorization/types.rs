use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::permission::Permission;

/// A role: a named bundle of permission keys.
///
/// Permissions are stored as plain strings so a config file referencing a
/// key this build no longer knows does not fail deserialization. Unknown
/// keys are skipped at resolution time, `"*"` grants every permission.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct RoleConfig {
    pub description: String,
    pub permissions: Vec<String>,
}

impl RoleConfig {
    /// Whether this role grants the given permission.
    ///
    /// Dangling permission keys are ignored, they can never match.
    pub fn grants(&self, permission: Permission) -> bool {
        self.permissions
            .iter()
            .any(|key| key == "*" || Permission::from_str(key) == Some(permission))
    }

    /// The resolvable permissions of this role, wildcard expanded,
    /// dangling keys dropped.
    pub fn resolved_permissions(&self) -> Vec<Permission> {
        if self.permissions.iter().any(|key| key == "*") {
            return Permission::all();
        }
        let mut resolved: Vec<Permission> = self
            .permissions
            .iter()
            .filter_map(|key| Permission::from_str(key))
            .collect();
        resolved.dedup();
        resolved
    }
}

/// Assigns a role to a user, optionally scoped to one location.
///
/// `location: None` means the role applies globally for that user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, utoipa::ToSchema)]
pub struct RoleAssignment {
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Authorization configuration: roles plus per-user assignment lists.
///
/// Loaded from YAML at startup and re-read on every check; there is no
/// cross-request cache, so revocations take effect immediately.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub roles: HashMap<String, RoleConfig>,
    #[serde(default)]
    pub assignments: HashMap<String, Vec<RoleAssignment>>,
}

/// Why a check was denied
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    /// No authenticated actor on the request
    Unauthenticated,
    /// Actor present but holds none of the required permissions in scope
    Forbidden,
    /// A location-scoped check was requested but no scope token could be
    /// resolved; treated as a deny, never as an error
    ScopeUnresolved,
}

/// Outcome of an authorization check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allowed,
    Denied(DenyReason),
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allowed)
    }
}

/// An actor's effective permission set, partitioned by location.
///
/// Derived per request by joining assignments with roles; dangling role
/// references contribute nothing. BTree containers keep API responses
/// stable for clients and tests.
#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema, utoipa::ToResponse)]
pub struct EffectivePermissions {
    /// Permissions held through assignments without a location
    pub global: BTreeSet<String>,
    /// Permissions held through location-scoped assignments
    pub by_location: BTreeMap<String, BTreeSet<String>>,
}

impl EffectivePermissions {
    pub fn is_empty(&self) -> bool {
        self.global.is_empty() && self.by_location.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_grants() {
        let role = RoleConfig {
            description: "clerk".to_string(),
            permissions: vec!["inventory.view".to_string(), "loan.manage".to_string()],
        };
        assert!(role.grants(Permission::InventoryView));
        assert!(role.grants(Permission::LoanManage));
        assert!(!role.grants(Permission::SystemAdmin));
    }

    #[test]
    fn test_wildcard_grants_everything() {
        let role = RoleConfig {
            description: "admin".to_string(),
            permissions: vec!["*".to_string()],
        };
        for permission in Permission::all() {
            assert!(role.grants(permission));
        }
        assert_eq!(role.resolved_permissions(), Permission::all());
    }

    #[test]
    fn test_dangling_permission_keys_are_skipped() {
        let role = RoleConfig {
            description: "drifted".to_string(),
            permissions: vec![
                "inventory.view".to_string(),
                "deleted.permission".to_string(),
            ],
        };
        assert_eq!(
            role.resolved_permissions(),
            vec![Permission::InventoryView]
        );
        assert!(!role.grants(Permission::SystemAdmin));
    }

    #[test]
    fn test_assignment_yaml_round_trip() {
        let assignment = RoleAssignment {
            role: "location_manager".to_string(),
            location: Some("loc-1".to_string()),
        };
        let yaml = serde_json::to_string(&assignment).unwrap();
        let back: RoleAssignment = serde_json::from_str(&yaml).unwrap();
        assert_eq!(back, assignment);

        // A global assignment omits the location field entirely.
        let global = RoleAssignment {
            role: "system_admin".to_string(),
            location: None,
        };
        let json = serde_json::to_value(&global).unwrap();
        assert!(json.get("location").is_none());
    }
}
