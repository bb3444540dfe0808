use serde::{Deserialize, Serialize};

/// Scope class of a permission.
///
/// Determines which role assignments can satisfy a check for this
/// permission:
/// - `Global` permissions are only granted through assignments without a
///   location.
/// - `Location` permissions are granted through a global assignment or an
///   assignment whose location matches the checked scope token exactly.
/// - `Both` permissions are granted through any assignment that carries
///   them, regardless of the scope token.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PermissionScope {
    Global,
    Location,
    Both,
}

/// Available permissions for authorization.
///
/// Immutable reference data: the set of keys and their scope classes is
/// fixed at compile time, only roles and assignments are administrable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, utoipa::ToSchema)]
pub enum Permission {
    #[serde(rename = "inventory.view")]
    InventoryView,
    #[serde(rename = "inventory.manage")]
    InventoryManage,
    #[serde(rename = "bundle.manage")]
    BundleManage,
    #[serde(rename = "loan.view")]
    LoanView,
    #[serde(rename = "loan.manage")]
    LoanManage,
    #[serde(rename = "hours.manage")]
    HoursManage,
    #[serde(rename = "location.manage")]
    LocationManage,
    #[serde(rename = "notification.manage")]
    NotificationManage,
    #[serde(rename = "privacy.manage")]
    PrivacyManage,
    #[serde(rename = "audit.view")]
    AuditView,
    #[serde(rename = "user.manage")]
    UserManage,
    #[serde(rename = "system.admin")]
    SystemAdmin,
}

impl Permission {
    /// Get all available permissions in display order
    pub fn all() -> Vec<Permission> {
        vec![
            Permission::InventoryView,
            Permission::InventoryManage,
            Permission::BundleManage,
            Permission::LoanView,
            Permission::LoanManage,
            Permission::HoursManage,
            Permission::LocationManage,
            Permission::NotificationManage,
            Permission::PrivacyManage,
            Permission::AuditView,
            Permission::UserManage,
            Permission::SystemAdmin,
        ]
    }

    /// Stable string key, used in role definitions and API payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::InventoryView => "inventory.view",
            Permission::InventoryManage => "inventory.manage",
            Permission::BundleManage => "bundle.manage",
            Permission::LoanView => "loan.view",
            Permission::LoanManage => "loan.manage",
            Permission::HoursManage => "hours.manage",
            Permission::LocationManage => "location.manage",
            Permission::NotificationManage => "notification.manage",
            Permission::PrivacyManage => "privacy.manage",
            Permission::AuditView => "audit.view",
            Permission::UserManage => "user.manage",
            Permission::SystemAdmin => "system.admin",
        }
    }

    /// Parse from a string key
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Permission> {
        match s.to_lowercase().as_str() {
            "inventory.view" => Some(Permission::InventoryView),
            "inventory.manage" => Some(Permission::InventoryManage),
            "bundle.manage" => Some(Permission::BundleManage),
            "loan.view" => Some(Permission::LoanView),
            "loan.manage" => Some(Permission::LoanManage),
            "hours.manage" => Some(Permission::HoursManage),
            "location.manage" => Some(Permission::LocationManage),
            "notification.manage" => Some(Permission::NotificationManage),
            "privacy.manage" => Some(Permission::PrivacyManage),
            "audit.view" => Some(Permission::AuditView),
            "user.manage" => Some(Permission::UserManage),
            "system.admin" => Some(Permission::SystemAdmin),
            _ => None,
        }
    }

    /// Scope class of this permission
    pub fn scope(&self) -> PermissionScope {
        match self {
            Permission::InventoryView
            | Permission::InventoryManage
            | Permission::BundleManage
            | Permission::LoanView
            | Permission::LoanManage
            | Permission::HoursManage => PermissionScope::Location,
            Permission::LocationManage | Permission::NotificationManage => PermissionScope::Both,
            Permission::PrivacyManage
            | Permission::AuditView
            | Permission::UserManage
            | Permission::SystemAdmin => PermissionScope::Global,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_round_trip() {
        for permission in Permission::all() {
            assert_eq!(Permission::from_str(permission.as_str()), Some(permission));
        }
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(Permission::from_str("docker.compose"), None);
        assert_eq!(Permission::from_str(""), None);
    }

    #[test]
    fn test_scope_classes() {
        assert_eq!(
            Permission::InventoryManage.scope(),
            PermissionScope::Location
        );
        assert_eq!(Permission::LocationManage.scope(), PermissionScope::Both);
        assert_eq!(Permission::SystemAdmin.scope(), PermissionScope::Global);
    }
}
