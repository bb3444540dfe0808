use std::collections::HashMap;

use lendhub_core::authorization::{
    AccessDecision, AuthConfig, DenyReason, Permission, RoleAssignment, RoleConfig,
};

use super::store::ConfigStore;
use super::AuthorizationService;

fn role(description: &str, permissions: &[&str]) -> RoleConfig {
    RoleConfig {
        description: description.to_string(),
        permissions: permissions.iter().map(|p| p.to_string()).collect(),
    }
}

fn assignment(role: &str, location: Option<&str>) -> RoleAssignment {
    RoleAssignment {
        role: role.to_string(),
        location: location.map(|l| l.to_string()),
    }
}

fn test_config() -> AuthConfig {
    let mut config = ConfigStore::default_config();
    config.assignments = HashMap::from([
        (
            "admin@example.org".to_string(),
            vec![assignment("system_admin", None)],
        ),
        (
            "manager@example.org".to_string(),
            vec![assignment("location_manager", Some("loc-1"))],
        ),
        (
            "auditor@example.org".to_string(),
            vec![assignment("auditor", None)],
        ),
    ]);
    config
}

fn service() -> AuthorizationService {
    AuthorizationService::from_config(test_config())
}

#[tokio::test]
async fn test_location_manager_allowed_in_own_location() {
    let service = service();
    let decision = service
        .check(
            Some("manager@example.org"),
            &[Permission::InventoryManage],
            Some("loc-1"),
        )
        .await;
    assert_eq!(decision, AccessDecision::Allowed);
}

#[tokio::test]
async fn test_location_manager_denied_in_other_location() {
    let service = service();
    let decision = service
        .check(
            Some("manager@example.org"),
            &[Permission::InventoryManage],
            Some("loc-2"),
        )
        .await;
    assert_eq!(decision, AccessDecision::Denied(DenyReason::Forbidden));
}

#[tokio::test]
async fn test_location_manager_denied_without_scope_token() {
    // A location-scoped assignment never satisfies a check that carries no
    // location context.
    let service = service();
    let decision = service
        .check(
            Some("manager@example.org"),
            &[Permission::InventoryManage],
            None,
        )
        .await;
    assert_eq!(decision, AccessDecision::Denied(DenyReason::Forbidden));
}

#[tokio::test]
async fn test_global_assignment_covers_every_location() {
    let service = service();
    for token in [Some("loc-1"), Some("loc-2"), None] {
        let decision = service
            .check(
                Some("admin@example.org"),
                &[Permission::InventoryManage],
                token,
            )
            .await;
        assert_eq!(decision, AccessDecision::Allowed, "token {:?}", token);
    }
}

#[tokio::test]
async fn test_global_permission_requires_global_assignment() {
    let mut config = test_config();
    config.assignments.insert(
        "scoped-admin@example.org".to_string(),
        vec![assignment("system_admin", Some("loc-1"))],
    );
    let service = AuthorizationService::from_config(config);

    // system.admin is a global permission; a location-scoped assignment of
    // the role does not grant it, not even for that location's token.
    for token in [None, Some("loc-1")] {
        let decision = service
            .check(
                Some("scoped-admin@example.org"),
                &[Permission::SystemAdmin],
                token,
            )
            .await;
        assert_eq!(
            decision,
            AccessDecision::Denied(DenyReason::Forbidden),
            "token {:?}",
            token
        );
    }
}

#[tokio::test]
async fn test_both_scope_ignores_token() {
    let mut config = test_config();
    config.roles.insert(
        "notifier".to_string(),
        role("notification settings", &["notification.manage"]),
    );
    config.assignments.insert(
        "notifier@example.org".to_string(),
        vec![assignment("notifier", Some("loc-1"))],
    );
    let service = AuthorizationService::from_config(config);

    for token in [None, Some("loc-1"), Some("loc-2")] {
        let decision = service
            .check(
                Some("notifier@example.org"),
                &[Permission::NotificationManage],
                token,
            )
            .await;
        assert_eq!(decision, AccessDecision::Allowed, "token {:?}", token);
    }
}

#[tokio::test]
async fn test_or_semantics_over_required_list() {
    let service = service();
    // The auditor lacks system.admin but holds audit.view; one match is
    // enough.
    let decision = service
        .check(
            Some("auditor@example.org"),
            &[Permission::AuditView, Permission::SystemAdmin],
            None,
        )
        .await;
    assert_eq!(decision, AccessDecision::Allowed);
}

#[tokio::test]
async fn test_missing_actor_is_unauthenticated() {
    let service = service();
    let decision = service.check(None, &[Permission::InventoryView], None).await;
    assert_eq!(
        decision,
        AccessDecision::Denied(DenyReason::Unauthenticated)
    );
}

#[tokio::test]
async fn test_empty_requirement_list_fails_closed() {
    let service = service();
    let decision = service.check(Some("admin@example.org"), &[], None).await;
    assert_eq!(decision, AccessDecision::Denied(DenyReason::Forbidden));
}

#[tokio::test]
async fn test_unknown_user_is_forbidden() {
    let service = service();
    let decision = service
        .check(Some("nobody@example.org"), &[Permission::InventoryView], None)
        .await;
    assert_eq!(decision, AccessDecision::Denied(DenyReason::Forbidden));
}

#[tokio::test]
async fn test_revocation_takes_effect_immediately() {
    let service = service();

    assert!(
        service
            .check_permission(
                Some("manager@example.org"),
                Permission::LoanManage,
                Some("loc-1")
            )
            .await
    );

    service
        .revoke_role(
            "manager@example.org",
            "location_manager",
            Some("loc-1".to_string()),
        )
        .await
        .unwrap();

    assert!(
        !service
            .check_permission(
                Some("manager@example.org"),
                Permission::LoanManage,
                Some("loc-1")
            )
            .await
    );
}

#[tokio::test]
async fn test_dangling_role_reference_grants_nothing() {
    let mut config = test_config();
    config.assignments.insert(
        "ghost@example.org".to_string(),
        vec![assignment("deleted_role", None)],
    );
    let service = AuthorizationService::from_config(config);

    let decision = service
        .check(Some("ghost@example.org"), &[Permission::InventoryView], None)
        .await;
    assert_eq!(decision, AccessDecision::Denied(DenyReason::Forbidden));

    let effective = service.effective_permissions("ghost@example.org").await;
    assert!(effective.global.is_empty());
    assert!(effective.by_location.is_empty());
}

#[tokio::test]
async fn test_dangling_permission_key_is_skipped() {
    let mut config = test_config();
    config.roles.insert(
        "drifted".to_string(),
        role("drifted", &["inventory.view", "removed.permission"]),
    );
    config.assignments.insert(
        "drifter@example.org".to_string(),
        vec![assignment("drifted", None)],
    );
    let service = AuthorizationService::from_config(config);

    assert!(
        service
            .check_permission(Some("drifter@example.org"), Permission::InventoryView, None)
            .await
    );
    let effective = service.effective_permissions("drifter@example.org").await;
    assert_eq!(effective.global.len(), 1);
    assert!(effective.global.contains("inventory.view"));
}

#[tokio::test]
async fn test_checks_are_idempotent() {
    let service = service();
    let first = service
        .check(
            Some("manager@example.org"),
            &[Permission::InventoryManage],
            Some("loc-1"),
        )
        .await;
    let second = service
        .check(
            Some("manager@example.org"),
            &[Permission::InventoryManage],
            Some("loc-1"),
        )
        .await;
    assert_eq!(first, second);
    assert_eq!(first, AccessDecision::Allowed);
}

#[tokio::test]
async fn test_effective_permissions_partitioned_by_location() {
    let mut config = test_config();
    config
        .assignments
        .get_mut("manager@example.org")
        .unwrap()
        .push(assignment("auditor", None));
    let service = AuthorizationService::from_config(config);

    let effective = service.effective_permissions("manager@example.org").await;
    assert!(effective.global.contains("audit.view"));
    assert!(!effective.global.contains("inventory.manage"));
    let loc = effective.by_location.get("loc-1").unwrap();
    assert!(loc.contains("inventory.manage"));
    assert!(loc.contains("hours.manage"));
}

#[tokio::test]
async fn test_visible_locations_follow_the_grant_scope() {
    let service = service();

    // Global grant: unrestricted.
    assert_eq!(
        service
            .visible_locations("admin@example.org", Permission::InventoryView)
            .await,
        None
    );

    // Location-scoped grant: exactly the granted locations.
    let visible = service
        .visible_locations("manager@example.org", Permission::InventoryView)
        .await
        .unwrap();
    assert!(visible.contains("loc-1"));
    assert_eq!(visible.len(), 1);

    // No grant at all: empty set, nothing is visible.
    let visible = service
        .visible_locations("manager@example.org", Permission::AuditView)
        .await
        .unwrap();
    assert!(visible.is_empty());
}

#[tokio::test]
async fn test_wildcard_role_expands_to_all_permissions() {
    let service = service();
    let effective = service.effective_permissions("admin@example.org").await;
    assert_eq!(effective.global.len(), Permission::all().len());
}

#[tokio::test]
async fn test_assign_role_rejects_unknown_role_and_duplicates() {
    let service = service();

    assert!(service
        .assign_role("new@example.org", "missing_role", None)
        .await
        .is_err());

    service
        .assign_role("new@example.org", "loan_desk", Some("loc-2".to_string()))
        .await
        .unwrap();
    assert!(service
        .assign_role("new@example.org", "loan_desk", Some("loc-2".to_string()))
        .await
        .is_err());

    // Same role for a different location is a distinct assignment.
    service
        .assign_role("new@example.org", "loan_desk", Some("loc-3".to_string()))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_create_role_validates_permission_keys() {
    let service = service();

    assert!(service
        .create_role("bogus", vec!["does.not.exist".to_string()], "invalid")
        .await
        .is_err());

    service
        .create_role(
            "viewer",
            vec![Permission::InventoryView.as_str().to_string()],
            "read-only inventory access",
        )
        .await
        .unwrap();
    assert!(service
        .create_role("viewer", vec![], "duplicate")
        .await
        .is_err());
}
