use anyhow::Result;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use lendhub_core::authorization::{
    AccessDecision, AuthConfig, DenyReason, EffectivePermissions, Permission, PermissionScope,
    RoleAssignment, RoleConfig,
};

use super::store::ConfigStore;

/// Authorization service: role/permission resolution over the current
/// assignment table.
///
/// Checks are pure reads; administrative mutations rewrite the shared
/// config and persist it. Nothing is cached across requests, so a revoked
/// assignment is gone on the very next check.
pub struct AuthorizationService {
    config: Arc<RwLock<AuthConfig>>,
    /// None for ephemeral services (fallback, tests): mutations then skip
    /// persistence.
    config_path: Option<String>,
}

impl AuthorizationService {
    /// Create a service backed by a YAML config file
    pub async fn new(config_path: &str) -> Result<Self> {
        let config = ConfigStore::load_config(config_path).await?;

        info!(
            "Authorization service initialized with {} roles, {} users with assignments",
            config.roles.len(),
            config.assignments.len()
        );

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            config_path: Some(config_path.to_string()),
        })
    }

    /// Create an in-memory service from an existing configuration
    pub fn from_config(config: AuthConfig) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            config_path: None,
        }
    }

    /// Fallback service with seeded roles and, optionally, one global
    /// system_admin assignment
    pub fn with_default_config(admin_user: Option<String>) -> Self {
        info!("Fallback authorization service created with default configuration");
        Self::from_config(ConfigStore::default_config_with_admin(admin_user))
    }

    async fn save(&self) -> Result<()> {
        if let Some(path) = &self.config_path {
            let config = self.config.read().await;
            ConfigStore::save_config(&config, path).await?;
        }
        Ok(())
    }

    /// Decide whether `actor` may perform an operation requiring at least
    /// one of `required` (OR semantics) against `scope_token`.
    ///
    /// Fails closed: no actor denies with `Unauthenticated`, an empty
    /// requirement list denies with `Forbidden`. Dangling role references
    /// in assignments are skipped, they can never grant anything.
    pub async fn check(
        &self,
        actor: Option<&str>,
        required: &[Permission],
        scope_token: Option<&str>,
    ) -> AccessDecision {
        let Some(user) = actor else {
            return AccessDecision::Denied(DenyReason::Unauthenticated);
        };
        if required.is_empty() {
            return AccessDecision::Denied(DenyReason::Forbidden);
        }

        let config = self.config.read().await;
        let assignments = config
            .assignments
            .get(user)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        for permission in required {
            let granted = assignments.iter().any(|assignment| {
                assignment_grants(&config.roles, assignment, *permission)
                    && scope_satisfied(
                        permission.scope(),
                        assignment.location.as_deref(),
                        scope_token,
                    )
            });
            if granted {
                debug!(
                    "Permission granted: {} holds {} for scope {:?}",
                    user,
                    permission.as_str(),
                    scope_token
                );
                return AccessDecision::Allowed;
            }
        }

        debug!(
            "Permission denied: {} holds none of {:?} for scope {:?}",
            user,
            required.iter().map(|p| p.as_str()).collect::<Vec<_>>(),
            scope_token
        );
        AccessDecision::Denied(DenyReason::Forbidden)
    }

    /// Convenience wrapper for single-permission checks
    pub async fn check_permission(
        &self,
        actor: Option<&str>,
        permission: Permission,
        scope_token: Option<&str>,
    ) -> bool {
        self.check(actor, &[permission], scope_token)
            .await
            .is_allowed()
    }

    /// The actor's full effective permission set, partitioned by location.
    ///
    /// Set union over all assignments: idempotent and order-independent.
    /// Dangling role or permission references contribute nothing.
    pub async fn effective_permissions(&self, user: &str) -> EffectivePermissions {
        let config = self.config.read().await;
        let mut effective = EffectivePermissions::default();

        let Some(assignments) = config.assignments.get(user) else {
            return effective;
        };

        for assignment in assignments {
            let Some(role) = config.roles.get(&assignment.role) else {
                debug!(
                    "Skipping assignment of {} to unknown role '{}'",
                    user, assignment.role
                );
                continue;
            };
            let keys = role
                .resolved_permissions()
                .into_iter()
                .map(|p| p.as_str().to_string());
            match &assignment.location {
                None => effective.global.extend(keys),
                Some(location) => effective
                    .by_location
                    .entry(location.clone())
                    .or_default()
                    .extend(keys),
            }
        }

        effective
    }

    /// The locations whose data the actor may read with `permission`.
    ///
    /// `None` means unrestricted (the permission is held through a global
    /// assignment); otherwise the set of locations it is held for, which
    /// may be empty. Listings must not show records outside this set.
    pub async fn visible_locations(
        &self,
        user: &str,
        permission: Permission,
    ) -> Option<BTreeSet<String>> {
        let effective = self.effective_permissions(user).await;
        let key = permission.as_str();
        if effective.global.contains(key) {
            return None;
        }
        Some(
            effective
                .by_location
                .iter()
                .filter(|(_, permissions)| permissions.contains(key))
                .map(|(location, _)| location.clone())
                .collect(),
        )
    }

    /// Get all roles
    pub async fn list_roles(&self) -> Vec<(String, RoleConfig)> {
        let config = self.config.read().await;
        let mut roles: Vec<(String, RoleConfig)> = config
            .roles
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        roles.sort_by(|a, b| a.0.cmp(&b.0));
        roles
    }

    /// Create a new role
    pub async fn create_role(
        &self,
        name: &str,
        permissions: Vec<String>,
        description: &str,
    ) -> Result<()> {
        for key in &permissions {
            if key != "*" && Permission::from_str(key).is_none() {
                anyhow::bail!("Unknown permission: '{}'", key);
            }
        }

        {
            let mut config = self.config.write().await;

            if config.roles.contains_key(name) {
                anyhow::bail!("Role '{}' already exists", name);
            }

            config.roles.insert(
                name.to_string(),
                RoleConfig {
                    permissions,
                    description: description.to_string(),
                },
            );
        }
        self.save().await?;

        info!("Created role '{}'", name);
        Ok(())
    }

    /// Get all assignments
    pub async fn list_assignments(&self) -> HashMap<String, Vec<RoleAssignment>> {
        let config = self.config.read().await;
        config.assignments.clone()
    }

    /// Assign a role to a user, optionally scoped to one location.
    ///
    /// Duplicate (user, role, location) triples are rejected.
    pub async fn assign_role(
        &self,
        user: &str,
        role: &str,
        location: Option<String>,
    ) -> Result<()> {
        {
            let mut config = self.config.write().await;

            if !config.roles.contains_key(role) {
                anyhow::bail!("Role '{}' does not exist", role);
            }

            let assignments = config.assignments.entry(user.to_string()).or_default();
            if assignments
                .iter()
                .any(|a| a.role == role && a.location == location)
            {
                anyhow::bail!(
                    "User '{}' already has role '{}' for location {:?}",
                    user,
                    role,
                    location
                );
            }

            assignments.push(RoleAssignment {
                role: role.to_string(),
                location: location.clone(),
            });
        }
        self.save().await?;

        info!(
            "Assigned role '{}' to user '{}' (location: {:?})",
            role, user, location
        );
        Ok(())
    }

    /// Remove one (user, role, location) triple. Takes effect on the next
    /// check; there is no cache to invalidate.
    pub async fn revoke_role(
        &self,
        user: &str,
        role: &str,
        location: Option<String>,
    ) -> Result<()> {
        {
            let mut config = self.config.write().await;

            let Some(assignments) = config.assignments.get_mut(user) else {
                anyhow::bail!("User '{}' has no assignments", user);
            };

            let before = assignments.len();
            assignments.retain(|a| !(a.role == role && a.location == location));
            if assignments.len() == before {
                anyhow::bail!(
                    "User '{}' does not have role '{}' for location {:?}",
                    user,
                    role,
                    location
                );
            }
            if assignments.is_empty() {
                config.assignments.remove(user);
            }
        }
        self.save().await?;

        info!(
            "Revoked role '{}' from user '{}' (location: {:?})",
            role, user, location
        );
        Ok(())
    }

    /// Whether a bearer-token identifier has any assignments at all
    pub async fn is_known_user(&self, user: &str) -> bool {
        let config = self.config.read().await;
        config.assignments.contains_key(user)
    }
}

/// Whether the assignment's role grants the permission. A role that was
/// deleted out from under the assignment grants nothing; this is data
/// drift, not an error.
fn assignment_grants(
    roles: &HashMap<String, RoleConfig>,
    assignment: &RoleAssignment,
    permission: Permission,
) -> bool {
    roles
        .get(&assignment.role)
        .map(|role| role.grants(permission))
        .unwrap_or(false)
}

/// Whether an assignment's location satisfies a permission's scope class
/// for the given scope token.
///
/// - `Global`: only global assignments count.
/// - `Location`: global assignments count for every token; a scoped
///   assignment only for the exactly matching token. A null token is only
///   satisfied globally.
/// - `Both`: any assignment counts regardless of the token.
fn scope_satisfied(
    class: PermissionScope,
    assignment_location: Option<&str>,
    scope_token: Option<&str>,
) -> bool {
    match class {
        PermissionScope::Global => assignment_location.is_none(),
        PermissionScope::Both => true,
        PermissionScope::Location => match assignment_location {
            None => true,
            Some(location) => scope_token == Some(location),
        },
    }
}

impl std::fmt::Debug for AuthorizationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizationService")
            .field("config_path", &self.config_path)
            .finish_non_exhaustive()
    }
}
