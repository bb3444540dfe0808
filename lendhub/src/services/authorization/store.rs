use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

use lendhub_core::authorization::{AuthConfig, Permission, RoleAssignment, RoleConfig};

/// Loading and persistence of the authorization configuration
pub struct ConfigStore;

impl ConfigStore {
    /// Load configuration from a YAML file
    pub async fn load_config(path: &str) -> Result<AuthConfig> {
        if !Path::new(path).exists() {
            warn!("Authorization config not found at {}, using defaults", path);
            return Ok(Self::default_config());
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .context("Failed to read authorization config")?;

        serde_norway::from_str(&content).context("Failed to parse authorization config")
    }

    /// Save configuration to file
    pub async fn save_config(config: &AuthConfig, config_path: &str) -> Result<()> {
        let yaml = serde_norway::to_string(config)?;
        tokio::fs::write(config_path, yaml)
            .await
            .context("Failed to save authorization config")?;
        Ok(())
    }

    /// Seeded configuration used when no config file exists
    pub fn default_config() -> AuthConfig {
        AuthConfig {
            roles: HashMap::from([
                (
                    "system_admin".to_string(),
                    RoleConfig {
                        permissions: vec!["*".to_string()],
                        description: "Full administrative access".to_string(),
                    },
                ),
                (
                    "location_manager".to_string(),
                    RoleConfig {
                        permissions: vec![
                            Permission::InventoryView.as_str().to_string(),
                            Permission::InventoryManage.as_str().to_string(),
                            Permission::BundleManage.as_str().to_string(),
                            Permission::LoanView.as_str().to_string(),
                            Permission::LoanManage.as_str().to_string(),
                            Permission::HoursManage.as_str().to_string(),
                        ],
                        description: "Manages one location's inventory, loans and hours"
                            .to_string(),
                    },
                ),
                (
                    "loan_desk".to_string(),
                    RoleConfig {
                        permissions: vec![
                            Permission::InventoryView.as_str().to_string(),
                            Permission::LoanView.as_str().to_string(),
                            Permission::LoanManage.as_str().to_string(),
                        ],
                        description: "Opens and closes loans".to_string(),
                    },
                ),
                (
                    "auditor".to_string(),
                    RoleConfig {
                        permissions: vec![
                            Permission::AuditView.as_str().to_string(),
                            Permission::InventoryView.as_str().to_string(),
                            Permission::LoanView.as_str().to_string(),
                        ],
                        description: "Read-only access including the admin surface".to_string(),
                    },
                ),
            ]),
            assignments: HashMap::new(),
        }
    }

    /// Default config plus a global system_admin assignment for the given
    /// user, used by the fallback path when no config file could be loaded.
    pub fn default_config_with_admin(admin_user: Option<String>) -> AuthConfig {
        let mut config = Self::default_config();
        if let Some(user) = admin_user {
            config.assignments.insert(
                user,
                vec![RoleAssignment {
                    role: "system_admin".to_string(),
                    location: None,
                }],
            );
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_yields_defaults() {
        let config = ConfigStore::load_config("/does/not/exist.yaml")
            .await
            .unwrap();
        assert!(config.roles.contains_key("system_admin"));
        assert!(config.assignments.is_empty());
    }

    #[tokio::test]
    async fn test_save_and_reload_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("authorization.yaml");
        let path = path.to_str().unwrap();

        let config = ConfigStore::default_config_with_admin(Some("token:admin".to_string()));
        ConfigStore::save_config(&config, path).await.unwrap();

        let reloaded = ConfigStore::load_config(path).await.unwrap();
        assert_eq!(reloaded.roles.len(), config.roles.len());
        let assignments = reloaded.assignments.get("token:admin").unwrap();
        assert_eq!(assignments[0].role, "system_admin");
        assert_eq!(assignments[0].location, None);
    }

    #[tokio::test]
    async fn test_config_with_unknown_permission_key_still_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("authorization.yaml");
        tokio::fs::write(
            &path,
            r#"
roles:
  drifted:
    description: "role referencing a removed permission"
    permissions: ["inventory.view", "removed.permission"]
assignments:
  alice@example.org:
    - role: drifted
      location: loc-1
"#,
        )
        .await
        .unwrap();

        let config = ConfigStore::load_config(path.to_str().unwrap())
            .await
            .unwrap();
        let role = config.roles.get("drifted").unwrap();
        assert_eq!(
            role.resolved_permissions(),
            vec![Permission::InventoryView]
        );
    }
}
