use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

pub const DEFAULT_DEV_USER_EMAIL: &str = "dev@localhost";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default, ToSchema)]
pub enum AuthMode {
    #[serde(rename = "dev")]
    Development,
    #[serde(rename = "bearer")]
    #[default]
    Bearer,
}

#[derive(Debug, Deserialize, Clone)]
#[allow(unused)]
#[readonly::make]
pub struct ApiServer {
    pub bind_address: String,
    /// Password accepted by the login endpoint in bearer mode
    pub access_token: Option<String>,
    #[serde(default)]
    pub auth_mode: AuthMode,
    pub dev_user_email: Option<String>,
    pub dev_user_name: Option<String>,
    /// identifier -> token; identifiers become the actor ids used in
    /// role assignments
    #[serde(default)]
    pub bearer_tokens: HashMap<String, String>,
}

impl Default for ApiServer {
    fn default() -> Self {
        ApiServer {
            bind_address: "0.0.0.0:8080".to_string(),
            access_token: None,
            auth_mode: AuthMode::default(),
            dev_user_email: Some(DEFAULT_DEV_USER_EMAIL.to_string()),
            dev_user_name: Some("Dev User".to_string()),
            bearer_tokens: HashMap::new(),
        }
    }
}
