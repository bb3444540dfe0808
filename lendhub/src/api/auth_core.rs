use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use crate::app_state::SharedAppState;
use lendhub_core::settings::api_server::DEFAULT_DEV_USER_EMAIL;

#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub email: String,
    pub name: String,
    pub access_token: Option<String>,
}

/// Create a development mode user
pub fn authenticate_dev_user(state: &SharedAppState) -> CurrentUser {
    CurrentUser {
        email: state
            .settings
            .api
            .dev_user_email
            .clone()
            .unwrap_or_else(|| DEFAULT_DEV_USER_EMAIL.to_string()),
        name: state
            .settings
            .api
            .dev_user_name
            .clone()
            .unwrap_or_else(|| "Dev User".to_string()),
        access_token: None,
    }
}

/// Authorize a bearer token user.
///
/// Performs reverse lookup to find the token identifier, then checks that
/// the identifier has role assignments in the authorization service.
pub async fn authorize_bearer_user(state: &SharedAppState, token: &str) -> Option<CurrentUser> {
    let identifier = match find_token_identifier(state, token) {
        Some(id) => id,
        None => {
            warn!(
                "Bearer token authentication failed - token not found in bearer_tokens configuration (token starts with: {}...)",
                token.chars().take(8).collect::<String>()
            );
            return None;
        }
    };
    debug!("Found identifier '{}' for bearer token", identifier);

    let user_id = format!("token:{}", identifier);
    if state.auth_service.is_known_user(&user_id).await {
        return Some(CurrentUser {
            email: user_id,
            name: format!("Token User ({})", identifier),
            access_token: Some(token.to_string()),
        });
    }

    warn!(
        "Bearer token authentication failed - identifier '{}' has no role assignments",
        identifier
    );
    None
}

/// Find the token identifier by reverse-looking up the actual token.
///
/// Uses constant-time comparison to prevent timing attacks that could
/// reveal valid tokens through response time measurements.
fn find_token_identifier(state: &SharedAppState, token: &str) -> Option<String> {
    for (identifier, configured_token) in &state.settings.api.bearer_tokens {
        if token.as_bytes().ct_eq(configured_token.as_bytes()).into() {
            return Some(identifier.clone());
        }
    }

    None
}
