use crate::api::basic_auth::CurrentUser;
use crate::{api::error::AppError, app_state::SharedAppState};
use axum::{extract::State, response::IntoResponse, Extension, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema, utoipa::ToResponse)]
pub struct RoleInfo {
    pub name: String,
    pub description: String,
    pub permissions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema, utoipa::ToResponse)]
pub struct RolesListResponse {
    pub roles: Vec<RoleInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateRoleRequest {
    pub name: String,
    pub description: String,
    pub permissions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema, utoipa::ToResponse)]
pub struct AdminActionResponse {
    pub success: bool,
    pub message: String,
}

#[utoipa::path(
    get,
    path = "/api/v1/authenticated/admin/roles",
    responses(
        (status = 200, response = inline(RolesListResponse)),
        (status = 401, description = "Access token is missing or invalid"),
        (status = 403, description = "Insufficient permissions - audit.view required"),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
pub async fn list_roles_handler(
    State(state): State<SharedAppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<impl IntoResponse, AppError> {
    info!("Admin listing roles for user: {}", user.email);

    let roles = state.auth_service.list_roles().await;
    let roles_info: Vec<RoleInfo> = roles
        .into_iter()
        .map(|(name, config)| RoleInfo {
            name,
            description: config.description,
            permissions: config.permissions,
        })
        .collect();

    Ok(Json(RolesListResponse { roles: roles_info }))
}

#[utoipa::path(
    post,
    path = "/api/v1/authenticated/admin/roles",
    request_body = CreateRoleRequest,
    responses(
        (status = 200, response = inline(AdminActionResponse)),
        (status = 400, description = "Invalid request data"),
        (status = 401, description = "Access token is missing or invalid"),
        (status = 403, description = "Insufficient permissions - user.manage required"),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
pub async fn create_role_handler(
    State(state): State<SharedAppState>,
    Extension(user): Extension<CurrentUser>,
    Json(request): Json<CreateRoleRequest>,
) -> Result<impl IntoResponse, AppError> {
    info!(
        "Admin creating role '{}' for user: {}",
        request.name, user.email
    );

    if request.name.trim().is_empty() {
        return Ok(Json(AdminActionResponse {
            success: false,
            message: "Role name cannot be empty".to_string(),
        }));
    }
    if request.description.trim().is_empty() {
        return Ok(Json(AdminActionResponse {
            success: false,
            message: "Role description cannot be empty".to_string(),
        }));
    }
    if request.permissions.is_empty() {
        return Ok(Json(AdminActionResponse {
            success: false,
            message: "Role must have at least one permission".to_string(),
        }));
    }

    match state
        .auth_service
        .create_role(&request.name, request.permissions, &request.description)
        .await
    {
        Ok(_) => {
            info!("Successfully created role '{}'", request.name);
            Ok(Json(AdminActionResponse {
                success: true,
                message: format!("Role '{}' created successfully", request.name),
            }))
        }
        Err(e) => {
            tracing::error!("Failed to create role '{}': {}", request.name, e);
            Ok(Json(AdminActionResponse {
                success: false,
                message: format!("Failed to create role: {}", e),
            }))
        }
    }
}
