use crate::api::basic_auth::CurrentUser;
use crate::api::handlers::admin::roles::AdminActionResponse;
use crate::{api::error::AppError, app_state::SharedAppState};
use axum::{extract::State, response::IntoResponse, Extension, Json};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AssignmentInfo {
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema, utoipa::ToResponse)]
pub struct AssignmentsListResponse {
    pub assignments: HashMap<String, Vec<AssignmentInfo>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AssignRoleRequest {
    pub user: String,
    pub role: String,
    #[serde(default)]
    pub location: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/authenticated/admin/assignments",
    responses(
        (status = 200, response = inline(AssignmentsListResponse)),
        (status = 401, description = "Access token is missing or invalid"),
        (status = 403, description = "Insufficient permissions - audit.view required"),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
pub async fn list_assignments_handler(
    State(state): State<SharedAppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<impl IntoResponse, AppError> {
    info!("Admin listing assignments for user: {}", user.email);

    let assignments = state
        .auth_service
        .list_assignments()
        .await
        .into_iter()
        .map(|(user, assignments)| {
            let infos = assignments
                .into_iter()
                .map(|a| AssignmentInfo {
                    role: a.role,
                    location: a.location,
                })
                .collect();
            (user, infos)
        })
        .collect();

    Ok(Json(AssignmentsListResponse { assignments }))
}

#[utoipa::path(
    post,
    path = "/api/v1/authenticated/admin/assignments",
    request_body = AssignRoleRequest,
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
pub async fn assign_role_handler(
    State(state): State<SharedAppState>,
    Extension(admin): Extension<CurrentUser>,
    Json(request): Json<AssignRoleRequest>,
) -> Result<impl IntoResponse, AppError> {
    info!(
        "Admin {} assigning role '{}' to '{}' (location: {:?})",
        admin.email, request.role, request.user, request.location
    );

    if request.user.trim().is_empty() {
        return Ok(Json(AdminActionResponse {
            success: false,
            message: "User cannot be empty".to_string(),
        }));
    }

    match state
        .auth_service
        .assign_role(&request.user, &request.role, request.location.clone())
        .await
    {
        Ok(_) => Ok(Json(AdminActionResponse {
            success: true,
            message: format!(
                "Role '{}' assigned to '{}' successfully",
                request.role, request.user
            ),
        })),
        Err(e) => {
            tracing::error!("Failed to assign role: {}", e);
            Ok(Json(AdminActionResponse {
                success: false,
                message: format!("Failed to assign role: {}", e),
            }))
        }
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/authenticated/admin/assignments",
    request_body = AssignRoleRequest,
    responses(
        (status = 200, response = inline(AdminActionResponse)),
        (status = 401, description = "Access token is missing or invalid"),
        (status = 403, description = "Insufficient permissions - user.manage required"),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
pub async fn revoke_role_handler(
    State(state): State<SharedAppState>,
    Extension(admin): Extension<CurrentUser>,
    Json(request): Json<AssignRoleRequest>,
) -> Result<impl IntoResponse, AppError> {
    info!(
        "Admin {} revoking role '{}' from '{}' (location: {:?})",
        admin.email, request.role, request.user, request.location
    );

    match state
        .auth_service
        .revoke_role(&request.user, &request.role, request.location.clone())
        .await
    {
        Ok(_) => Ok(Json(AdminActionResponse {
            success: true,
            message: format!(
                "Role '{}' revoked from '{}' successfully",
                request.role, request.user
            ),
        })),
        Err(e) => {
            tracing::error!("Failed to revoke role: {}", e);
            Ok(Json(AdminActionResponse {
                success: false,
                message: format!("Failed to revoke role: {}", e),
            }))
        }
    }
}
