use crate::api::error::AppError;
use axum::{response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use lendhub_core::authorization::{Permission, PermissionScope};

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PermissionInfo {
    pub key: String,
    pub scope: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema, utoipa::ToResponse)]
pub struct PermissionsListResponse {
    pub permissions: Vec<PermissionInfo>,
}

#[utoipa::path(
    get,
    path = "/api/v1/authenticated/admin/permissions",
    responses(
        (status = 200, response = inline(PermissionsListResponse)),
        (status = 401, description = "Access token is missing or invalid"),
        (status = 403, description = "Insufficient permissions - audit.view required"),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
pub async fn list_permissions_handler() -> Result<impl IntoResponse, AppError> {
    let permissions = Permission::all()
        .iter()
        .map(|permission| PermissionInfo {
            key: permission.as_str().to_string(),
            scope: match permission.scope() {
                PermissionScope::Global => "global",
                PermissionScope::Location => "location",
                PermissionScope::Both => "both",
            }
            .to_string(),
        })
        .collect();

    Ok(Json(PermissionsListResponse { permissions }))
}
