use axum::{debug_handler, extract::State, response::IntoResponse, Extension, Json};

use crate::{api::basic_auth::CurrentUser, api::error::AppError, app_state::SharedAppState};
use lendhub_core::authorization::EffectivePermissions;

#[utoipa::path(
    get,
    path = "/api/v1/authenticated/me/permissions",
    responses(
    (status = 200, response = inline(EffectivePermissions)),
    (status = 401, description = "Access token is missing or invalid"),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
#[debug_handler]
pub async fn my_permissions_handler(
    State(state): State<SharedAppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<impl IntoResponse, AppError> {
    let permissions = state.auth_service.effective_permissions(&user.email).await;
    Ok(Json(permissions))
}
