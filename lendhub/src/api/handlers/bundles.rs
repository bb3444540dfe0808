use axum::{
    debug_handler,
    extract::{Path, Query, State},
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::{
    api::basic_auth::CurrentUser, api::error::AppError, app_state::SharedAppState,
    services::authorization::Permission,
};
use lendhub_core::inventory::{bundle::Bundle, shared_inventory::BundleVec};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct BundleListParams {
    /// Restrict the listing to one location
    pub location: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/authenticated/bundles",
    params(BundleListParams),
    responses(
    (status = 200, response = inline(BundleVec)),
    (status = 401, description = "Access token is missing or invalid"),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
#[debug_handler]
pub async fn list_bundles_handler(
    State(state): State<SharedAppState>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<BundleListParams>,
) -> Result<impl IntoResponse, AppError> {
    let visible = state
        .auth_service
        .visible_locations(&user.email, Permission::InventoryView)
        .await;
    let mut bundles = state.bundles.get_bundles(params.location.as_deref()).await;
    if let Some(visible) = &visible {
        bundles
            .bundles
            .retain(|bundle| visible.contains(&bundle.location_id));
    }
    Ok(Json(bundles))
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateBundleRequest {
    pub name: String,
    pub item_ids: Vec<Uuid>,
}

#[utoipa::path(
    post,
    path = "/api/v1/authenticated/locations/{location_id}/bundles",
    request_body = CreateBundleRequest,
    responses(
    (status = 200, response = inline(Bundle)),
    (status = 400, description = "Invalid request data"),
    (status = 401, description = "Access token is missing or invalid"),
    (status = 403, description = "Insufficient permissions - bundle.manage required"),
    (status = 404, description = "Location or item not found"),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
#[debug_handler]
pub async fn create_bundle_handler(
    State(state): State<SharedAppState>,
    Path(location_id): Path<String>,
    Json(request): Json<CreateBundleRequest>,
) -> Result<impl IntoResponse, AppError> {
    if request.name.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Bundle name cannot be empty".to_string(),
        ));
    }
    if request.item_ids.is_empty() {
        return Err(AppError::InvalidInput(
            "Bundle must contain at least one item".to_string(),
        ));
    }
    if !state.locations.has_location(&location_id).await {
        return Err(AppError::LocationNotFound(location_id));
    }

    // Every member item must exist and belong to the bundle's location.
    for item_id in &request.item_ids {
        let item = state
            .inventory
            .get_item(item_id)
            .await
            .ok_or(AppError::ItemNotFound(*item_id))?;
        if item.location_id != location_id {
            return Err(AppError::ItemNotInLocation(location_id));
        }
    }

    let bundle = Bundle::new(&request.name, &location_id, request.item_ids);
    info!(
        "Created bundle '{}' at location {}",
        bundle.slug, location_id
    );
    state.bundles.add_bundle(bundle.clone()).await;
    Ok(Json(bundle))
}

#[utoipa::path(
    delete,
    path = "/api/v1/authenticated/locations/{location_id}/bundles/{bundle_id}",
    responses(
    (status = 200, description = "Bundle removed"),
    (status = 400, description = "Bundle does not belong to this location"),
    (status = 401, description = "Access token is missing or invalid"),
    (status = 403, description = "Insufficient permissions - bundle.manage required"),
    (status = 404, description = "Bundle not found"),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
#[debug_handler]
pub async fn delete_bundle_handler(
    State(state): State<SharedAppState>,
    Path((location_id, bundle_id)): Path<(String, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    let bundle = state
        .bundles
        .get_bundle(&bundle_id)
        .await
        .ok_or(AppError::BundleNotFound(bundle_id))?;
    if bundle.location_id != location_id {
        return Err(AppError::InvalidInput(format!(
            "Bundle does not belong to location {}",
            location_id
        )));
    }

    state.bundles.remove_bundle(&bundle_id).await;
    info!(
        "Removed bundle '{}' from location {}",
        bundle.slug, location_id
    );
    Ok(Json(serde_json::json!({ "success": true })))
}
