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
    notification::notify::notify_all, services::authorization::Permission,
};
use lendhub_core::{
    inventory::item::{Item, ItemStatus},
    inventory::shared_inventory::ItemVec,
    notification_types::{Message, MessageType},
};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ItemListParams {
    /// Restrict the listing to one location
    pub location: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/authenticated/items",
    params(ItemListParams),
    responses(
    (status = 200, response = inline(ItemVec)),
    (status = 401, description = "Access token is missing or invalid"),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
#[debug_handler]
pub async fn list_items_handler(
    State(state): State<SharedAppState>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<ItemListParams>,
) -> Result<impl IntoResponse, AppError> {
    let visible = state
        .auth_service
        .visible_locations(&user.email, Permission::InventoryView)
        .await;
    let mut items = state.inventory.get_items(params.location.as_deref()).await;
    if let Some(visible) = &visible {
        items.items.retain(|item| visible.contains(&item.location_id));
    }
    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/api/v1/authenticated/items/{item_id}",
    responses(
    (status = 200, response = inline(Item)),
    (status = 401, description = "Access token is missing or invalid"),
    (status = 404, description = "Item not found"),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
#[debug_handler]
pub async fn get_item_handler(
    State(state): State<SharedAppState>,
    Extension(user): Extension<CurrentUser>,
    Path(item_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let item = state
        .inventory
        .get_item(&item_id)
        .await
        .ok_or(AppError::ItemNotFound(item_id))?;
    let visible = state
        .auth_service
        .visible_locations(&user.email, Permission::InventoryView)
        .await;
    // Out-of-scope items read as missing records.
    if let Some(visible) = &visible {
        if !visible.contains(&item.location_id) {
            return Err(AppError::ItemNotFound(item_id));
        }
    }
    Ok(Json(item))
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateItemRequest {
    pub name: String,
    pub category: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/v1/authenticated/locations/{location_id}/items",
    request_body = CreateItemRequest,
    responses(
    (status = 200, response = inline(Item)),
    (status = 400, description = "Invalid request data"),
    (status = 401, description = "Access token is missing or invalid"),
    (status = 403, description = "Insufficient permissions - inventory.manage required"),
    (status = 404, description = "Location not found"),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
#[debug_handler]
pub async fn create_item_handler(
    State(state): State<SharedAppState>,
    Path(location_id): Path<String>,
    Json(request): Json<CreateItemRequest>,
) -> Result<impl IntoResponse, AppError> {
    if request.name.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Item name cannot be empty".to_string(),
        ));
    }
    if !state.locations.has_location(&location_id).await {
        return Err(AppError::LocationNotFound(location_id));
    }

    let item = Item::new(&request.name, &location_id, request.category);
    info!("Created item '{}' at location {}", item.slug, location_id);
    state.inventory.add_item(item.clone()).await;
    Ok(Json(item))
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SetItemStatusRequest {
    pub status: ItemStatus,
}

#[utoipa::path(
    put,
    path = "/api/v1/authenticated/locations/{location_id}/items/{item_id}/status",
    request_body = SetItemStatusRequest,
    responses(
    (status = 200, response = inline(Item)),
    (status = 400, description = "Item does not belong to this location"),
    (status = 401, description = "Access token is missing or invalid"),
    (status = 403, description = "Insufficient permissions - inventory.manage required"),
    (status = 404, description = "Item not found"),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
#[debug_handler]
pub async fn set_item_status_handler(
    State(state): State<SharedAppState>,
    Path((location_id, item_id)): Path<(String, Uuid)>,
    Json(request): Json<SetItemStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    let item = state
        .inventory
        .get_item(&item_id)
        .await
        .ok_or(AppError::ItemNotFound(item_id))?;
    if item.location_id != location_id {
        return Err(AppError::ItemNotInLocation(location_id));
    }

    let updated = state
        .inventory
        .update_item(&item_id, |item| item.set_status(request.status))
        .await
        .ok_or(AppError::ItemNotFound(item_id))?;

    if request.status == ItemStatus::Retired {
        let msg = Message::new(
            MessageType::ItemRetired,
            &updated.slug,
            Some(location_id.clone()),
        );
        notify_all(&state, &msg).await;
    }

    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/api/v1/authenticated/locations/{location_id}/items/{item_id}",
    responses(
    (status = 200, description = "Item removed"),
    (status = 400, description = "Item does not belong to this location"),
    (status = 401, description = "Access token is missing or invalid"),
    (status = 403, description = "Insufficient permissions - inventory.manage required"),
    (status = 404, description = "Item not found"),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
#[debug_handler]
pub async fn delete_item_handler(
    State(state): State<SharedAppState>,
    Path((location_id, item_id)): Path<(String, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    let item = state
        .inventory
        .get_item(&item_id)
        .await
        .ok_or(AppError::ItemNotFound(item_id))?;
    if item.location_id != location_id {
        return Err(AppError::ItemNotInLocation(location_id));
    }

    state.inventory.remove_item(&item_id).await;
    info!("Removed item '{}' from location {}", item.slug, location_id);
    Ok(Json(serde_json::json!({ "success": true })))
}
