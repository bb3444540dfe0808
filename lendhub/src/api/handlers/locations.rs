use axum::{
    debug_handler,
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::{api::error::AppError, app_state::SharedAppState};
use lendhub_core::locations::{
    location::{Location, OpeningHours},
    shared_locations::LocationVec,
};

#[utoipa::path(
    get,
    path = "/api/v1/authenticated/locations",
    responses(
    (status = 200, response = inline(LocationVec)),
    (status = 401, description = "Access token is missing or invalid"),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
#[debug_handler]
pub async fn list_locations_handler(
    State(state): State<SharedAppState>,
) -> Result<impl IntoResponse, AppError> {
    let locations = state.locations.get_locations().await;
    Ok(Json(locations))
}

#[utoipa::path(
    get,
    path = "/api/v1/authenticated/locations/{location_id}",
    responses(
    (status = 200, response = inline(Location)),
    (status = 401, description = "Access token is missing or invalid"),
    (status = 404, description = "Location not found"),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
#[debug_handler]
pub async fn get_location_handler(
    State(state): State<SharedAppState>,
    Path(location_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let location = state
        .locations
        .get_location(&location_id)
        .await
        .ok_or(AppError::LocationNotFound(location_id))?;
    Ok(Json(location))
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateLocationRequest {
    pub name: String,
    pub address: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/v1/authenticated/locations",
    request_body = CreateLocationRequest,
    responses(
    (status = 200, response = inline(Location)),
    (status = 400, description = "Invalid request data"),
    (status = 401, description = "Access token is missing or invalid"),
    (status = 403, description = "Insufficient permissions - location.manage required"),
    (status = 409, description = "Location already exists"),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
#[debug_handler]
pub async fn create_location_handler(
    State(state): State<SharedAppState>,
    Json(request): Json<CreateLocationRequest>,
) -> Result<impl IntoResponse, AppError> {
    if request.name.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Location name cannot be empty".to_string(),
        ));
    }

    let location = Location::new(&request.name, request.address);
    if state.locations.has_location(&location.id).await {
        return Err(AppError::LocationAlreadyExists(location.id));
    }

    info!("Created location '{}'", location.id);
    state.locations.add_location(location.clone()).await;
    Ok(Json(location))
}

#[utoipa::path(
    get,
    path = "/api/v1/authenticated/locations/{location_id}/hours",
    responses(
    (status = 200, description = "Weekly opening hours of the location"),
    (status = 401, description = "Access token is missing or invalid"),
    (status = 404, description = "Location not found"),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
#[debug_handler]
pub async fn get_opening_hours_handler(
    State(state): State<SharedAppState>,
    Path(location_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let location = state
        .locations
        .get_location(&location_id)
        .await
        .ok_or(AppError::LocationNotFound(location_id))?;
    Ok(Json(location.opening_hours))
}

#[utoipa::path(
    put,
    path = "/api/v1/authenticated/locations/{location_id}/hours",
    request_body = OpeningHours,
    responses(
    (status = 200, response = inline(Location)),
    (status = 400, description = "Invalid opening hours"),
    (status = 401, description = "Access token is missing or invalid"),
    (status = 403, description = "Insufficient permissions - hours.manage required"),
    (status = 404, description = "Location not found"),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
#[debug_handler]
pub async fn set_opening_hours_handler(
    State(state): State<SharedAppState>,
    Path(location_id): Path<String>,
    Json(hours): Json<OpeningHours>,
) -> Result<impl IntoResponse, AppError> {
    for (weekday, ranges) in &hours.weekly {
        for range in ranges {
            if range.opens >= range.closes {
                return Err(AppError::InvalidInput(format!(
                    "Opening hours for {:?} must open before they close",
                    weekday
                )));
            }
        }
    }

    let location = state
        .locations
        .set_opening_hours(&location_id, hours)
        .await
        .ok_or(AppError::LocationNotFound(location_id.clone()))?;

    info!("Updated opening hours of location '{}'", location_id);
    Ok(Json(location))
}
