use axum::{
    debug_handler,
    extract::{Path, Query, State},
    response::IntoResponse,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::{
    api::basic_auth::CurrentUser, api::error::AppError, app_state::SharedAppState,
    notification::notify::notify_all, services::authorization::Permission,
};
use lendhub_core::{
    inventory::item::ItemStatus,
    loans::loan::{Borrower, Loan, LoanStatus, LoanTarget},
    loans::shared_loan_book::LoanVec,
    notification_types::{Message, MessageType},
};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct LoanListParams {
    /// Restrict the listing to one location
    pub location: Option<String>,
    /// Restrict the listing to one loan status
    pub status: Option<LoanStatus>,
}

#[utoipa::path(
    get,
    path = "/api/v1/authenticated/loans",
    params(LoanListParams),
    responses(
    (status = 200, response = inline(LoanVec)),
    (status = 401, description = "Access token is missing or invalid"),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
#[debug_handler]
pub async fn list_loans_handler(
    State(state): State<SharedAppState>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<LoanListParams>,
) -> Result<impl IntoResponse, AppError> {
    let visible = state
        .auth_service
        .visible_locations(&user.email, Permission::LoanView)
        .await;
    let mut loans = state
        .loans
        .get_loans(params.location.as_deref(), params.status)
        .await;
    if let Some(visible) = &visible {
        loans.loans.retain(|loan| visible.contains(&loan.location_id));
    }
    Ok(Json(loans))
}

#[utoipa::path(
    get,
    path = "/api/v1/authenticated/loans/{loan_id}",
    responses(
    (status = 200, response = inline(Loan)),
    (status = 401, description = "Access token is missing or invalid"),
    (status = 404, description = "Loan not found"),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
#[debug_handler]
pub async fn get_loan_handler(
    State(state): State<SharedAppState>,
    Extension(user): Extension<CurrentUser>,
    Path(loan_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let loan = state
        .loans
        .get_loan(&loan_id)
        .await
        .ok_or(AppError::LoanNotFound(loan_id))?;
    let visible = state
        .auth_service
        .visible_locations(&user.email, Permission::LoanView)
        .await;
    // Out-of-scope loans read as missing records; borrower data never
    // leaves the authorized locations.
    if let Some(visible) = &visible {
        if !visible.contains(&loan.location_id) {
            return Err(AppError::LoanNotFound(loan_id));
        }
    }
    Ok(Json(loan))
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct OpenLoanRequest {
    pub target: LoanTarget,
    pub borrower: Borrower,
    pub due_at: DateTime<Utc>,
}

#[utoipa::path(
    post,
    path = "/api/v1/authenticated/locations/{location_id}/loans",
    request_body = OpenLoanRequest,
    responses(
    (status = 200, response = inline(Loan)),
    (status = 400, description = "Invalid request data"),
    (status = 401, description = "Access token is missing or invalid"),
    (status = 403, description = "Insufficient permissions - loan.manage required"),
    (status = 404, description = "Location, item or bundle not found"),
    (status = 409, description = "Item is not available for loan"),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
#[debug_handler]
pub async fn open_loan_handler(
    State(state): State<SharedAppState>,
    Path(location_id): Path<String>,
    Json(request): Json<OpenLoanRequest>,
) -> Result<impl IntoResponse, AppError> {
    if request.borrower.name.trim().is_empty() || request.borrower.email.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Borrower name and email are required".to_string(),
        ));
    }
    if request.due_at <= Utc::now() {
        return Err(AppError::InvalidInput(
            "Due date must lie in the future".to_string(),
        ));
    }
    if !state.locations.has_location(&location_id).await {
        return Err(AppError::LocationNotFound(location_id));
    }

    let item_ids = target_item_ids(&state, &request.target, &location_id).await?;
    // Single atomic claim: two concurrent opens on the same item cannot
    // both observe it as available.
    if let Err(item_id) = state.inventory.try_mark_on_loan(&item_ids).await {
        return match state.inventory.get_item(&item_id).await {
            None => Err(AppError::ItemNotFound(item_id)),
            Some(_) => Err(AppError::ItemNotAvailable(item_id)),
        };
    }

    let loan = Loan::new(
        request.target,
        &location_id,
        request.borrower,
        request.due_at,
    );
    info!("Opened loan {} at location {}", loan.id, location_id);
    state.loans.add_loan(loan.clone()).await;

    let msg = Message::new(
        MessageType::LoanOpened,
        &loan.id.to_string(),
        Some(location_id),
    );
    notify_all(&state, &msg).await;

    Ok(Json(loan))
}

#[utoipa::path(
    post,
    path = "/api/v1/authenticated/locations/{location_id}/loans/{loan_id}/return",
    responses(
    (status = 200, response = inline(Loan)),
    (status = 400, description = "Loan does not belong to this location"),
    (status = 401, description = "Access token is missing or invalid"),
    (status = 403, description = "Insufficient permissions - loan.manage required"),
    (status = 404, description = "Loan not found"),
    (status = 409, description = "Loan is already closed"),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
#[debug_handler]
pub async fn return_loan_handler(
    State(state): State<SharedAppState>,
    Path((location_id, loan_id)): Path<(String, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    let loan = state
        .loans
        .get_loan(&loan_id)
        .await
        .ok_or(AppError::LoanNotFound(loan_id))?;
    if loan.location_id != location_id {
        return Err(AppError::InvalidInput(format!(
            "Loan does not belong to location {}",
            location_id
        )));
    }
    if !loan.is_open() {
        return Err(AppError::LoanAlreadyClosed(loan_id));
    }

    let closed = state
        .loans
        .update_loan(&loan_id, |loan| loan.close())
        .await
        .ok_or(AppError::LoanNotFound(loan_id))?;

    // Items go back on the shelf, unless they were retired or pulled for
    // maintenance in the meantime.
    let item_ids = target_item_ids(&state, &closed.target, &location_id)
        .await
        .unwrap_or_default();
    for item_id in &item_ids {
        state
            .inventory
            .update_item(item_id, |item| {
                if item.status == ItemStatus::OnLoan {
                    item.set_status(ItemStatus::Available);
                }
            })
            .await;
    }

    info!("Closed loan {} at location {}", loan_id, location_id);
    let msg = Message::new(
        MessageType::LoanReturned,
        &loan_id.to_string(),
        Some(location_id),
    );
    notify_all(&state, &msg).await;

    Ok(Json(closed))
}

/// Resolve a loan target into its member item ids, checking that the
/// target belongs to the given location.
async fn target_item_ids(
    state: &SharedAppState,
    target: &LoanTarget,
    location_id: &str,
) -> Result<Vec<Uuid>, AppError> {
    match target {
        LoanTarget::Item(item_id) => {
            let item = state
                .inventory
                .get_item(item_id)
                .await
                .ok_or(AppError::ItemNotFound(*item_id))?;
            if item.location_id != location_id {
                return Err(AppError::ItemNotInLocation(location_id.to_string()));
            }
            Ok(vec![*item_id])
        }
        LoanTarget::Bundle(bundle_id) => {
            let bundle = state
                .bundles
                .get_bundle(bundle_id)
                .await
                .ok_or(AppError::BundleNotFound(*bundle_id))?;
            if bundle.location_id != location_id {
                return Err(AppError::InvalidInput(format!(
                    "Bundle does not belong to location {}",
                    location_id
                )));
            }
            Ok(bundle.item_ids)
        }
    }
}
