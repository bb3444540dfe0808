use axum::{
    debug_handler,
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::{api::error::AppError, app_state::SharedAppState};
use lendhub_core::loans::loan::LoanStatus;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ExportParams {
    /// Borrower email to export loans for
    pub email: String,
}

#[utoipa::path(
    get,
    path = "/api/v1/authenticated/privacy/export",
    params(ExportParams),
    responses(
    (status = 200, description = "All loans held for the given borrower email"),
    (status = 401, description = "Access token is missing or invalid"),
    (status = 403, description = "Insufficient permissions - privacy.manage required"),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
#[debug_handler]
pub async fn export_borrower_data_handler(
    State(state): State<SharedAppState>,
    Query(params): Query<ExportParams>,
) -> Result<impl IntoResponse, AppError> {
    if params.email.trim().is_empty() {
        return Err(AppError::InvalidInput("Email is required".to_string()));
    }

    info!("Subject-access export for borrower email");
    let loans = state.loans.loans_for_email(&params.email).await;
    Ok(Json(serde_json::json!({
        "email": params.email,
        "loans": loans,
    })))
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct AnonymizeRequest {
    pub email: String,
}

#[utoipa::path(
    post,
    path = "/api/v1/authenticated/privacy/anonymize",
    request_body = AnonymizeRequest,
    responses(
    (status = 200, description = "Borrower data redacted on all closed loans"),
    (status = 401, description = "Access token is missing or invalid"),
    (status = 403, description = "Insufficient permissions - privacy.manage required"),
    (status = 409, description = "Borrower still holds open loans"),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
#[debug_handler]
pub async fn anonymize_borrower_handler(
    State(state): State<SharedAppState>,
    Json(request): Json<AnonymizeRequest>,
) -> Result<impl IntoResponse, AppError> {
    if request.email.trim().is_empty() {
        return Err(AppError::InvalidInput("Email is required".to_string()));
    }

    // Open loans still need the contact data for the return.
    let open = state
        .loans
        .loans_for_email(&request.email)
        .await
        .into_iter()
        .any(|loan| loan.is_open());
    if open {
        return Err(AppError::InvalidInput(
            "Borrower still holds open loans".to_string(),
        ));
    }

    let email = request.email.clone();
    let anonymized = state
        .loans
        .update_loans_where(
            |loan| {
                loan.status == LoanStatus::Returned
                    && !loan.is_anonymized()
                    && loan.borrower.email.eq_ignore_ascii_case(&email)
            },
            |loan| loan.anonymize(),
        )
        .await;

    info!("Anonymized {} loans on request", anonymized.len());
    Ok(Json(serde_json::json!({
        "success": true,
        "anonymized": anonymized.len(),
    })))
}
