use axum::http::StatusCode;
use axum::{
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use uuid::Uuid;

#[derive(Clone, Error, Debug, utoipa::ToResponse, utoipa::ToSchema)]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    #[error("Internal server error: {0}")]
    InternalServerError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Item not found: {0}")]
    ItemNotFound(Uuid),

    #[error("Bundle not found: {0}")]
    BundleNotFound(Uuid),

    #[error("Loan not found: {0}")]
    LoanNotFound(Uuid),

    #[error("Location not found: {0}")]
    LocationNotFound(String),

    #[error("Role not found: {0}")]
    RoleNotFound(String),

    #[error("Item is not available for loan: {0}")]
    ItemNotAvailable(Uuid),

    #[error("Loan is already closed: {0}")]
    LoanAlreadyClosed(Uuid),

    #[error("Item does not belong to location {0}")]
    ItemNotInLocation(String),

    #[error("Location already exists: {0}")]
    LocationAlreadyExists(String),
}

impl AppError {
    fn get_error_msg(&self) -> (axum::http::StatusCode, String) {
        let status: axum::http::StatusCode = match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::ItemNotFound(_) => StatusCode::NOT_FOUND,
            AppError::BundleNotFound(_) => StatusCode::NOT_FOUND,
            AppError::LoanNotFound(_) => StatusCode::NOT_FOUND,
            AppError::LocationNotFound(_) => StatusCode::NOT_FOUND,
            AppError::RoleNotFound(_) => StatusCode::NOT_FOUND,
            AppError::ItemNotAvailable(_) => StatusCode::CONFLICT,
            AppError::LoanAlreadyClosed(_) => StatusCode::CONFLICT,
            AppError::ItemNotInLocation(_) => StatusCode::BAD_REQUEST,
            AppError::LocationAlreadyExists(_) => StatusCode::CONFLICT,
        };

        (status, self.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        if let Some(app_error) = e.downcast_ref::<AppError>() {
            return app_error.clone();
        }
        AppError::InternalServerError(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.get_error_msg();
        let body = serde_json::json!({ "error": true, "message": body });
        (status, Json(body)).into_response()
    }
}
