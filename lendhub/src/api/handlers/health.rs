use axum::{debug_handler, response::IntoResponse, Json};

#[utoipa::path(
    get,
    path = "/api/v1/health",
    responses(
    (status = 200, description = "Health check")
    )
)]
#[debug_handler]
pub async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
