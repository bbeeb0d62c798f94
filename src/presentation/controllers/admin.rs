//! Administrative endpoints

use axum::{extract::State, http::StatusCode, response::Json};
use tracing::{error, info};

use crate::presentation::controllers::AppState;
use crate::presentation::models::ResetResponse;

/// DELETE /api/reset - Bulk-clear all scans and findings
#[utoipa::path(
    delete,
    path = "/api/reset",
    responses(
        (status = 200, description = "All scan data cleared", body = ResetResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "admin"
)]
pub async fn reset_all_data(
    State(state): State<AppState>,
) -> Result<Json<ResetResponse>, StatusCode> {
    state.repository.reset_all().await.map_err(|e| {
        error!(error = %e, "Failed to reset scan data");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    info!("All scan data has been reset");
    Ok(Json(ResetResponse {
        message: "All scan data has been reset successfully".to_string(),
        status: "success".to_string(),
    }))
}
