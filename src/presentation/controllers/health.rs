//! Health check endpoint

use axum::{extract::State, response::Json};

use crate::presentation::controllers::AppState;
use crate::presentation::models::HealthResponse;

/// GET /health - Service health and configured collaborator endpoints
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        scanner_api: state.config.apis.scanner.base_url.clone(),
        ml_api: state.config.apis.risk_model.base_url.clone(),
    })
}
