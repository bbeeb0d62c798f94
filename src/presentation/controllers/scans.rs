//! Scan submission and retrieval endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use tracing::error;
use uuid::Uuid;

use crate::presentation::controllers::AppState;
use crate::presentation::models::{
    PaginationQuery, ScanAcceptedResponse, ScanDetailResponse, ScanJobDto, ScanRequest,
    ScanSubmitQuery,
};

async fn submit(state: &AppState, target_url: &str) -> Result<ScanAcceptedResponse, StatusCode> {
    match state.submit_use_case.submit(target_url).await {
        Ok(job_id) => Ok(ScanAcceptedResponse {
            id: job_id,
            message: "Scan initiated. Check status_url for results.".to_string(),
            status_url: format!("/scan/{job_id}"),
        }),
        Err(e) => {
            error!(target_url, error = %e, "Failed to initialize scan");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// POST /scan?url={target} - Start a new vulnerability scan
#[utoipa::path(
    post,
    path = "/scan",
    params(ScanSubmitQuery),
    responses(
        (status = 202, description = "Scan accepted", body = ScanAcceptedResponse),
        (status = 500, description = "Scan job could not be created")
    ),
    tag = "scans"
)]
pub async fn start_scan(
    State(state): State<AppState>,
    Query(query): Query<ScanSubmitQuery>,
) -> Result<(StatusCode, Json<ScanAcceptedResponse>), StatusCode> {
    let response = submit(&state, &query.url).await?;
    Ok((StatusCode::ACCEPTED, Json(response)))
}

/// POST /api/scans - Start a new vulnerability scan (JSON body)
#[utoipa::path(
    post,
    path = "/api/scans",
    request_body = ScanRequest,
    responses(
        (status = 202, description = "Scan accepted", body = ScanAcceptedResponse),
        (status = 500, description = "Scan job could not be created")
    ),
    tag = "scans"
)]
pub async fn start_scan_json(
    State(state): State<AppState>,
    Json(request): Json<ScanRequest>,
) -> Result<(StatusCode, Json<ScanAcceptedResponse>), StatusCode> {
    let response = submit(&state, &request.target_url).await?;
    Ok((StatusCode::ACCEPTED, Json(response)))
}

/// GET /scan/{id} - Retrieve a scan with its findings
#[utoipa::path(
    get,
    path = "/scan/{id}",
    params(
        ("id" = Uuid, Path, description = "Scan job ID")
    ),
    responses(
        (status = 200, description = "Scan found", body = ScanDetailResponse),
        (status = 404, description = "Scan not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "scans"
)]
pub async fn get_scan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ScanDetailResponse>, StatusCode> {
    let job = match state.repository.get_job(id).await {
        Ok(Some(job)) => job,
        Ok(None) => return Err(StatusCode::NOT_FOUND),
        Err(e) => {
            error!(job_id = %id, error = %e, "Failed to retrieve scan");
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let findings = state.repository.get_findings(id).await.map_err(|e| {
        error!(job_id = %id, error = %e, "Failed to retrieve findings");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(ScanDetailResponse {
        job: job.into(),
        vulnerabilities: findings.into_iter().map(Into::into).collect(),
    }))
}

/// GET /api/scans - List scans, newest first
#[utoipa::path(
    get,
    path = "/api/scans",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Scan list", body = [ScanJobDto]),
        (status = 500, description = "Internal server error")
    ),
    tag = "scans"
)]
pub async fn list_scans(
    State(state): State<AppState>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<Vec<ScanJobDto>>, StatusCode> {
    let skip = query.skip.unwrap_or(0).max(0);
    let limit = query.limit.unwrap_or(10).clamp(1, 100);

    let jobs = state.repository.list_jobs(skip, limit).await.map_err(|e| {
        error!(error = %e, "Failed to list scans");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(jobs.into_iter().map(Into::into).collect()))
}
