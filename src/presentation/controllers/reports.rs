//! Report rendering endpoint

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tracing::error;
use uuid::Uuid;

use crate::presentation::controllers::AppState;
use crate::presentation::models::ReportQuery;

/// GET /api/reports/{id} - Render the report document for a scan
#[utoipa::path(
    get,
    path = "/api/reports/{id}",
    params(
        ("id" = Uuid, Path, description = "Scan job ID"),
        ReportQuery
    ),
    responses(
        (status = 200, description = "Rendered report", body = String, content_type = "text/plain"),
        (status = 404, description = "Scan not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "reports"
)]
pub async fn get_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, StatusCode> {
    let job = match state.repository.get_job(id).await {
        Ok(Some(job)) => job,
        Ok(None) => return Err(StatusCode::NOT_FOUND),
        Err(e) => {
            error!(job_id = %id, error = %e, "Failed to retrieve scan for report");
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let findings = state.repository.get_findings(id).await.map_err(|e| {
        error!(job_id = %id, error = %e, "Failed to retrieve findings for report");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let as_html = query.format.as_deref() == Some("html");
    let rendered = if as_html {
        state.report_service.generate_html_report(&job, &findings).await
    } else {
        state.report_service.generate_report(&job, &findings).await
    };

    match rendered {
        Ok(document) if as_html => Ok(Html(document).into_response()),
        Ok(document) => Ok(document.into_response()),
        Err(e) => {
            error!(job_id = %id, error = %e, "Report generation failed");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
