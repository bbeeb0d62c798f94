//! API request and response models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::scan::{Finding, ScanJob, ScanStatus, SeverityCounts};

/// Query parameters for the query-string scan submission endpoint
#[derive(Deserialize, IntoParams)]
pub struct ScanSubmitQuery {
    /// The URL to scan
    pub url: String,
}

/// Request model for JSON-body scan submission
#[derive(Deserialize, ToSchema)]
pub struct ScanRequest {
    /// The URL to scan
    #[schema(example = "http://testphp.vulnweb.com")]
    pub target_url: String,
}

/// Response returned when a scan is accepted for asynchronous processing
#[derive(Serialize, ToSchema)]
pub struct ScanAcceptedResponse {
    /// Scan job ID for tracking
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,

    /// Message
    #[schema(example = "Scan initiated. Check status_url for results.")]
    pub message: String,

    /// URL to poll for results
    #[schema(example = "/scan/550e8400-e29b-41d4-a716-446655440000")]
    pub status_url: String,
}

/// Scan job summary
#[derive(Serialize, ToSchema)]
pub struct ScanJobDto {
    pub id: Uuid,
    pub target_url: String,
    #[schema(example = "running")]
    pub status: ScanStatus,
    /// Completion percentage, 0-100
    pub progress: u8,
    pub status_message: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub severity_counts: SeverityCounts,
    pub total_findings: u32,
}

impl From<ScanJob> for ScanJobDto {
    fn from(job: ScanJob) -> Self {
        Self {
            id: job.id,
            target_url: job.target_url,
            status: job.status,
            progress: job.progress,
            status_message: job.status_message,
            start_time: job.start_time,
            end_time: job.end_time,
            severity_counts: job.severity_counts,
            total_findings: job.total_findings,
        }
    }
}

/// A single scored finding
#[derive(Serialize, ToSchema)]
pub struct FindingDto {
    #[serde(rename = "type")]
    #[schema(example = "SQL Injection")]
    pub finding_type: String,

    #[schema(example = "Critical")]
    pub severity: String,

    pub cvss_score: f64,

    /// AI-derived risk score on the 0-10 scale
    pub ai_risk_score: f64,

    pub description: String,
    pub affected_url: String,
    pub discovered_at: DateTime<Utc>,
}

impl From<Finding> for FindingDto {
    fn from(finding: Finding) -> Self {
        Self {
            finding_type: finding.finding_type,
            severity: finding.severity,
            cvss_score: finding.cvss_score,
            ai_risk_score: finding.ai_risk_score,
            description: finding.description,
            affected_url: finding.affected_url,
            discovered_at: finding.discovered_at,
        }
    }
}

/// Scan job with its findings
#[derive(Serialize, ToSchema)]
pub struct ScanDetailResponse {
    #[serde(flatten)]
    pub job: ScanJobDto,
    pub vulnerabilities: Vec<FindingDto>,
}

/// Pagination query parameters for the scan listing
#[derive(Deserialize, IntoParams)]
pub struct PaginationQuery {
    /// Rows to skip (default 0)
    pub skip: Option<i64>,
    /// Maximum rows to return (default 10)
    pub limit: Option<i64>,
}

/// Query parameters for report rendering
#[derive(Deserialize, IntoParams)]
pub struct ReportQuery {
    /// Output format: `text` (default) or `html`
    pub format: Option<String>,
}

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,
    pub scanner_api: String,
    pub ml_api: String,
}

/// Response for the administrative reset endpoint
#[derive(Serialize, ToSchema)]
pub struct ResetResponse {
    pub message: String,
    pub status: String,
}
