//! Scan persistence interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::entities::{Finding, ScanJob};
use super::value_objects::ScanStatus;

/// Scan persistence errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Scan job not found: {0}")]
    NotFound(Uuid),
    #[error("Database error: {0}")]
    Database(String),
}

/// Record store for scan jobs and their findings.
///
/// Every write is atomic per call; callers do not get cross-call
/// transactions. Pipeline code treats progress writes as best-effort, while
/// job creation failures abort submission.
#[async_trait]
pub trait ScanRepository: Send + Sync {
    /// Create a new job record for the target and return it with its
    /// assigned identity.
    async fn create_job(&self, target_url: &str) -> Result<ScanJob, StoreError>;

    /// Update a job's status without touching terminal fields.
    async fn update_status(&self, job_id: Uuid, status: ScanStatus) -> Result<(), StoreError>;

    /// Update a job's progress percentage and status message.
    async fn update_progress(
        &self,
        job_id: Uuid,
        progress: u8,
        message: &str,
    ) -> Result<(), StoreError>;

    /// Atomically set the terminal status, end time, total findings, and the
    /// severity counts computed from the job's persisted findings.
    async fn finalize(
        &self,
        job_id: Uuid,
        status: ScanStatus,
        end_time: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Append a scored finding to its job. Each finding is written exactly
    /// once, after its score is known.
    async fn append_finding(&self, finding: &Finding) -> Result<(), StoreError>;

    async fn get_job(&self, job_id: Uuid) -> Result<Option<ScanJob>, StoreError>;

    /// Findings for a job, highest AI risk score first.
    async fn get_findings(&self, job_id: Uuid) -> Result<Vec<Finding>, StoreError>;

    /// Jobs ordered newest first.
    async fn list_jobs(&self, skip: i64, limit: i64) -> Result<Vec<ScanJob>, StoreError>;

    /// Administrative bulk reset: delete all jobs and findings.
    async fn reset_all(&self) -> Result<(), StoreError>;
}
