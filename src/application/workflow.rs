//! Scan workflow — centralised state-machine controller for scan jobs.
//!
//! Every status transition goes through [`ScanWorkflow`], which validates the
//! transition against the state machine on [`ScanStatus`], persists the new
//! state, and logs it. Use cases call the workflow instead of mutating job
//! status directly.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::domain::scan::{
    ScanJob, ScanRepository, ScanStatus, ScanTransitionError, StoreError,
};

/// Errors from the workflow layer.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("Invalid state transition: {0}")]
    InvalidTransition(#[from] ScanTransitionError),

    #[error("Persistence error: {0}")]
    Store(#[from] StoreError),
}

/// Centralised job lifecycle controller.
#[derive(Clone)]
pub struct ScanWorkflow {
    repository: Arc<dyn ScanRepository>,
}

impl ScanWorkflow {
    pub fn new(repository: Arc<dyn ScanRepository>) -> Self {
        Self { repository }
    }

    /// Transition a job to [`ScanStatus::Running`] and persist.
    pub async fn start_job(&self, job: &mut ScanJob) -> Result<(), WorkflowError> {
        job.transition(ScanStatus::Running)?;
        self.repository.update_status(job.id, ScanStatus::Running).await?;

        info!(job_id = %job.id, "Scan job transitioned to Running");
        Ok(())
    }

    /// Transition a job to [`ScanStatus::Completed`] and persist the terminal
    /// fields. The severity counts are derived from the job's persisted
    /// findings inside the same finalize write.
    pub async fn complete_job(
        &self,
        job: &mut ScanJob,
        end_time: DateTime<Utc>,
    ) -> Result<(), WorkflowError> {
        job.transition(ScanStatus::Completed)?;
        job.end_time = Some(end_time);
        self.repository
            .finalize(job.id, ScanStatus::Completed, end_time)
            .await?;

        info!(job_id = %job.id, "Scan job transitioned to Completed");
        Ok(())
    }

    /// Transition a job to [`ScanStatus::Failed`] with an error message and
    /// persist the terminal fields.
    pub async fn fail_job(&self, job: &mut ScanJob, error: &str) -> Result<(), WorkflowError> {
        job.status_message = format!("Scan failed: {error}");
        job.transition(ScanStatus::Failed)?;

        // Best-effort: surface the failure reason in the status message
        // without regressing the recorded progress.
        if let Err(store_error) = self
            .repository
            .update_progress(job.id, job.progress, &job.status_message)
            .await
        {
            warn!(job_id = %job.id, error = %store_error, "Failed to persist failure message");
        }

        let end_time = Utc::now();
        job.end_time = Some(end_time);
        self.repository
            .finalize(job.id, ScanStatus::Failed, end_time)
            .await?;

        warn!(job_id = %job.id, error, "Scan job transitioned to Failed");
        Ok(())
    }
}
