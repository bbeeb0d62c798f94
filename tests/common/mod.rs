//! Shared fixtures for integration tests
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use bughunter::application::alerts::AlertDispatcher;
use bughunter::application::reporting::{ReportService, ReportServiceImpl};
use bughunter::application::scan::{ExecuteScanUseCase, SubmitScanUseCase};
use bughunter::application::workflow::ScanWorkflow;
use bughunter::config::{RetryConfigSerializable, RiskModelConfig, ScannerConfig};
use bughunter::domain::scan::{
    Finding, ScanJob, ScanRepository, ScanStatus, SeverityCounts, StoreError,
};
use bughunter::infrastructure::api_clients::{RiskModelApiClient, ScannerApiClient};
use bughunter::infrastructure::notifications::{Alert, AlertNotifier, NotifyError};
use bughunter::infrastructure::workers::JobRunner;

/// In-memory scan repository recording every progress write, used as the
/// persistence double in pipeline and endpoint tests.
#[derive(Default)]
pub struct InMemoryScanRepository {
    jobs: Mutex<HashMap<Uuid, ScanJob>>,
    findings: Mutex<Vec<Finding>>,
    pub progress_log: Mutex<Vec<(u8, String)>>,
}

impl InMemoryScanRepository {
    pub fn progress_values(&self) -> Vec<u8> {
        self.progress_log
            .lock()
            .unwrap()
            .iter()
            .map(|(value, _)| *value)
            .collect()
    }

    pub fn stored_findings(&self) -> Vec<Finding> {
        self.findings.lock().unwrap().clone()
    }
}

#[async_trait]
impl ScanRepository for InMemoryScanRepository {
    async fn create_job(&self, target_url: &str) -> Result<ScanJob, StoreError> {
        let job = ScanJob::new(target_url);
        self.jobs.lock().unwrap().insert(job.id, job.clone());
        Ok(job)
    }

    async fn update_status(&self, job_id: Uuid, status: ScanStatus) -> Result<(), StoreError> {
        let mut jobs = self.jobs.lock().unwrap();
        let job = jobs.get_mut(&job_id).ok_or(StoreError::NotFound(job_id))?;
        job.status = status;
        Ok(())
    }

    async fn update_progress(
        &self,
        job_id: Uuid,
        progress: u8,
        message: &str,
    ) -> Result<(), StoreError> {
        self.progress_log
            .lock()
            .unwrap()
            .push((progress, message.to_string()));

        let mut jobs = self.jobs.lock().unwrap();
        let job = jobs.get_mut(&job_id).ok_or(StoreError::NotFound(job_id))?;
        job.progress = progress;
        job.status_message = message.to_string();
        Ok(())
    }

    async fn finalize(
        &self,
        job_id: Uuid,
        status: ScanStatus,
        end_time: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let job_findings: Vec<Finding> = self
            .findings
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.job_id == job_id)
            .cloned()
            .collect();

        let mut jobs = self.jobs.lock().unwrap();
        let job = jobs.get_mut(&job_id).ok_or(StoreError::NotFound(job_id))?;
        job.status = status;
        job.end_time = Some(end_time);
        job.total_findings = job_findings.len() as u32;
        job.severity_counts = SeverityCounts::from_findings(&job_findings);
        Ok(())
    }

    async fn append_finding(&self, finding: &Finding) -> Result<(), StoreError> {
        self.findings.lock().unwrap().push(finding.clone());
        Ok(())
    }

    async fn get_job(&self, job_id: Uuid) -> Result<Option<ScanJob>, StoreError> {
        Ok(self.jobs.lock().unwrap().get(&job_id).cloned())
    }

    async fn get_findings(&self, job_id: Uuid) -> Result<Vec<Finding>, StoreError> {
        let mut findings: Vec<Finding> = self
            .findings
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.job_id == job_id)
            .cloned()
            .collect();
        findings.sort_by(|a, b| {
            b.ai_risk_score
                .partial_cmp(&a.ai_risk_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(findings)
    }

    async fn list_jobs(&self, skip: i64, limit: i64) -> Result<Vec<ScanJob>, StoreError> {
        let mut jobs: Vec<ScanJob> = self.jobs.lock().unwrap().values().cloned().collect();
        jobs.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        Ok(jobs
            .into_iter()
            .skip(skip.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn reset_all(&self) -> Result<(), StoreError> {
        self.findings.lock().unwrap().clear();
        self.jobs.lock().unwrap().clear();
        Ok(())
    }
}

/// Notifier capturing every alert it is asked to deliver.
#[derive(Default)]
pub struct RecordingNotifier {
    pub alerts: Mutex<Vec<Alert>>,
}

#[async_trait]
impl AlertNotifier for RecordingNotifier {
    async fn notify(&self, alert: &Alert) -> Result<(), NotifyError> {
        self.alerts.lock().unwrap().push(alert.clone());
        Ok(())
    }
}

/// Retry policy shrunk for tests: same attempt count, negligible delay.
pub fn fast_retry() -> RetryConfigSerializable {
    RetryConfigSerializable {
        max_attempts: 3,
        delay_ms: 1,
    }
}

pub fn scanner_config(base_url: &str) -> ScannerConfig {
    ScannerConfig {
        base_url: base_url.to_string(),
        timeout_seconds: 5,
        retry: fast_retry(),
    }
}

pub fn risk_model_config(base_url: &str) -> RiskModelConfig {
    RiskModelConfig {
        base_url: base_url.to_string(),
        timeout_seconds: 5,
        retry: fast_retry(),
    }
}

/// Fully wired pipeline against real HTTP clients pointed at mock servers.
pub struct PipelineHarness {
    pub repository: Arc<InMemoryScanRepository>,
    pub notifier: Arc<RecordingNotifier>,
    pub workflow: ScanWorkflow,
    pub execute_use_case: Arc<ExecuteScanUseCase>,
    pub submit_use_case: Arc<SubmitScanUseCase>,
}

impl PipelineHarness {
    pub fn new(scanner_url: &str, scorer_url: &str) -> Self {
        let repository = Arc::new(InMemoryScanRepository::default());
        let notifier = Arc::new(RecordingNotifier::default());

        let scanner = Arc::new(ScannerApiClient::new(&scanner_config(scanner_url)).unwrap());
        let scorer = Arc::new(RiskModelApiClient::new(&risk_model_config(scorer_url)).unwrap());

        let workflow = ScanWorkflow::new(repository.clone());
        let alerts = Arc::new(AlertDispatcher::new(notifier.clone(), 9.0));
        let report_service: Arc<dyn ReportService> = Arc::new(ReportServiceImpl::new());

        let execute_use_case = Arc::new(ExecuteScanUseCase::new(
            scanner,
            scorer,
            repository.clone(),
            workflow.clone(),
            alerts,
            report_service,
        ));

        let submit_use_case = Arc::new(SubmitScanUseCase::new(
            repository.clone(),
            workflow.clone(),
            Arc::new(JobRunner::new(2)),
            execute_use_case.clone(),
        ));

        Self {
            repository,
            notifier,
            workflow,
            execute_use_case,
            submit_use_case,
        }
    }

    /// Create a job, move it to Running, and run the pipeline to a terminal
    /// state on the current task (no background scheduling).
    pub async fn run_scan(&self, target_url: &str) -> ScanJob {
        let mut job = self.repository.create_job(target_url).await.unwrap();
        self.workflow.start_job(&mut job).await.unwrap();
        let job_id = job.id;

        self.execute_use_case.execute(job).await;

        self.repository.get_job(job_id).await.unwrap().unwrap()
    }
}
