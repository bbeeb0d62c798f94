//! Scan orchestration use cases.
//!
//! `SubmitScanUseCase` owns the submission path: create the job record,
//! enter `Running`, and hand execution to the background runner without
//! blocking the caller. `ExecuteScanUseCase` owns the end-to-end pipeline:
//! scan, score each finding sequentially, persist, track progress, alert,
//! and finalize.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::application::alerts::AlertDispatcher;
use crate::application::errors::OrchestrationError;
use crate::application::progress::{
    PROGRESS_ANALYZING, PROGRESS_COMPLETE, PROGRESS_REPORTING, PROGRESS_SCANNING, ProgressTracker,
    progress_after_finding,
};
use crate::application::reporting::ReportService;
use crate::application::workflow::ScanWorkflow;
use crate::domain::scan::{
    FeatureVector, Finding, RawFinding, RiskLevel, ScanJob, ScanRepository, StoreError,
};
use crate::infrastructure::api_clients::{RiskAssessment, RiskScorerGateway, ScannerGateway};
use crate::infrastructure::workers::JobRunner;

/// Merges scoring output into findings.
#[derive(Default, Clone)]
pub struct AggregateResultsUseCase;

impl AggregateResultsUseCase {
    pub fn new() -> Self {
        Self
    }

    /// Attach the numeric risk score derived from the scorer's categorical
    /// assessment, promoting the raw finding into a persistable one.
    pub fn merge_risk(
        &self,
        job_id: Uuid,
        raw: RawFinding,
        assessment: &RiskAssessment,
    ) -> Finding {
        let level = RiskLevel::parse(assessment.risk_level.as_deref().unwrap_or("Medium"));
        raw.into_finding(job_id, level.risk_score())
    }
}

/// Creates scan jobs and schedules their execution.
pub struct SubmitScanUseCase {
    repository: Arc<dyn ScanRepository>,
    workflow: ScanWorkflow,
    runner: Arc<JobRunner>,
    execute_use_case: Arc<ExecuteScanUseCase>,
}

impl SubmitScanUseCase {
    pub fn new(
        repository: Arc<dyn ScanRepository>,
        workflow: ScanWorkflow,
        runner: Arc<JobRunner>,
        execute_use_case: Arc<ExecuteScanUseCase>,
    ) -> Self {
        Self {
            repository,
            workflow,
            runner,
            execute_use_case,
        }
    }

    /// Create a job for the target and schedule its execution in the
    /// background. Returns the job id as soon as the record exists; a
    /// creation failure aborts submission and nothing is scheduled.
    pub async fn submit(&self, target_url: &str) -> Result<Uuid, StoreError> {
        let mut job = self.repository.create_job(target_url).await?;

        if let Err(workflow_error) = self.workflow.start_job(&mut job).await {
            // The record exists, so the job still runs; only the persisted
            // status is stale until the next write.
            warn!(
                job_id = %job.id,
                error = %workflow_error,
                "Failed to persist Running transition"
            );
        }

        let job_id = job.id;
        let execute = self.execute_use_case.clone();
        self.runner.spawn(async move {
            execute.execute(job).await;
        });

        Ok(job_id)
    }
}

/// Runs one scan job to a terminal state.
pub struct ExecuteScanUseCase {
    scanner: Arc<dyn ScannerGateway>,
    scorer: Arc<dyn RiskScorerGateway>,
    repository: Arc<dyn ScanRepository>,
    workflow: ScanWorkflow,
    progress: ProgressTracker,
    alerts: Arc<AlertDispatcher>,
    report_service: Arc<dyn ReportService>,
    aggregator: AggregateResultsUseCase,
}

impl ExecuteScanUseCase {
    pub fn new(
        scanner: Arc<dyn ScannerGateway>,
        scorer: Arc<dyn RiskScorerGateway>,
        repository: Arc<dyn ScanRepository>,
        workflow: ScanWorkflow,
        alerts: Arc<AlertDispatcher>,
        report_service: Arc<dyn ReportService>,
    ) -> Self {
        let progress = ProgressTracker::new(repository.clone());
        Self {
            scanner,
            scorer,
            repository,
            workflow,
            progress,
            alerts,
            report_service,
            aggregator: AggregateResultsUseCase::new(),
        }
    }

    /// Run the job to completion. Never returns an error: fatal pipeline
    /// failures transition the job to `Failed` and raise a failure alert.
    pub async fn execute(&self, mut job: ScanJob) {
        info!(job_id = %job.id, target_url = %job.target_url, "Starting scan job");

        match self.run_pipeline(&mut job).await {
            Ok(total_findings) => {
                info!(
                    job_id = %job.id,
                    total_findings,
                    "Scan job completed"
                );
            }
            Err(pipeline_error) => {
                error!(job_id = %job.id, error = %pipeline_error, "Scan job failed");

                if let Err(workflow_error) = self
                    .workflow
                    .fail_job(&mut job, &pipeline_error.to_string())
                    .await
                {
                    error!(
                        job_id = %job.id,
                        error = %workflow_error,
                        "Failed to persist Failed state"
                    );
                }

                self.alerts
                    .dispatch_failure_alert(&job, &pipeline_error.to_string())
                    .await;
            }
        }
    }

    async fn run_pipeline(&self, job: &mut ScanJob) -> Result<usize, OrchestrationError> {
        self.progress
            .publish(job, PROGRESS_SCANNING, "Scanning target website...")
            .await;

        // Scanner exhaustion already degraded to an empty result set inside
        // the gateway; the job continues either way.
        let raw_findings = self.scanner.scan_all(&job.target_url).await.into_findings();
        let total = raw_findings.len();

        self.progress
            .publish(
                job,
                PROGRESS_ANALYZING,
                &format!("Found {total} vulnerabilities, analyzing..."),
            )
            .await;

        let mut findings = Vec::with_capacity(total);
        for (index, raw) in raw_findings.into_iter().enumerate() {
            debug!(
                job_id = %job.id,
                category = %raw.scan_category,
                "Scoring finding"
            );

            let features = FeatureVector::from_raw(&raw);
            // Scorer exhaustion is fatal: defaulting a score would fabricate
            // risk data, so the whole job fails instead.
            let assessment = self
                .scorer
                .score(&features)
                .await
                .map_err(OrchestrationError::Scoring)?;

            let finding = self.aggregator.merge_risk(job.id, raw, &assessment);

            if let Err(store_error) = self.repository.append_finding(&finding).await {
                error!(
                    job_id = %job.id,
                    error = %store_error,
                    "Failed to persist finding"
                );
            }

            self.progress
                .publish(
                    job,
                    progress_after_finding(total, index + 1),
                    &format!("Analyzing vulnerability {}/{total}...", index + 1),
                )
                .await;

            self.alerts.dispatch_finding_alert(job, &finding).await;
            findings.push(finding);
        }

        self.progress
            .publish(job, PROGRESS_REPORTING, "Generating scan report...")
            .await;

        let report = self.report_service.generate_report(job, &findings).await?;
        debug!(
            job_id = %job.id,
            report_bytes = report.len(),
            "Scan report generated"
        );

        self.progress
            .publish(job, PROGRESS_COMPLETE, "Scan completed!")
            .await;

        if let Err(workflow_error) = self.workflow.complete_job(job, Utc::now()).await {
            error!(
                job_id = %job.id,
                error = %workflow_error,
                "Failed to persist Completed state"
            );
        }

        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assessment(level: &str) -> RiskAssessment {
        RiskAssessment {
            risk_level: Some(level.to_string()),
            confidence: Some(0.9),
            probabilities: None,
        }
    }

    #[test]
    fn test_merge_risk_maps_categorical_levels() {
        let aggregator = AggregateResultsUseCase::new();
        let job_id = Uuid::new_v4();

        for (level, expected) in [
            ("Low", 3.0),
            ("Medium", 5.0),
            ("High", 7.5),
            ("Critical", 9.5),
            ("garbage", 5.0),
        ] {
            let finding =
                aggregator.merge_risk(job_id, RawFinding::default(), &assessment(level));
            assert_eq!(finding.ai_risk_score, expected, "level {level}");
            assert_eq!(finding.job_id, job_id);
        }
    }

    #[test]
    fn test_merge_risk_defaults_missing_level_to_medium() {
        let aggregator = AggregateResultsUseCase::new();
        let finding = aggregator.merge_risk(
            Uuid::new_v4(),
            RawFinding::default(),
            &RiskAssessment {
                risk_level: None,
                confidence: None,
                probabilities: None,
            },
        );
        assert_eq!(finding.ai_risk_score, 5.0);
    }
}
