//! Application setup and wiring

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use sqlx::postgres::PgPoolOptions;

use crate::application::alerts::AlertDispatcher;
use crate::application::reporting::{ReportService, ReportServiceImpl};
use crate::application::scan::{ExecuteScanUseCase, SubmitScanUseCase};
use crate::application::workflow::ScanWorkflow;
use crate::config::Config;
use crate::domain::scan::ScanRepository;
use crate::infrastructure::api_clients::{
    RiskModelApiClient, RiskScorerGateway, ScannerApiClient, ScannerGateway,
};
use crate::infrastructure::notifications::{AlertNotifier, LogNotifier, WebhookNotifier};
use crate::infrastructure::persistence::PgScanRepository;
use crate::infrastructure::workers::JobRunner;
use crate::presentation::{AppState, create_router};

/// Create the application router with all dependencies wired.
pub async fn create_app(
    config: Config,
) -> Result<Router, Box<dyn std::error::Error + Send + Sync>> {
    let config = Arc::new(config);

    // Pooled database connection shared by all repository operations
    let db_pool = Arc::new(
        PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .acquire_timeout(Duration::from_secs(config.database.connect_timeout_seconds))
            .connect(&config.database.url)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to connect to database");
                e
            })?,
    );

    let pg_repository = Arc::new(PgScanRepository::new(db_pool));
    pg_repository.ensure_schema().await?;
    let repository: Arc<dyn ScanRepository> = pg_repository;

    // External collaborator gateways
    let scanner: Arc<dyn ScannerGateway> = Arc::new(ScannerApiClient::new(&config.apis.scanner)?);
    let scorer: Arc<dyn RiskScorerGateway> =
        Arc::new(RiskModelApiClient::new(&config.apis.risk_model)?);

    let notifier: Arc<dyn AlertNotifier> = match &config.alerts.webhook_url {
        Some(webhook_url) => {
            tracing::info!(webhook_url, "Alert delivery via webhook");
            Arc::new(WebhookNotifier::new(webhook_url.clone(), &config.alerts)?)
        }
        None => {
            tracing::info!("No alert webhook configured; alerts are log-only");
            Arc::new(LogNotifier)
        }
    };

    let workflow = ScanWorkflow::new(repository.clone());
    let alerts = Arc::new(AlertDispatcher::new(
        notifier,
        config.alerts.risk_threshold,
    ));
    let report_service: Arc<dyn ReportService> = Arc::new(ReportServiceImpl::new());

    let execute_use_case = Arc::new(ExecuteScanUseCase::new(
        scanner,
        scorer,
        repository.clone(),
        workflow.clone(),
        alerts,
        report_service.clone(),
    ));
    let runner = Arc::new(JobRunner::new(config.scan.max_concurrent_jobs));
    let submit_use_case = Arc::new(SubmitScanUseCase::new(
        repository.clone(),
        workflow,
        runner,
        execute_use_case,
    ));

    let state = AppState {
        submit_use_case,
        repository,
        report_service,
        config: config.clone(),
    };

    Ok(create_router(state, &config))
}
