//! HTTP controllers

pub mod admin;
pub mod health;
pub mod reports;
pub mod scans;

use std::sync::Arc;

use crate::application::reporting::ReportService;
use crate::application::scan::SubmitScanUseCase;
use crate::config::Config;
use crate::domain::scan::ScanRepository;

/// Shared state handed to every HTTP handler.
#[derive(Clone)]
pub struct AppState {
    pub submit_use_case: Arc<SubmitScanUseCase>,
    pub repository: Arc<dyn ScanRepository>,
    pub report_service: Arc<dyn ReportService>,
    pub config: Arc<Config>,
}
