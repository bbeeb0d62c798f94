//! Scan report generation.

pub mod models;
pub mod service;

pub use models::{ReportSummary, ScanReport};
pub use service::{ReportService, ReportServiceImpl};

/// Errors from the report generation collaborator.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Report rendering failed: {0}")]
    Render(String),
}
