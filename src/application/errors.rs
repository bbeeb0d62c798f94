//! Application-level error types

use crate::application::reporting::ReportError;

/// Errors from calls to external HTTP collaborators.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Service unavailable")]
    ServiceUnavailable,
}

/// Fatal errors that abort a running scan job.
///
/// Scanner unavailability is deliberately absent: an unreachable scanner
/// degrades the job to an empty result set instead of failing it, while an
/// unreachable scorer cannot be defaulted without fabricating risk data.
#[derive(Debug, thiserror::Error)]
pub enum OrchestrationError {
    #[error("Risk scoring failed: {0}")]
    Scoring(#[source] ApiError),

    #[error("Report generation failed: {0}")]
    Report(#[from] ReportError),
}
