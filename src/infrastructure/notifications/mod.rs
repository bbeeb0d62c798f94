//! Alert notification delivery.
//!
//! Alerts leave the pipeline through [`AlertNotifier`]; delivery transports
//! live behind that boundary. The shipped transport posts alerts to a
//! configured webhook URL. When no webhook is configured, alerts are only
//! written to the log.

pub mod webhook;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

pub use webhook::WebhookNotifier;

/// A notification produced by the alert dispatcher.
#[derive(Debug, Clone, Serialize)]
pub struct Alert {
    pub subject: String,
    pub body: String,
    pub triggered_at: DateTime<Utc>,
}

impl Alert {
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
            triggered_at: Utc::now(),
        }
    }
}

/// Errors surfaced by a notification transport. Callers log these; they are
/// never allowed to destabilize the scan pipeline.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Failed to deliver notification: {0}")]
    Delivery(String),
}

/// Notification delivery transport.
#[async_trait]
pub trait AlertNotifier: Send + Sync {
    async fn notify(&self, alert: &Alert) -> Result<(), NotifyError>;
}

/// Fallback notifier used when no delivery transport is configured: the
/// alert is recorded in the log and nothing else happens.
pub struct LogNotifier;

#[async_trait]
impl AlertNotifier for LogNotifier {
    async fn notify(&self, alert: &Alert) -> Result<(), NotifyError> {
        tracing::warn!(subject = %alert.subject, body = %alert.body, "Alert (no transport configured)");
        Ok(())
    }
}
