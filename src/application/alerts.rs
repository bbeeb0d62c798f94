//! Threshold-based alert dispatch.
//!
//! Two situations raise alerts: a finding whose AI risk score crosses the
//! critical threshold, and a job transitioning to `failed`. Dispatch is
//! best-effort — delivery errors are logged and never propagated into the
//! scan pipeline.

use std::sync::Arc;

use tracing::warn;

use crate::domain::scan::{Finding, ScanJob};
use crate::infrastructure::notifications::{Alert, AlertNotifier};

/// Default AI risk score at or above which a finding triggers an alert.
pub const CRITICAL_RISK_THRESHOLD: f64 = 9.0;

pub struct AlertDispatcher {
    notifier: Arc<dyn AlertNotifier>,
    risk_threshold: f64,
}

impl AlertDispatcher {
    pub fn new(notifier: Arc<dyn AlertNotifier>, risk_threshold: f64) -> Self {
        Self {
            notifier,
            risk_threshold,
        }
    }

    /// Fire a critical-finding alert if the finding's risk score qualifies.
    pub async fn dispatch_finding_alert(&self, job: &ScanJob, finding: &Finding) {
        if finding.ai_risk_score < self.risk_threshold {
            return;
        }

        let alert = Alert::new(
            format!("CRITICAL VULN: {}", finding.finding_type),
            format!(
                "Critical vulnerability found at {}\nAI risk score: {:.1}",
                job.target_url, finding.ai_risk_score
            ),
        );
        self.deliver(alert).await;
    }

    /// Fire a failure alert carrying enough context to diagnose the cause.
    pub async fn dispatch_failure_alert(&self, job: &ScanJob, error: &str) {
        let alert = Alert::new(
            format!("SCAN FAILED: {} - {}", job.id, job.target_url),
            format!("Scan failed with error: {error}"),
        );
        self.deliver(alert).await;
    }

    async fn deliver(&self, alert: Alert) {
        if let Err(error) = self.notifier.notify(&alert).await {
            warn!(subject = %alert.subject, error = %error, "Alert delivery failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use uuid::Uuid;

    use crate::infrastructure::notifications::NotifyError;

    #[derive(Default)]
    struct RecordingNotifier {
        alerts: Mutex<Vec<Alert>>,
        fail: bool,
    }

    #[async_trait]
    impl AlertNotifier for RecordingNotifier {
        async fn notify(&self, alert: &Alert) -> Result<(), NotifyError> {
            self.alerts.lock().unwrap().push(alert.clone());
            if self.fail {
                Err(NotifyError::Delivery("boom".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn test_finding(ai_risk_score: f64) -> Finding {
        Finding {
            id: Uuid::new_v4(),
            job_id: Uuid::new_v4(),
            finding_type: "SQL Injection".to_string(),
            severity: "Critical".to_string(),
            cvss_score: 9.8,
            ai_risk_score,
            description: String::new(),
            affected_url: String::new(),
            discovered_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_finding_alert_respects_threshold() {
        let notifier = Arc::new(RecordingNotifier::default());
        let dispatcher = AlertDispatcher::new(notifier.clone(), CRITICAL_RISK_THRESHOLD);
        let job = ScanJob::new("http://example.com");

        dispatcher
            .dispatch_finding_alert(&job, &test_finding(7.5))
            .await;
        assert!(notifier.alerts.lock().unwrap().is_empty());

        dispatcher
            .dispatch_finding_alert(&job, &test_finding(9.5))
            .await;
        let alerts = notifier.alerts.lock().unwrap();
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].subject.contains("SQL Injection"));
    }

    #[tokio::test]
    async fn test_threshold_is_inclusive() {
        let notifier = Arc::new(RecordingNotifier::default());
        let dispatcher = AlertDispatcher::new(notifier.clone(), CRITICAL_RISK_THRESHOLD);
        let job = ScanJob::new("http://example.com");

        dispatcher
            .dispatch_finding_alert(&job, &test_finding(9.0))
            .await;
        assert_eq!(notifier.alerts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failure_alert_carries_job_context() {
        let notifier = Arc::new(RecordingNotifier::default());
        let dispatcher = AlertDispatcher::new(notifier.clone(), CRITICAL_RISK_THRESHOLD);
        let job = ScanJob::new("http://example.com");

        dispatcher
            .dispatch_failure_alert(&job, "scorer unreachable")
            .await;

        let alerts = notifier.alerts.lock().unwrap();
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].subject.contains(&job.id.to_string()));
        assert!(alerts[0].subject.contains("http://example.com"));
        assert!(alerts[0].body.contains("scorer unreachable"));
    }

    #[tokio::test]
    async fn test_delivery_failure_is_swallowed() {
        let notifier = Arc::new(RecordingNotifier {
            fail: true,
            ..RecordingNotifier::default()
        });
        let dispatcher = AlertDispatcher::new(notifier, CRITICAL_RISK_THRESHOLD);
        let job = ScanJob::new("http://example.com");

        // Must not panic or propagate.
        dispatcher.dispatch_failure_alert(&job, "boom").await;
    }
}
