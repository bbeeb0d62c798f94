//! Scan domain entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::value_objects::{ScanStatus, ScanTransitionError, SeverityCounts};

/// One end-to-end scan request and its lifecycle.
///
/// Created when a scan is submitted, mutated only while `Running`, and frozen
/// once it reaches a terminal status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanJob {
    pub id: Uuid,
    pub target_url: String,
    pub status: ScanStatus,
    /// Completion percentage, 0-100, monotonically non-decreasing.
    pub progress: u8,
    pub status_message: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    /// Computed from persisted findings at the terminal transition.
    pub severity_counts: SeverityCounts,
    pub total_findings: u32,
}

impl ScanJob {
    pub fn new(target_url: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            target_url: target_url.into(),
            status: ScanStatus::Pending,
            progress: 0,
            status_message: String::new(),
            start_time: Utc::now(),
            end_time: None,
            severity_counts: SeverityCounts::default(),
            total_findings: 0,
        }
    }

    /// Move the job to a new status, validating against the state machine.
    pub fn transition(&mut self, to: ScanStatus) -> Result<(), ScanTransitionError> {
        if !self.status.can_transition_to(&to) {
            return Err(ScanTransitionError {
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }
}

/// A single discovered issue, enriched with its AI risk score.
///
/// A `Finding` is only constructed once its score is known (see
/// [`RawFinding::into_finding`]), so every persisted finding carries a real
/// `ai_risk_score`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub id: Uuid,
    pub job_id: Uuid,
    pub finding_type: String,
    /// Severity as reported by the scanner; normalized only on aggregation.
    pub severity: String,
    pub cvss_score: f64,
    /// Numeric risk score on the 0-10 scale, derived from the scorer output.
    pub ai_risk_score: f64,
    pub description: String,
    pub affected_url: String,
    pub discovered_at: DateTime<Utc>,
}

/// Raw finding payload as delivered by the scanning service.
///
/// Every field beyond `type` is optional on the wire; the CVSS attack
/// metadata is consumed only by the feature encoder and takes encoder-side
/// defaults when absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFinding {
    #[serde(rename = "type")]
    pub finding_type: Option<String>,
    pub severity: Option<String>,
    pub cvss_score: Option<f64>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub affected_url: Option<String>,
    pub attack_vector: Option<String>,
    pub attack_complexity: Option<String>,
    pub privileges_required: Option<String>,
    pub user_interaction: Option<String>,
    pub exploitability_score: Option<f64>,
    pub impact_score: Option<f64>,
    #[serde(default)]
    pub has_public_exploit: bool,
    /// Source category tag attached while flattening the scanner's nested
    /// result structure. Never present on the wire.
    #[serde(skip)]
    pub scan_category: String,
}

impl RawFinding {
    /// The affected URL, preferring the scanner's `url` key over
    /// `affected_url`.
    pub fn affected_url(&self) -> &str {
        self.url
            .as_deref()
            .or(self.affected_url.as_deref())
            .unwrap_or("")
    }

    /// Promote a raw finding into a persistable [`Finding`] by attaching the
    /// risk score produced for it.
    pub fn into_finding(self, job_id: Uuid, ai_risk_score: f64) -> Finding {
        let affected_url = self.affected_url().to_string();
        Finding {
            id: Uuid::new_v4(),
            job_id,
            finding_type: self.finding_type.unwrap_or_else(|| "Unknown".to_string()),
            severity: self.severity.unwrap_or_else(|| "Low".to_string()),
            cvss_score: self.cvss_score.unwrap_or(0.0),
            ai_risk_score,
            description: self.description.unwrap_or_default(),
            affected_url,
            discovered_at: Utc::now(),
        }
    }
}
