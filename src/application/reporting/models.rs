//! Report input structures

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::scan::{Finding, ScanJob, ScanStatus, Severity, SeverityCounts};

/// Summary statistics for one scan.
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub total_findings: usize,
    pub severity_counts: SeverityCounts,
}

/// Complete input handed to the report renderer: the job's lifecycle data
/// plus its findings ordered most severe first.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub job_id: Uuid,
    pub target_url: String,
    pub status: ScanStatus,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub summary: ReportSummary,
    pub findings: Vec<Finding>,
}

impl ScanReport {
    pub fn build(job: &ScanJob, findings: &[Finding]) -> ScanReport {
        let mut ordered = findings.to_vec();
        // Stable sort: unknown severities sink below the known buckets while
        // keeping their relative order.
        ordered.sort_by_key(|f| Severity::parse(&f.severity).map(|s| s.rank()).unwrap_or(4));

        ScanReport {
            job_id: job.id,
            target_url: job.target_url.clone(),
            status: job.status,
            start_time: job.start_time,
            end_time: job.end_time,
            summary: ReportSummary {
                total_findings: findings.len(),
                severity_counts: SeverityCounts::from_findings(findings),
            },
            findings: ordered,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finding(severity: &str, finding_type: &str) -> Finding {
        Finding {
            id: Uuid::new_v4(),
            job_id: Uuid::new_v4(),
            finding_type: finding_type.to_string(),
            severity: severity.to_string(),
            cvss_score: 5.0,
            ai_risk_score: 5.0,
            description: String::new(),
            affected_url: String::new(),
            discovered_at: Utc::now(),
        }
    }

    #[test]
    fn test_findings_are_ordered_most_severe_first() {
        let job = ScanJob::new("http://example.com");
        let findings = vec![
            finding("Low", "a"),
            finding("Critical", "b"),
            finding("info", "c"),
            finding("High", "d"),
            finding("medium", "e"),
        ];

        let report = ScanReport::build(&job, &findings);
        let order: Vec<&str> = report
            .findings
            .iter()
            .map(|f| f.finding_type.as_str())
            .collect();

        assert_eq!(order, vec!["b", "d", "e", "a", "c"]);
    }

    #[test]
    fn test_summary_counts_match_findings() {
        let job = ScanJob::new("http://example.com");
        let findings = vec![
            finding("Critical", "a"),
            finding("critical", "b"),
            finding("Low", "c"),
        ];

        let report = ScanReport::build(&job, &findings);
        assert_eq!(report.summary.total_findings, 3);
        assert_eq!(report.summary.severity_counts.critical, 2);
        assert_eq!(report.summary.severity_counts.low, 1);
    }
}
