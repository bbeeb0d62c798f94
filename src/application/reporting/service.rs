//! Report rendering service

use async_trait::async_trait;
use tracing::info;

use super::ReportError;
use super::models::ScanReport;
use crate::domain::scan::{Finding, ScanJob};

/// Detailed findings shown before the report truncates to a summary line.
const MAX_DETAILED_FINDINGS: usize = 15;

/// Service for generating scan reports.
#[async_trait]
pub trait ReportService: Send + Sync {
    async fn generate_report(
        &self,
        job: &ScanJob,
        findings: &[Finding],
    ) -> Result<String, ReportError>;

    async fn generate_html_report(
        &self,
        job: &ScanJob,
        findings: &[Finding],
    ) -> Result<String, ReportError>;
}

/// Report service rendering plain-text and HTML documents.
#[derive(Default)]
pub struct ReportServiceImpl;

impl ReportServiceImpl {
    pub fn new() -> Self {
        Self
    }

    fn render_text(&self, report: &ScanReport) -> String {
        let mut out = String::new();

        out.push_str("# Vulnerability Scan Report\n\n");
        out.push_str(&format!("Scan ID: {}\n", report.job_id));
        out.push_str(&format!("Target URL: {}\n", report.target_url));
        out.push_str(&format!("Status: {}\n", report.status));
        out.push_str(&format!(
            "Start Time: {}\n",
            report.start_time.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        match report.end_time {
            Some(end_time) => out.push_str(&format!(
                "End Time: {}\n\n",
                end_time.format("%Y-%m-%d %H:%M:%S UTC")
            )),
            None => out.push_str("End Time: N/A\n\n"),
        }

        out.push_str("## Vulnerability Summary\n\n");
        out.push_str(&format!(
            "Total Vulnerabilities Found: {}\n",
            report.summary.total_findings
        ));
        let counts = &report.summary.severity_counts;
        out.push_str(&format!(
            "Critical: {} | High: {} | Medium: {} | Low: {}\n\n",
            counts.critical, counts.high, counts.medium, counts.low
        ));

        out.push_str("## Detailed Findings\n\n");
        for (i, finding) in report.findings.iter().take(MAX_DETAILED_FINDINGS).enumerate() {
            out.push_str(&format!(
                "{}. [{}] {}\n",
                i + 1,
                finding.severity.to_uppercase(),
                finding.finding_type
            ));
            out.push_str(&format!(
                "   CVSS: {} | AI Risk: {} | URL: {}\n",
                finding.cvss_score, finding.ai_risk_score, finding.affected_url
            ));
            if !finding.description.is_empty() {
                out.push_str(&format!("   Description: {}\n", finding.description));
            }
            out.push('\n');
        }

        if report.findings.len() > MAX_DETAILED_FINDINGS {
            out.push_str(&format!(
                "... and {} more vulnerabilities\n",
                report.findings.len() - MAX_DETAILED_FINDINGS
            ));
        }

        out
    }

    fn render_html(&self, report: &ScanReport) -> String {
        let mut rows = String::new();
        for finding in report.findings.iter().take(MAX_DETAILED_FINDINGS) {
            rows.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                escape_html(&finding.severity),
                escape_html(&finding.finding_type),
                finding.cvss_score,
                finding.ai_risk_score,
                escape_html(&finding.affected_url),
            ));
        }

        let truncation_note = if report.findings.len() > MAX_DETAILED_FINDINGS {
            format!(
                "<p>... and {} more vulnerabilities</p>",
                report.findings.len() - MAX_DETAILED_FINDINGS
            )
        } else {
            String::new()
        };

        let counts = &report.summary.severity_counts;
        format!(
            r#"<!DOCTYPE html>
<html>
<head><title>Vulnerability Scan Report</title></head>
<body>
<h1>Vulnerability Scan Report</h1>
<p>Scan ID: {job_id}<br>
Target URL: {target_url}<br>
Status: {status}</p>
<h2>Summary</h2>
<p>Total: {total} | Critical: {critical} | High: {high} | Medium: {medium} | Low: {low}</p>
<h2>Findings</h2>
<table border="1">
<tr><th>Severity</th><th>Type</th><th>CVSS</th><th>AI Risk</th><th>URL</th></tr>
{rows}</table>
{truncation_note}
</body>
</html>
"#,
            job_id = report.job_id,
            target_url = escape_html(&report.target_url),
            status = report.status,
            total = report.summary.total_findings,
            critical = counts.critical,
            high = counts.high,
            medium = counts.medium,
            low = counts.low,
        )
    }
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[async_trait]
impl ReportService for ReportServiceImpl {
    async fn generate_report(
        &self,
        job: &ScanJob,
        findings: &[Finding],
    ) -> Result<String, ReportError> {
        let report = ScanReport::build(job, findings);
        let rendered = self.render_text(&report);
        info!(
            job_id = %job.id,
            characters = rendered.len(),
            "Generated text report"
        );
        Ok(rendered)
    }

    async fn generate_html_report(
        &self,
        job: &ScanJob,
        findings: &[Finding],
    ) -> Result<String, ReportError> {
        let report = ScanReport::build(job, findings);
        let rendered = self.render_html(&report);
        info!(
            job_id = %job.id,
            characters = rendered.len(),
            "Generated HTML report"
        );
        Ok(rendered)
    }
}
