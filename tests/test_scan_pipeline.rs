//! End-to-end pipeline tests against mocked scanner and scorer services.

mod common;

use common::PipelineHarness;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bughunter::domain::scan::{ScanRepository, ScanStatus, SeverityCounts};

const TARGET: &str = "http://testphp.vulnweb.com";

async fn mock_scanner_response(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/scan/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Scanner reports no findings: the job still completes, with an all-zero
/// summary and the short progress sequence.
#[tokio::test]
async fn test_zero_finding_scan_completes() {
    let scanner = MockServer::start().await;
    let scorer = MockServer::start().await;
    mock_scanner_response(&scanner, json!({ "results": {} })).await;

    let harness = PipelineHarness::new(&scanner.uri(), &scorer.uri());
    let job = harness.run_scan(TARGET).await;

    assert_eq!(job.status, ScanStatus::Completed);
    assert_eq!(job.total_findings, 0);
    assert_eq!(job.severity_counts, SeverityCounts::default());
    assert!(job.end_time.is_some());

    assert_eq!(harness.repository.progress_values(), vec![15, 40, 90, 100]);
    assert!(harness.notifier.alerts.lock().unwrap().is_empty());
}

/// Two findings scored Critical and High: risk scores map to 9.5 and 7.5,
/// exactly one critical alert fires, and the terminal severity counts follow
/// the scanner-reported severities rather than the AI scores.
#[tokio::test]
async fn test_two_findings_scored_and_alerted() {
    let scanner = MockServer::start().await;
    let scorer = MockServer::start().await;

    mock_scanner_response(
        &scanner,
        json!({
            "results": {
                "sqli": {
                    "vulnerabilities": [
                        {
                            "type": "SQL Injection",
                            "severity": "Critical",
                            "cvss_score": 9.8,
                            "url": "http://testphp.vulnweb.com/login"
                        },
                        {
                            "type": "Blind SQL Injection",
                            "severity": "High",
                            "cvss_score": 7.5,
                            "url": "http://testphp.vulnweb.com/search"
                        }
                    ]
                }
            }
        }),
    )
    .await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .and(body_partial_json(json!({ "cvss_base_score": 9.8 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "risk_level": "Critical",
            "confidence": 0.97,
            "probabilities": { "Critical": 0.97, "High": 0.03 }
        })))
        .mount(&scorer)
        .await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .and(body_partial_json(json!({ "cvss_base_score": 7.5 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "risk_level": "High",
            "confidence": 0.9,
            "probabilities": { "High": 0.9, "Medium": 0.1 }
        })))
        .mount(&scorer)
        .await;

    let harness = PipelineHarness::new(&scanner.uri(), &scorer.uri());
    let job = harness.run_scan(TARGET).await;

    assert_eq!(job.status, ScanStatus::Completed);
    assert_eq!(job.total_findings, 2);
    assert_eq!(job.severity_counts.critical, 1);
    assert_eq!(job.severity_counts.high, 1);
    assert_eq!(job.severity_counts.medium, 0);

    let findings = harness.repository.get_findings(job.id).await.unwrap();
    let scores: Vec<f64> = findings.iter().map(|f| f.ai_risk_score).collect();
    assert_eq!(scores, vec![9.5, 7.5]);

    // Only the 9.5 finding crosses the 9.0 alert threshold.
    let alerts = harness.notifier.alerts.lock().unwrap();
    assert_eq!(alerts.len(), 1);
    assert!(alerts[0].subject.contains("SQL Injection"));

    // Progress covered the analysis band without regressing.
    let values = harness.repository.progress_values();
    assert_eq!(values, vec![15, 40, 62, 84, 90, 100]);
}

/// Idempotence: a terminal job's severity counts always equal grouping its
/// persisted findings by severity.
#[tokio::test]
async fn test_terminal_counts_match_persisted_findings() {
    let scanner = MockServer::start().await;
    let scorer = MockServer::start().await;

    mock_scanner_response(
        &scanner,
        json!({
            "results": {
                "headers": {
                    "issues": [
                        { "type": "Missing HSTS", "severity": "LOW" },
                        { "type": "Missing CSP", "severity": "low" },
                        { "type": "Server Banner", "severity": "informational" }
                    ]
                }
            }
        }),
    )
    .await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "risk_level": "Low" })))
        .mount(&scorer)
        .await;

    let harness = PipelineHarness::new(&scanner.uri(), &scorer.uri());
    let job = harness.run_scan(TARGET).await;

    let findings = harness.repository.get_findings(job.id).await.unwrap();
    assert_eq!(job.severity_counts, SeverityCounts::from_findings(&findings));
    assert_eq!(job.severity_counts.low, 2);
    // The unrecognized severity is outside the four buckets but still counted
    // in the total.
    assert_eq!(job.total_findings, 3);
}

/// Scorer exhaustion on the first finding is fatal: the job fails, nothing
/// is persisted for that finding, and exactly one failure alert fires.
#[tokio::test]
async fn test_scorer_exhaustion_fails_the_job() {
    let scanner = MockServer::start().await;
    let scorer = MockServer::start().await;

    mock_scanner_response(
        &scanner,
        json!({
            "results": {
                "xss": {
                    "vulnerabilities": [
                        { "type": "Reflected XSS", "severity": "High", "cvss_score": 6.1 }
                    ]
                }
            }
        }),
    )
    .await;

    // All three attempts meet a server error.
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model unavailable"))
        .expect(3)
        .mount(&scorer)
        .await;

    let harness = PipelineHarness::new(&scanner.uri(), &scorer.uri());
    let job = harness.run_scan(TARGET).await;

    assert_eq!(job.status, ScanStatus::Failed);
    assert!(job.end_time.is_some());
    assert!(harness.repository.stored_findings().is_empty());

    let alerts = harness.notifier.alerts.lock().unwrap();
    assert_eq!(alerts.len(), 1);
    assert!(alerts[0].subject.starts_with("SCAN FAILED"));
    assert!(alerts[0].subject.contains(TARGET));
}

/// Scanner exhaustion is non-fatal: after three failed attempts the job
/// degrades to zero findings and still completes.
#[tokio::test]
async fn test_scanner_exhaustion_degrades_to_empty_scan() {
    let scanner = MockServer::start().await;
    let scorer = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/scan/all"))
        .respond_with(ResponseTemplate::new(503).set_body_string("scanner down"))
        .expect(3)
        .mount(&scanner)
        .await;

    let harness = PipelineHarness::new(&scanner.uri(), &scorer.uri());
    let job = harness.run_scan(TARGET).await;

    assert_eq!(job.status, ScanStatus::Completed);
    assert_eq!(job.total_findings, 0);
    assert_eq!(harness.repository.progress_values(), vec![15, 40, 90, 100]);
    assert!(harness.notifier.alerts.lock().unwrap().is_empty());
}

/// Submission schedules execution in the background and returns immediately;
/// the job eventually reaches a terminal state on its own.
#[tokio::test]
async fn test_submission_runs_job_in_background() {
    let scanner = MockServer::start().await;
    let scorer = MockServer::start().await;
    mock_scanner_response(&scanner, json!({ "results": {} })).await;

    let harness = PipelineHarness::new(&scanner.uri(), &scorer.uri());
    let job_id = harness.submit_use_case.submit(TARGET).await.unwrap();

    let completed = tokio::time::timeout(std::time::Duration::from_secs(2), async {
        loop {
            if let Some(job) = harness.repository.get_job(job_id).await.unwrap() {
                if job.status.is_terminal() {
                    return job;
                }
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("job should reach a terminal state");

    assert_eq!(completed.status, ScanStatus::Completed);
    assert_eq!(completed.progress, 100);
}
