//! Gateway traits and wire types for the external collaborators.

use std::collections::BTreeMap;
use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;

use crate::application::errors::ApiError;
use crate::domain::scan::{FeatureVector, RawFinding};

/// Raw result structure returned by the scanning service: findings nested
/// per scan category.
///
/// Categories are kept in a sorted map so that flattening always yields the
/// same finding order for the same payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScannerResults {
    #[serde(default)]
    pub results: BTreeMap<String, CategoryFindings>,
}

/// Findings for a single scan category. Some scanner modules report under
/// `vulnerabilities`, others under `issues`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryFindings {
    #[serde(default)]
    pub vulnerabilities: Option<Vec<RawFinding>>,
    #[serde(default)]
    pub issues: Option<Vec<RawFinding>>,
}

impl ScannerResults {
    /// Flatten the nested per-category structure into a single ordered
    /// sequence, tagging each finding with its source category.
    pub fn into_findings(self) -> Vec<RawFinding> {
        let mut findings = Vec::new();
        for (category, data) in self.results {
            let category_findings = data.vulnerabilities.or(data.issues).unwrap_or_default();
            for mut finding in category_findings {
                finding.scan_category = category.clone();
                findings.push(finding);
            }
        }
        findings
    }
}

/// Risk assessment returned by the scoring service.
#[derive(Debug, Clone, Deserialize)]
pub struct RiskAssessment {
    #[serde(default)]
    pub risk_level: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub probabilities: Option<HashMap<String, f64>>,
}

/// Gateway to the scanning service.
///
/// The scanner is a soft dependency: implementations absorb exhausted
/// retries and return an empty result set, so a missing scanner degrades a
/// job to "no issues found" instead of failing it.
#[async_trait]
pub trait ScannerGateway: Send + Sync {
    async fn scan_all(&self, target_url: &str) -> ScannerResults;
}

/// Gateway to the risk scoring service.
///
/// Unlike the scanner there is no silent fallback: a score that cannot be
/// obtained is a terminal error, because defaulting it would fabricate risk
/// data.
#[async_trait]
pub trait RiskScorerGateway: Send + Sync {
    async fn score(&self, features: &FeatureVector) -> Result<RiskAssessment, ApiError>;
}
