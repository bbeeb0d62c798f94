//! Feature encoding for the risk scoring service.
//!
//! Each finding is reduced to a fixed 13-slot numeric record before being
//! sent to the scorer. The encoding tables below are a wire contract with the
//! model: a mismatch does not fail, it silently produces wrong risk scores,
//! which is why every table is covered exhaustively in the tests.

use serde::Serialize;

use super::entities::RawFinding;

/// CVSS base score assumed when the scanner did not provide one.
const DEFAULT_CVSS_SCORE: f64 = 5.0;

/// Fixed age factor: no CVE publication dates are available at scan time.
const AGE_FACTOR: f64 = 0.5;

/// Fixed-shape numeric record sent to the scoring service.
///
/// Ephemeral: exists only for the duration of one scoring call and is never
/// persisted. Field order matches the model's training schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    pub cvss_base_score: f64,
    pub exploitability_score: f64,
    pub impact_score: f64,
    pub cvss_severity_encoded: u8,
    pub attack_vector_encoded: u8,
    pub attack_complexity_encoded: u8,
    pub privileges_required_encoded: u8,
    pub user_interaction_encoded: u8,
    pub cvss_combined: f64,
    pub attack_ease_score: f64,
    pub public_exposure: u8,
    pub age_factor: f64,
    pub severity_score: u8,
}

impl FeatureVector {
    /// Encode one raw finding. Deterministic and total: absent or
    /// unrecognized inputs take the documented defaults.
    pub fn from_raw(raw: &RawFinding) -> FeatureVector {
        let cvss_base_score = raw.cvss_score.unwrap_or(DEFAULT_CVSS_SCORE);
        let exploitability_score = raw
            .exploitability_score
            .unwrap_or(cvss_base_score * 0.4);
        let impact_score = raw.impact_score.unwrap_or(cvss_base_score * 0.6);
        let severity_encoded = encode_severity(raw.severity.as_deref().unwrap_or("Medium"));

        FeatureVector {
            cvss_base_score,
            exploitability_score,
            impact_score,
            cvss_severity_encoded: severity_encoded,
            attack_vector_encoded: encode_attack_vector(
                raw.attack_vector.as_deref().unwrap_or("Network"),
            ),
            attack_complexity_encoded: encode_attack_complexity(
                raw.attack_complexity.as_deref().unwrap_or("Low"),
            ),
            privileges_required_encoded: encode_privileges_required(
                raw.privileges_required.as_deref().unwrap_or("None"),
            ),
            user_interaction_encoded: encode_user_interaction(
                raw.user_interaction.as_deref().unwrap_or("None"),
            ),
            cvss_combined: cvss_base_score,
            attack_ease_score: exploitability_score * 0.7,
            public_exposure: if raw.has_public_exploit { 1 } else { 0 },
            age_factor: AGE_FACTOR,
            severity_score: severity_encoded,
        }
    }
}

/// Low=0, Medium=1, High=2, Critical=3; anything else maps to 1.
pub fn encode_severity(severity: &str) -> u8 {
    match severity {
        "Low" => 0,
        "Medium" => 1,
        "High" => 2,
        "Critical" => 3,
        _ => 1,
    }
}

/// Network=1, Adjacent=2, Local=3, Physical=4; anything else maps to 1.
pub fn encode_attack_vector(vector: &str) -> u8 {
    match vector {
        "Network" => 1,
        "Adjacent" => 2,
        "Local" => 3,
        "Physical" => 4,
        _ => 1,
    }
}

/// Low complexity encodes to 0, everything else to 1.
pub fn encode_attack_complexity(complexity: &str) -> u8 {
    if complexity == "Low" { 0 } else { 1 }
}

/// None=2, Low=1, High=0; anything else maps to 1.
pub fn encode_privileges_required(privileges: &str) -> u8 {
    match privileges {
        "None" => 2,
        "Low" => 1,
        "High" => 0,
        _ => 1,
    }
}

/// No interaction required encodes to 0, everything else to 1.
pub fn encode_user_interaction(interaction: &str) -> u8 {
    if interaction == "None" { 0 } else { 1 }
}
