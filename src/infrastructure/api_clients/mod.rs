//! HTTP clients for the scanning and scoring collaborators.

pub mod risk_model;
pub mod scanner;
pub mod traits;

pub use risk_model::RiskModelApiClient;
pub use scanner::ScannerApiClient;
pub use traits::{
    CategoryFindings, RiskAssessment, RiskScorerGateway, ScannerGateway, ScannerResults,
};
