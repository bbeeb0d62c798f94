//! Scan domain: entities, value objects, feature encoding, and the
//! persistence interface.

pub mod entities;
pub mod features;
pub mod repositories;
pub mod value_objects;

pub use entities::{Finding, RawFinding, ScanJob};
pub use features::FeatureVector;
pub use repositories::{ScanRepository, StoreError};
pub use value_objects::{RiskLevel, ScanStatus, ScanTransitionError, Severity, SeverityCounts};
