//! BugHunter — AI-assisted vulnerability scan orchestration service.
//!
//! The service coordinates asynchronous scan jobs: it invokes an external
//! scanning service, forwards each discovered finding to an ML risk scoring
//! service, aggregates and persists the results, reports progress, fires
//! threshold alerts, and renders scan reports.
//!
//! # Architecture
//!
//! The crate follows Domain-Driven Design layering:
//!
//! ```text
//! src/
//! ├── domain/           # Pure business logic
//! │   └── scan/         # Job/finding entities, state machine, feature encoding
//! ├── application/      # Use cases and services
//! │   ├── scan/         # Submit/execute orchestration
//! │   ├── reporting/    # Report rendering
//! │   ├── workflow.rs   # Validated status transitions
//! │   ├── progress.rs   # Progress tracking
//! │   └── alerts.rs     # Threshold alert dispatch
//! ├── infrastructure/   # External integrations
//! │   ├── api_clients/  # Scanner and risk model HTTP clients
//! │   ├── persistence/  # PostgreSQL data access
//! │   ├── notifications/# Webhook alert delivery
//! │   └── resilience.rs # Fixed-delay retry policy
//! ├── presentation/     # HTTP API (axum)
//! └── config/           # Configuration management
//! ```
//!
//! # Configuration
//!
//! Environment variables use the `BUGHUNTER__` prefix with double underscore
//! separators:
//!
//! ```bash
//! BUGHUNTER__SERVER__PORT=8000
//! BUGHUNTER__APIS__SCANNER__BASE_URL=http://scanner:5001
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod logging;
pub mod presentation;

mod app;

pub use app::create_app;
pub use config::Config;
pub use logging::init_tracing;
