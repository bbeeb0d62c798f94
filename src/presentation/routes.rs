//! Route definitions and server setup

use std::time::Duration;

use axum::{
    Router,
    routing::{delete, get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::presentation::controllers::{
    AppState, admin::reset_all_data, health::health_check, reports::get_report,
    scans::{get_scan, list_scans, start_scan, start_scan_json},
};
use crate::presentation::models::*;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::controllers::scans::start_scan,
        crate::presentation::controllers::scans::start_scan_json,
        crate::presentation::controllers::scans::get_scan,
        crate::presentation::controllers::scans::list_scans,
        crate::presentation::controllers::reports::get_report,
        crate::presentation::controllers::health::health_check,
        crate::presentation::controllers::admin::reset_all_data
    ),
    components(
        schemas(
            ScanRequest,
            ScanAcceptedResponse,
            ScanJobDto,
            ScanDetailResponse,
            FindingDto,
            HealthResponse,
            ResetResponse
        )
    ),
    tags(
        (name = "scans", description = "Scan submission and status endpoints"),
        (name = "reports", description = "Scan report rendering endpoints"),
        (name = "health", description = "System health monitoring endpoints"),
        (name = "admin", description = "Administrative endpoints")
    ),
    info(
        title = "BugHunter API",
        version = "0.1.0",
        description = "AI-assisted vulnerability scan orchestration service"
    )
)]
pub struct ApiDoc;

/// Create the application router with the shared middleware stack
pub fn create_router(state: AppState, config: &Config) -> Router {
    // Build CORS layer from configuration
    let cors_layer =
        if config.server.allowed_origins.len() == 1 && config.server.allowed_origins[0] == "*" {
            CorsLayer::permissive()
        } else {
            let mut layer = CorsLayer::new();
            for origin in &config.server.allowed_origins {
                match axum::http::HeaderValue::from_str(origin) {
                    Ok(origin_header) => {
                        layer = layer.allow_origin(origin_header);
                    }
                    Err(_) => {
                        tracing::warn!(origin, "Invalid CORS origin in config; skipping");
                    }
                }
            }
            layer
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::DELETE,
                    axum::http::Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                ])
        };

    let mut router = Router::new()
        .route("/scan", post(start_scan))
        .route("/scan/{id}", get(get_scan))
        .route("/api/scans", post(start_scan_json).get(list_scans))
        .route("/api/scans/{id}", get(get_scan))
        .route("/api/reports/{id}", get(get_report))
        .route("/api/reset", delete(reset_all_data))
        .route("/health", get(health_check));

    // Avoid leaking interactive docs in hardened deployments.
    if config.server.enable_docs {
        router =
            router.merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    }

    let service_builder = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_seconds,
        )));

    router.layer(service_builder).with_state(state)
}
