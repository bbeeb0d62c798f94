//! HTTP client for the scanning service

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::{debug, warn};

use super::traits::{ScannerGateway, ScannerResults};
use crate::application::errors::ApiError;
use crate::config::ScannerConfig;
use crate::infrastructure::resilience::{RetryPolicy, retry_with_fixed_delay};

/// Client for the scanning service's `/scan/all` endpoint.
pub struct ScannerApiClient {
    client: Client,
    base_url: String,
    retry: RetryPolicy,
}

impl ScannerApiClient {
    pub fn new(config: &ScannerConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("bughunter/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::Network)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            retry: config.retry.to_retry_policy(),
        })
    }

    async fn request_scan(&self, target_url: &str) -> Result<ScannerResults, ApiError> {
        let url = format!("{}/scan/all", self.base_url);
        debug!(url = %url, target_url, "Calling scanner service");

        let response = self
            .client
            .post(&url)
            .json(&json!({ "url": target_url }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::Http {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl ScannerGateway for ScannerApiClient {
    async fn scan_all(&self, target_url: &str) -> ScannerResults {
        match retry_with_fixed_delay(&self.retry, || self.request_scan(target_url)).await {
            Ok(results) => results,
            Err(error) => {
                // Degraded continuation: a missing scanner must not abort the
                // job, so exhausted retries become an empty result set.
                warn!(
                    target_url,
                    error = %error,
                    "Scanner unavailable after retries, continuing with zero findings"
                );
                ScannerResults::default()
            }
        }
    }
}
