//! HTTP client for the ML risk scoring service

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::traits::{RiskAssessment, RiskScorerGateway};
use crate::application::errors::ApiError;
use crate::config::RiskModelConfig;
use crate::domain::scan::FeatureVector;
use crate::infrastructure::resilience::{RetryPolicy, retry_with_fixed_delay};

/// Client for the scoring service's `/predict` endpoint.
pub struct RiskModelApiClient {
    client: Client,
    base_url: String,
    retry: RetryPolicy,
}

impl RiskModelApiClient {
    pub fn new(config: &RiskModelConfig) -> Result<Self, ApiError> {
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

    async fn request_prediction(
        &self,
        features: &FeatureVector,
    ) -> Result<RiskAssessment, ApiError> {
        let url = format!("{}/predict", self.base_url);
        debug!(url = %url, "Requesting risk prediction");

        let response = self.client.post(&url).json(features).send().await?;

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
impl RiskScorerGateway for RiskModelApiClient {
    async fn score(&self, features: &FeatureVector) -> Result<RiskAssessment, ApiError> {
        // No fallback on exhaustion: fabricating a default risk score would
        // silently corrupt results, so the error propagates to the caller.
        retry_with_fixed_delay(&self.retry, || self.request_prediction(features)).await
    }
}
