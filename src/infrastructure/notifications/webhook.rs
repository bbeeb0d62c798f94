//! Webhook delivery for alert notifications

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{info, warn};

use super::{Alert, AlertNotifier, NotifyError};
use crate::config::AlertConfig;

const MAX_DELIVERY_ATTEMPTS: u32 = 3;

/// Delivers alerts as JSON payloads to a configured webhook URL.
pub struct WebhookNotifier {
    client: Client,
    webhook_url: String,
}

impl WebhookNotifier {
    pub fn new(webhook_url: String, config: &AlertConfig) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("bughunter/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| NotifyError::Delivery(e.to_string()))?;

        Ok(Self {
            client,
            webhook_url,
        })
    }
}

#[async_trait]
impl AlertNotifier for WebhookNotifier {
    async fn notify(&self, alert: &Alert) -> Result<(), NotifyError> {
        let mut last_error = String::new();

        for attempt in 1..=MAX_DELIVERY_ATTEMPTS {
            let result = self
                .client
                .post(&self.webhook_url)
                .header("X-Bughunter-Event", "alert.triggered")
                .json(alert)
                .send()
                .await;

            match result {
                Ok(response) if response.status().is_success() => {
                    info!(
                        subject = %alert.subject,
                        status = %response.status(),
                        "Alert delivered"
                    );
                    return Ok(());
                }
                Ok(response) => {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    last_error = format!("HTTP {status}: {body}");
                    warn!(
                        subject = %alert.subject,
                        status = %status,
                        attempt,
                        "Alert delivery returned non-success status"
                    );
                }
                Err(e) => {
                    last_error = e.to_string();
                    warn!(
                        subject = %alert.subject,
                        error = %e,
                        attempt,
                        "Alert delivery request failed"
                    );
                }
            }

            if attempt < MAX_DELIVERY_ATTEMPTS {
                tokio::time::sleep(Duration::from_millis(500 * (1 << attempt))).await;
            }
        }

        Err(NotifyError::Delivery(last_error))
    }
}
