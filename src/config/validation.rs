//! Configuration validation module

use super::{AlertConfig, ApiConfig, DatabaseConfig, ScanConfig, ServerConfig};

/// Trait for validating configuration sections
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Server configuration error: {message}")]
    Server { message: String },

    #[error("Database configuration error: {message}")]
    Database { message: String },

    #[error("API configuration error: {message}")]
    Api { message: String },

    #[error("Alert configuration error: {message}")]
    Alerts { message: String },

    #[error("Scan configuration error: {message}")]
    Scan { message: String },
}

impl ValidationError {
    pub fn server(message: impl Into<String>) -> Self {
        Self::Server {
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    pub fn alerts(message: impl Into<String>) -> Self {
        Self::Alerts {
            message: message.into(),
        }
    }

    pub fn scan(message: impl Into<String>) -> Self {
        Self::Scan {
            message: message.into(),
        }
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::server("Port must be in range 1-65535"));
        }
        if self.host.is_empty() {
            return Err(ValidationError::server("Host cannot be empty"));
        }
        if self.request_timeout_seconds == 0 {
            return Err(ValidationError::server(
                "Request timeout must be greater than 0",
            ));
        }
        Ok(())
    }
}

impl Validate for DatabaseConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.url.is_empty() {
            return Err(ValidationError::database("Database URL cannot be empty"));
        }
        if self.max_connections == 0 {
            return Err(ValidationError::database(
                "Connection pool size must be greater than 0",
            ));
        }
        Ok(())
    }
}

impl Validate for ApiConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        for (name, base_url, timeout, retry) in [
            (
                "scanner",
                &self.scanner.base_url,
                self.scanner.timeout_seconds,
                &self.scanner.retry,
            ),
            (
                "risk_model",
                &self.risk_model.base_url,
                self.risk_model.timeout_seconds,
                &self.risk_model.retry,
            ),
        ] {
            if base_url.is_empty() {
                return Err(ValidationError::api(format!(
                    "{name} base URL cannot be empty"
                )));
            }
            if timeout == 0 {
                return Err(ValidationError::api(format!(
                    "{name} timeout must be greater than 0"
                )));
            }
            if retry.max_attempts == 0 {
                return Err(ValidationError::api(format!(
                    "{name} retry attempts must be greater than 0"
                )));
            }
        }
        Ok(())
    }
}

impl Validate for AlertConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if !(0.0..=10.0).contains(&self.risk_threshold) {
            return Err(ValidationError::alerts(format!(
                "Risk threshold must be within 0-10, got {}",
                self.risk_threshold
            )));
        }
        Ok(())
    }
}

impl Validate for ScanConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.max_concurrent_jobs == 0 {
            return Err(ValidationError::scan(
                "max_concurrent_jobs must be greater than 0",
            ));
        }
        Ok(())
    }
}
