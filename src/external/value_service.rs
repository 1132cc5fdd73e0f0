use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValueServiceError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Client for the in-house fundamental-value scoring service.
pub struct ValueServiceClient {
    client: Client,
    base_url: String,
}

impl ValueServiceClient {
    pub fn from_env() -> Result<Self, ValueServiceError> {
        let base_url = std::env::var("VALUE_SERVICE_BASE_URL")
            .map_err(|_| ValueServiceError::BadResponse("VALUE_SERVICE_BASE_URL not set".into()))?;

        Ok(Self::new(base_url))
    }

    pub fn new(base_url: String) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn get_score(&self, symbol: &str) -> Result<Value, ValueServiceError> {
        let url = format!("{}/score", self.base_url);

        let resp = self
            .client
            .get(&url)
            .query(&[("symbol", symbol)])
            .send()
            .await
            .map_err(|e| ValueServiceError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ValueServiceError::BadResponse(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let body = resp
            .json::<Value>()
            .await
            .map_err(|e| ValueServiceError::Parse(e.to_string()))?;

        if !body.is_object() {
            return Err(ValueServiceError::Parse(format!(
                "expected a score object, got: {}",
                body
            )));
        }

        Ok(body)
    }
}
