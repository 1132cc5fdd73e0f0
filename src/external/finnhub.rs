use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

const FINNHUB_QUOTE_URL: &str = "https://finnhub.io/api/v1/quote";

#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("rate limited by quote provider")]
    RateLimited,
}

/// Finnhub real-time quote lookup. The payload is passed through untouched;
/// the frontend reads the c/h/l/o/pc fields directly.
pub struct FinnhubQuotes {
    client: Client,
    api_key: String,
}

impl FinnhubQuotes {
    pub fn from_env() -> Result<Self, QuoteError> {
        let api_key = std::env::var("FINNHUB_API_KEY")
            .map_err(|_| QuoteError::BadResponse("FINNHUB_API_KEY not set".into()))?;

        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(8))
                .build()
                .expect("Failed to create HTTP client"),
            api_key,
        })
    }

    pub async fn get_quote(&self, symbol: &str) -> Result<Value, QuoteError> {
        let resp = self
            .client
            .get(FINNHUB_QUOTE_URL)
            .query(&[("symbol", symbol), ("token", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| QuoteError::Network(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(QuoteError::RateLimited);
        }
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(QuoteError::BadResponse(format!("HTTP {}: {}", status, body)));
        }

        resp.json::<Value>()
            .await
            .map_err(|e| QuoteError::Parse(e.to_string()))
    }
}
