use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::external::sectors::{SectorProvider, SectorProviderError};

pub struct AlphaVantageSectors {
    client: reqwest::Client,
    api_key: String,
}

impl AlphaVantageSectors {
    pub fn from_env() -> Result<Self, SectorProviderError> {
        let api_key = std::env::var("ALPHAVANTAGE_API_KEY")
            .map_err(|_| SectorProviderError::BadResponse("ALPHAVANTAGE_API_KEY not set".into()))?;

        Ok(Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(8))
                .build()
                .expect("Failed to create HTTP client"),
            api_key,
        })
    }
}

#[derive(Debug, Deserialize)]
struct AvOverviewResponse {
    #[serde(rename = "Sector")]
    sector: Option<String>,

    // When rate-limited Alpha Vantage returns:
    // { "Note": "Thank you for using Alpha Vantage! ... 5 calls per minute ..." }
    #[serde(rename = "Note")]
    note: Option<String>,

    // Newer throttle responses use this key instead:
    // { "Information": "... premium plans ..." }
    #[serde(rename = "Information")]
    information: Option<String>,
}

#[async_trait]
impl SectorProvider for AlphaVantageSectors {
    async fn get_sector(&self, symbol: &str) -> Result<Option<String>, SectorProviderError> {
        // OVERVIEW carries company fundamentals; "Sector" is the only field
        // we read. An unknown symbol comes back as an empty object.
        let url = "https://www.alphavantage.co/query";

        let resp = self
            .client
            .get(url)
            .query(&[
                ("function", "OVERVIEW"),
                ("symbol", symbol),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| SectorProviderError::Network(e.to_string()))?;

        let body = resp
            .json::<AvOverviewResponse>()
            .await
            .map_err(|e| SectorProviderError::Parse(e.to_string()))?;

        if body.note.is_some() || body.information.is_some() {
            return Err(SectorProviderError::RateLimited);
        }

        Ok(body
            .sector
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()))
    }
}
