use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SectorProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("rate limited by sector metadata provider")]
    RateLimited,
}

/// Looks up the sector a symbol belongs to. `Ok(None)` means the provider
/// answered but knows no sector for the symbol, which is not a failure.
#[async_trait]
pub trait SectorProvider: Send + Sync {
    async fn get_sector(&self, symbol: &str) -> Result<Option<String>, SectorProviderError>;
}
