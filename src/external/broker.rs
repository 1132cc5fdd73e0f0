use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::models::{
    AccountSummary, Fill, LastTrade, OpenOrder, OrderSide, PerformanceSeries, PlacedOrder,
};

#[derive(Debug, Error)]
pub enum BrokerError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Port to the trading-account vendor. Implementations translate their own
/// wire format; nothing vendor-shaped leaks past this trait except the raw
/// position records, whose normalization belongs to the position service.
#[async_trait]
pub trait BrokerApi: Send + Sync {
    async fn get_account(&self) -> Result<AccountSummary, BrokerError>;

    /// Position records exactly as the vendor sent them, one JSON value per
    /// position.
    async fn get_positions(&self) -> Result<Vec<Value>, BrokerError>;

    async fn get_open_orders(&self) -> Result<Vec<OpenOrder>, BrokerError>;

    async fn get_recent_fills(&self, limit: u32) -> Result<Vec<Fill>, BrokerError>;

    async fn get_last_trade(&self, symbol: &str) -> Result<LastTrade, BrokerError>;

    async fn get_portfolio_history(
        &self,
        period: &str,
        timeframe: &str,
    ) -> Result<PerformanceSeries, BrokerError>;

    /// Market order, day time-in-force.
    async fn place_order(
        &self,
        symbol: &str,
        qty: i64,
        side: OrderSide,
    ) -> Result<PlacedOrder, BrokerError>;
}
