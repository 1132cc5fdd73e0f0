use tracing::info;

use crate::errors::AppError;
use crate::external::broker::BrokerApi;
use crate::models::{Fill, OpenOrder, OrderRequest, PlacedOrder};

/// Validates and submits a market/day order.
pub async fn place_market_order(
    broker: &dyn BrokerApi,
    input: OrderRequest,
) -> Result<PlacedOrder, AppError> {
    let symbol = input.symbol.trim();
    if symbol.is_empty() {
        return Err(AppError::Validation("Symbol cannot be empty".into()));
    }
    if input.qty < 1 {
        return Err(AppError::Validation("Quantity must be at least 1".into()));
    }

    info!("Placing {} order: {} x {}", input.side.as_str(), input.qty, symbol);
    let order = broker.place_order(symbol, input.qty, input.side).await?;
    info!("✅ Order accepted: {} ({})", order.id, order.status);

    Ok(order)
}

pub async fn list_open_orders(broker: &dyn BrokerApi) -> Result<Vec<OpenOrder>, AppError> {
    Ok(broker.get_open_orders().await?)
}

pub async fn list_recent_fills(
    broker: &dyn BrokerApi,
    limit: u32,
) -> Result<Vec<Fill>, AppError> {
    Ok(broker.get_recent_fills(limit).await?)
}
