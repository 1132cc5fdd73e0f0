use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSide::Buy => "buy",
            OrderSide::Sell => "sell",
        }
    }
}

/// Order submission from the dashboard. Market order, day time-in-force;
/// anything fancier goes through the broker's own UI.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderRequest {
    pub symbol: String,
    pub qty: i64,
    pub side: OrderSide,
}

/// Broker acknowledgement of a placed order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedOrder {
    pub id: String,
    pub symbol: String,
    pub side: String,
    pub qty: String,
    pub filled_qty: String,
    pub order_type: String,
    pub time_in_force: String,
    pub status: String,
    pub created_at: String,
}
