use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::models::position::AccountSummary;
use crate::models::scoring::{RiskScore, TrendScore};

/// Latest trade for an index proxy ETF.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastTrade {
    pub symbol: String,
    pub price: f64,

    /// Vendor timestamp, passed through; `"-"` when it was missing.
    pub timestamp: String,
}

/// Market snapshot for the dashboard header. A missing side means the feed
/// lookup failed and the widget renders a placeholder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketIndicators {
    pub nasdaq: Option<LastTrade>,
    pub dow: Option<LastTrade>,
}

/// Open order as shown in the dashboard table; upstream strings pass through
/// with `"-"` placeholders for anything the broker omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenOrder {
    pub symbol: String,
    pub side: String,
    pub qty: String,
    pub status: String,
    pub created_at: String,
}

/// Executed fill from the account activity feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fill {
    pub symbol: String,
    pub side: String,
    pub qty: String,
    pub price: String,
    pub transaction_time: String,
}

/// Everything the dashboard page needs in one response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub account: AccountSummary,

    /// Effective portfolio value; recomputed from cash plus position values
    /// when the broker reports zero.
    pub portfolio_value: BigDecimal,

    pub open_orders: Vec<OpenOrder>,
    pub recent_fills: Vec<Fill>,
    pub markets: MarketIndicators,
    pub risk_score: RiskScore,
    pub trend_scores: Vec<TrendScore>,
    pub degraded_stages: Vec<String>,
}
