use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use bigdecimal::{BigDecimal, FromPrimitive, Zero};
use chrono::DateTime;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use crate::external::broker::{BrokerApi, BrokerError};
use crate::models::{
    AccountSummary, Fill, LastTrade, OpenOrder, OrderSide, PerformanceSeries, PlacedOrder,
};

const PLACEHOLDER: &str = "-";
const DEFAULT_BASE_URL: &str = "https://paper-api.alpaca.markets";
const DEFAULT_DATA_URL: &str = "https://data.alpaca.markets";

/// Alpaca trading API client. All numeric fields arrive as JSON strings, so
/// every extraction goes through the tolerant helpers below; one malformed
/// field never fails a whole payload.
pub struct AlpacaBroker {
    client: Client,
    api_key: String,
    api_secret: String,
    base_url: String,
    data_url: String,
}

impl AlpacaBroker {
    pub fn from_env() -> Result<Self, BrokerError> {
        let api_key = std::env::var("ALPACA_API_KEY")
            .map_err(|_| BrokerError::BadResponse("ALPACA_API_KEY not set".into()))?;
        let api_secret = std::env::var("ALPACA_API_SECRET")
            .map_err(|_| BrokerError::BadResponse("ALPACA_API_SECRET not set".into()))?;
        let base_url = std::env::var("ALPACA_BASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let data_url = std::env::var("ALPACA_DATA_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATA_URL.to_string());

        Ok(Self::new(api_key, api_secret, base_url, data_url))
    }

    pub fn new(api_key: String, api_secret: String, base_url: String, data_url: String) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_key,
            api_secret,
            base_url: base_url.trim_end_matches('/').to_string(),
            data_url: data_url.trim_end_matches('/').to_string(),
        }
    }

    async fn get_json(&self, url: &str, query: &[(&str, &str)]) -> Result<Value, BrokerError> {
        debug!("Alpaca GET {}", url);

        let resp = self
            .client
            .get(url)
            .query(query)
            .header("APCA-API-KEY-ID", &self.api_key)
            .header("APCA-API-SECRET-KEY", &self.api_secret)
            .send()
            .await
            .map_err(|e| BrokerError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(BrokerError::BadResponse(format!("HTTP {}: {}", status, body)));
        }

        resp.json::<Value>()
            .await
            .map_err(|e| BrokerError::Parse(e.to_string()))
    }
}

#[async_trait]
impl BrokerApi for AlpacaBroker {
    async fn get_account(&self) -> Result<AccountSummary, BrokerError> {
        let url = format!("{}/v2/account", self.base_url);
        let body = self.get_json(&url, &[]).await?;
        Ok(parse_account(&body))
    }

    async fn get_positions(&self) -> Result<Vec<Value>, BrokerError> {
        let url = format!("{}/v2/positions", self.base_url);
        let body = self.get_json(&url, &[]).await?;
        match body {
            Value::Array(records) => Ok(records),
            other => Err(BrokerError::Parse(format!(
                "expected a position array, got: {}",
                other
            ))),
        }
    }

    async fn get_open_orders(&self) -> Result<Vec<OpenOrder>, BrokerError> {
        let url = format!("{}/v2/orders", self.base_url);
        let body = self
            .get_json(&url, &[("status", "open"), ("direction", "desc")])
            .await?;
        Ok(parse_open_orders(&body))
    }

    async fn get_recent_fills(&self, limit: u32) -> Result<Vec<Fill>, BrokerError> {
        let url = format!("{}/v2/account/activities", self.base_url);
        let page_size = limit.to_string();
        let body = self
            .get_json(
                &url,
                &[
                    ("activity_types", "FILL"),
                    ("page_size", page_size.as_str()),
                    ("direction", "desc"),
                ],
            )
            .await?;
        Ok(unwrap_fills(body).iter().map(parse_fill).collect())
    }

    async fn get_last_trade(&self, symbol: &str) -> Result<LastTrade, BrokerError> {
        let url = format!("{}/v2/stocks/{}/trades/latest", self.data_url, symbol);
        let body = self.get_json(&url, &[]).await?;
        Ok(parse_trade(symbol, &body))
    }

    async fn get_portfolio_history(
        &self,
        period: &str,
        timeframe: &str,
    ) -> Result<PerformanceSeries, BrokerError> {
        let url = format!("{}/v2/account/portfolio/history", self.base_url);
        let body = self
            .get_json(
                &url,
                &[
                    ("period", period),
                    ("timeframe", timeframe),
                    ("intraday_reporting", "extended_hours"),
                ],
            )
            .await?;
        Ok(parse_history(&body))
    }

    async fn place_order(
        &self,
        symbol: &str,
        qty: i64,
        side: OrderSide,
    ) -> Result<PlacedOrder, BrokerError> {
        let url = format!("{}/v2/orders", self.base_url);
        let request = json!({
            "symbol": symbol,
            "qty": qty,
            "side": side.as_str(),
            "type": "market",
            "time_in_force": "day",
        });

        let resp = self
            .client
            .post(&url)
            .header("APCA-API-KEY-ID", &self.api_key)
            .header("APCA-API-SECRET-KEY", &self.api_secret)
            .json(&request)
            .send()
            .await
            .map_err(|e| BrokerError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(BrokerError::BadResponse(format!("HTTP {}: {}", status, body)));
        }

        let body = resp
            .json::<Value>()
            .await
            .map_err(|e| BrokerError::Parse(e.to_string()))?;

        Ok(parse_placed_order(symbol, qty, side, &body))
    }
}

// ---------------------------------------------------------------------------
// Payload translation. Pure so the odd shapes Alpaca has shipped over time
// stay covered by unit tests.
// ---------------------------------------------------------------------------

/// String-ish field extraction: accepts string and number primitives plus the
/// `{"value": ...}` wrapper some activity payloads use.
fn text(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Object(obj) => match obj.get("value") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        },
        _ => None,
    }
}

fn text_or(value: &Value, key: &str, default: &str) -> String {
    text(value, key).unwrap_or_else(|| default.to_string())
}

fn decimal(value: &Value, key: &str) -> BigDecimal {
    optional_decimal(value, key).unwrap_or_else(BigDecimal::zero)
}

fn optional_decimal(value: &Value, key: &str) -> Option<BigDecimal> {
    text(value, key).and_then(|s| BigDecimal::from_str(s.trim()).ok())
}

fn parse_account(body: &Value) -> AccountSummary {
    AccountSummary {
        id: text(body, "id"),
        status: text(body, "status"),
        currency: text(body, "currency"),
        cash: decimal(body, "cash"),
        portfolio_value: decimal(body, "portfolio_value"),
        buying_power: optional_decimal(body, "buying_power"),
        created_at: text(body, "created_at"),
    }
}

fn parse_open_orders(body: &Value) -> Vec<OpenOrder> {
    let Some(orders) = body.as_array() else {
        return Vec::new();
    };

    orders
        .iter()
        .filter(|o| o.is_object())
        .map(|o| OpenOrder {
            symbol: text_or(o, "symbol", PLACEHOLDER),
            side: text_or(o, "side", PLACEHOLDER),
            qty: text_or(o, "qty", PLACEHOLDER),
            status: text_or(o, "status", PLACEHOLDER),
            created_at: text_or(o, "created_at", PLACEHOLDER),
        })
        .collect()
}

/// The activities endpoint has returned both a bare array and a
/// `{"fills": [...]}` envelope; anything else counts as no fills.
fn unwrap_fills(body: Value) -> Vec<Value> {
    match body {
        Value::Array(entries) => entries,
        Value::Object(mut obj) => match obj.remove("fills") {
            Some(Value::Array(entries)) => entries,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// A fill entry may carry its detail flat, nested under `fill_data`, or with
/// `symbol` as an object; nested values win over flat ones.
fn parse_fill(entry: &Value) -> Fill {
    if !entry.is_object() {
        return Fill {
            symbol: PLACEHOLDER.to_string(),
            side: PLACEHOLDER.to_string(),
            qty: PLACEHOLDER.to_string(),
            price: PLACEHOLDER.to_string(),
            transaction_time: PLACEHOLDER.to_string(),
        };
    }

    let fill_data = entry.get("fill_data").filter(|v| v.is_object());
    let symbol_obj = entry.get("symbol").filter(|v| v.is_object());

    let nested = |key: &str| fill_data.and_then(|d| text(d, key));

    Fill {
        symbol: symbol_obj
            .and_then(|s| text(s, "symbol"))
            .or_else(|| text(entry, "symbol"))
            .unwrap_or_else(|| PLACEHOLDER.to_string()),
        side: nested("side").unwrap_or_else(|| text_or(entry, "side", PLACEHOLDER)),
        qty: nested("qty").unwrap_or_else(|| text_or(entry, "qty", PLACEHOLDER)),
        price: nested("price").unwrap_or_else(|| text_or(entry, "price", PLACEHOLDER)),
        transaction_time: nested("timestamp")
            .or_else(|| text(entry, "transaction_time"))
            .or_else(|| text(entry, "timestamp"))
            .unwrap_or_else(|| PLACEHOLDER.to_string()),
    }
}

/// Latest-trade payloads come either as `{"trade": {"p": .., "t": ..}}` or
/// flat with `p`/`t` at the top level.
fn parse_trade(symbol: &str, body: &Value) -> LastTrade {
    let trade = match body.get("trade") {
        Some(t) if t.is_object() => t,
        _ => body,
    };

    let price = trade.get("p").and_then(Value::as_f64).unwrap_or(0.0);

    LastTrade {
        symbol: symbol.to_string(),
        price,
        timestamp: text_or(trade, "t", PLACEHOLDER),
    }
}

fn parse_history(body: &Value) -> PerformanceSeries {
    let equity = body.get("equity").and_then(Value::as_array);
    let timestamps = body.get("timestamp").and_then(Value::as_array);

    let (Some(equity), Some(timestamps)) = (equity, timestamps) else {
        return PerformanceSeries::empty();
    };

    let mut series = PerformanceSeries::empty();
    for (eq, ts) in equity.iter().zip(timestamps.iter()) {
        let Some(ts) = ts.as_i64() else { continue };
        let Some(date) = DateTime::from_timestamp(ts, 0) else {
            continue;
        };
        let eq = eq.as_f64().unwrap_or(0.0);
        let Some(value) = BigDecimal::from_f64(eq) else {
            continue;
        };

        series.labels.push(date.format("%Y-%m-%d").to_string());
        series.equity.push(value);
    }
    series
}

fn parse_placed_order(symbol: &str, qty: i64, side: OrderSide, body: &Value) -> PlacedOrder {
    PlacedOrder {
        id: text_or(body, "id", PLACEHOLDER),
        symbol: symbol.to_string(),
        side: side.as_str().to_string(),
        qty: qty.to_string(),
        filled_qty: text_or(body, "filled_qty", "0"),
        order_type: text_or(body, "type", "market"),
        time_in_force: text_or(body, "time_in_force", "day"),
        status: text_or(body, "status", PLACEHOLDER),
        created_at: text_or(body, "created_at", PLACEHOLDER),
    }
}
