use std::time::Duration;

use async_trait::async_trait;
use bigdecimal::{BigDecimal, ToPrimitive, Zero};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::models::{
    Position, RiskScore, TrendDirection, TrendScore, UNKNOWN_RISK_LEVEL, UNKNOWN_SECTOR,
};

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),
}

#[async_trait]
pub trait ScoringProvider: Send + Sync {
    async fn score_risk(
        &self,
        cash: &BigDecimal,
        positions: &[Position],
    ) -> Result<RiskScore, ScoringError>;

    async fn score_trend(&self, symbol: &str) -> Result<TrendScore, ScoringError>;

    async fn train(&self) -> Result<Value, ScoringError>;
}

/// Client for the in-house scoring service. The service has shipped several
/// response layouts over time (snake_case, camelCase, shortened keys), so
/// responses are normalized field by field instead of deserialized strictly.
pub struct MlServiceClient {
    client: Client,
    base_url: String,
}

impl MlServiceClient {
    pub fn from_env() -> Self {
        let base_url = std::env::var("ML_SERVICE_BASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "http://localhost:8000".to_string());

        Self::new(base_url)
    }

    pub fn new(base_url: String) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(8))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ScoringProvider for MlServiceClient {
    async fn score_risk(
        &self,
        cash: &BigDecimal,
        positions: &[Position],
    ) -> Result<RiskScore, ScoringError> {
        let url = format!("{}/risk", self.base_url);
        let request = build_risk_request(cash, positions);
        debug!(
            "Scoring risk for {} position(s) via {}",
            request.positions.len(),
            url
        );

        let resp = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ScoringError::Network(e.to_string()))?;

        let body = into_json(resp).await?;
        normalize_risk_response(&body)
    }

    async fn score_trend(&self, symbol: &str) -> Result<TrendScore, ScoringError> {
        let url = format!("{}/trend", self.base_url);

        let resp = self
            .client
            .get(&url)
            .query(&[("symbol", symbol)])
            .send()
            .await
            .map_err(|e| ScoringError::Network(e.to_string()))?;

        let body = into_json(resp).await?;
        normalize_trend_response(symbol, &body)
    }

    async fn train(&self) -> Result<Value, ScoringError> {
        let url = format!("{}/train", self.base_url);

        let resp = self
            .client
            .post(&url)
            .send()
            .await
            .map_err(|e| ScoringError::Network(e.to_string()))?;

        into_json(resp).await
    }
}

async fn into_json(resp: reqwest::Response) -> Result<Value, ScoringError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(ScoringError::BadResponse(format!("HTTP {}: {}", status, body)));
    }

    resp.json::<Value>()
        .await
        .map_err(|e| ScoringError::Parse(e.to_string()))
}

#[derive(Debug, Serialize)]
struct RiskRequest {
    cash: f64,
    positions: Vec<RiskRequestPosition>,
}

#[derive(Debug, Serialize)]
struct RiskRequestPosition {
    symbol: String,
    quantity: f64,
    last_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    sector: Option<String>,
}

fn build_risk_request(cash: &BigDecimal, positions: &[Position]) -> RiskRequest {
    let positions = positions
        .iter()
        .filter(|p| !p.symbol.trim().is_empty())
        .map(|p| {
            // Only derive a price from positive quantity and value; shorts
            // and worthless lines go over as price 0 rather than nonsense.
            let priced =
                p.quantity > BigDecimal::zero() && p.market_value > BigDecimal::zero();
            let last_price = if priced {
                (&p.market_value / &p.quantity).to_f64().unwrap_or(0.0)
            } else {
                0.0
            };

            RiskRequestPosition {
                symbol: p.symbol.clone(),
                quantity: p.quantity.to_f64().unwrap_or(0.0),
                last_price,
                sector: (p.sector != UNKNOWN_SECTOR).then(|| p.sector.clone()),
            }
        })
        .collect();

    RiskRequest {
        cash: cash.to_f64().unwrap_or(0.0),
        positions,
    }
}

fn pick<'a>(body: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| body.get(*k))
}

fn pick_f64(body: &Value, keys: &[&str]) -> Option<f64> {
    match pick(body, keys)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn pick_i64(body: &Value, keys: &[&str]) -> Option<i64> {
    match pick(body, keys)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn pick_text(body: &Value, keys: &[&str]) -> Option<String> {
    match pick(body, keys)? {
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

fn normalize_risk_response(body: &Value) -> Result<RiskScore, ScoringError> {
    if !body.is_object() {
        return Err(ScoringError::Parse(format!(
            "expected a risk object, got: {}",
            body
        )));
    }

    // FastAPI validation errors arrive as 200s with a "detail" envelope in
    // some deployments; treat them as failures either way.
    if let Some(detail) = body.get("detail") {
        return Err(ScoringError::BadResponse(format!(
            "scoring service rejected the request: {}",
            detail
        )));
    }

    let score = pick_f64(body, &["risk_score", "riskScore", "score"])
        .unwrap_or(0.0)
        .round()
        .clamp(0.0, 100.0) as i64;

    let level = pick_text(body, &["risk_level", "riskLevel", "level"])
        .map(|l| l.trim().to_uppercase())
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| UNKNOWN_RISK_LEVEL.to_string());

    Ok(RiskScore {
        score,
        level,
        explanation: pick_text(body, &["explanation", "message"]).unwrap_or_default(),
        total_value: pick_f64(body, &["total_value", "totalValue"]),
        num_positions: pick_i64(body, &["num_positions", "numPositions"]),
        concentration: pick_f64(body, &["concentration"]),
    })
}

fn normalize_trend_response(requested: &str, body: &Value) -> Result<TrendScore, ScoringError> {
    if !body.is_object() {
        return Err(ScoringError::Parse(format!(
            "expected a trend object, got: {}",
            body
        )));
    }

    if let Some(detail) = body.get("detail") {
        return Err(ScoringError::BadResponse(format!(
            "scoring service rejected the request: {}",
            detail
        )));
    }

    let direction = pick_text(body, &["trend", "direction"])
        .map(|label| TrendDirection::from_label(&label))
        .unwrap_or(TrendDirection::Neutral);

    Ok(TrendScore {
        symbol: pick_text(body, &["symbol"])
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| requested.to_string()),
        score: pick_f64(body, &["score", "trend_score"]).unwrap_or(0.0),
        direction,
        explanation: pick_text(body, &["explanation", "message"]).unwrap_or_default(),
    })
}
