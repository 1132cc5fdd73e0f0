use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::models::narrative::Narrative;
use crate::models::position::Position;
use crate::models::scoring::{RiskScore, TrendScore};

/// One sector's slice of the portfolio.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorWeight {
    pub sector: String,

    /// Absolute market value held in the sector.
    pub value: BigDecimal,

    /// Share of total market value, in percent at scale 2.
    pub weight: BigDecimal,
}

/// The single largest position by market value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopPosition {
    pub symbol: String,
    pub value: BigDecimal,

    /// Share of total market value, in percent at scale 2.
    pub weight: BigDecimal,
}

/// Output of the portfolio metrics calculator. Deterministic for a given
/// position list; comments are fixed English sentences the frontend renders
/// verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioMetrics {
    pub total_market_value: BigDecimal,

    /// Descending by weight; ties keep first-encountered sector order.
    pub sector_weights: Vec<SectorWeight>,

    /// Combined weight of sectors whose name contains "tech", in percent.
    pub tech_weight: BigDecimal,

    pub top_position: Option<TopPosition>,

    pub risk_comment: String,
    pub volatility_comment: String,
    pub diversification_comment: String,
}

/// Cut-offs for the heuristic commentary. Constructor-injected so tests can
/// pin their own values; `Default` carries the production settings.
#[derive(Debug, Clone)]
pub struct AnalysisThresholds {
    /// Tech weight (percent) above which the allocation reads as high.
    pub tech_weight_high: BigDecimal,

    /// Tech weight (percent) above which the allocation reads as moderate.
    pub tech_weight_moderate: BigDecimal,

    /// Top-position weight (percent) above which concentration is very high.
    pub concentration_high: BigDecimal,

    /// Top-position weight (percent) above which concentration is elevated.
    pub concentration_elevated: BigDecimal,

    /// Average volatility above which the portfolio reads as volatile.
    pub volatility_high: BigDecimal,

    /// Average volatility above which volatility reads as moderate.
    pub volatility_moderate: BigDecimal,

    /// Single-sector weight (percent) above which one sector dominates.
    pub sector_dominance: BigDecimal,
}

impl Default for AnalysisThresholds {
    fn default() -> Self {
        Self {
            tech_weight_high: BigDecimal::from(40),
            tech_weight_moderate: BigDecimal::from(20),
            concentration_high: BigDecimal::from(25),
            concentration_elevated: BigDecimal::from(15),
            volatility_high: BigDecimal::from(30) / BigDecimal::from(100),
            volatility_moderate: BigDecimal::from(15) / BigDecimal::from(100),
            sector_dominance: BigDecimal::from(50),
        }
    }
}

/// Equity curve for the performance chart, parallel label/value arrays.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSeries {
    pub labels: Vec<String>,
    pub equity: Vec<BigDecimal>,
}

impl PerformanceSeries {
    pub fn empty() -> Self {
        Self {
            labels: Vec::new(),
            equity: Vec::new(),
        }
    }
}

/// Everything the analysis page needs in one response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    #[serde(flatten)]
    pub metrics: PortfolioMetrics,

    pub risk_score: RiskScore,
    pub trend_scores: Vec<TrendScore>,
    pub narrative: Narrative,
    pub positions: Vec<Position>,
    pub performance: PerformanceSeries,

    /// Human-readable reasons for every stage that fell back to a default.
    pub degraded_stages: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::Zero;

    #[test]
    fn report_serializes_camel_case_top_level_keys() {
        let metrics = PortfolioMetrics {
            total_market_value: BigDecimal::from(15000),
            sector_weights: Vec::new(),
            tech_weight: BigDecimal::zero(),
            top_position: None,
            risk_comment: "-".to_string(),
            volatility_comment: "-".to_string(),
            diversification_comment: "-".to_string(),
        };
        let report = AnalysisReport {
            metrics,
            risk_score: RiskScore::unavailable("scoring offline"),
            trend_scores: Vec::new(),
            narrative: Narrative::fallback("-"),
            positions: Vec::new(),
            performance: PerformanceSeries::empty(),
            degraded_stages: Vec::new(),
        };

        let value = serde_json::to_value(&report).unwrap();
        assert!(value.get("totalMarketValue").is_some());
        assert!(value.get("sectorWeights").is_some());
        assert!(value.get("techWeight").is_some());
        assert!(value.get("riskScore").is_some());
        assert!(value.get("trendScores").is_some());
        assert!(value.get("degradedStages").is_some());
        assert!(value.get("risk").is_none());
        assert_eq!(value["riskScore"]["level"], "UNKNOWN");
    }
}
