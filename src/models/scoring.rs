use serde::{Deserialize, Serialize};

/// Portfolio-level risk verdict from the scoring service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskScore {
    /// 0 (no risk signal) to 100, clamped during normalization.
    pub score: i64,

    /// LOW, MEDIUM or HIGH from the vendor; UNKNOWN when scoring failed.
    pub level: String,

    pub explanation: String,

    /// Extra context some service versions return; passed through when
    /// present.
    pub total_value: Option<f64>,
    pub num_positions: Option<i64>,
    pub concentration: Option<f64>,
}

pub const UNKNOWN_RISK_LEVEL: &str = "UNKNOWN";

impl RiskScore {
    /// Fallback used whenever the scoring service cannot be reached or its
    /// answer cannot be understood. The reason survives in the explanation
    /// so the dashboard stays diagnosable.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            score: 0,
            level: UNKNOWN_RISK_LEVEL.to_string(),
            explanation: reason.into(),
            total_value: None,
            num_positions: None,
            concentration: None,
        }
    }
}

/// Direction labels the scoring service has used across its releases.
/// Serializes uppercase (`"UP"`, `"NEUTRAL"`) as the dashboard expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TrendDirection {
    Up,
    Down,
    Neutral,
    Flat,
}

impl TrendDirection {
    /// Case-insensitive parse; anything unrecognized reads as neutral.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "up" => TrendDirection::Up,
            "down" => TrendDirection::Down,
            "flat" => TrendDirection::Flat,
            _ => TrendDirection::Neutral,
        }
    }
}

/// Per-symbol trend verdict.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendScore {
    pub symbol: String,
    pub score: f64,

    /// Named `trend` on the wire.
    #[serde(rename = "trend")]
    pub direction: TrendDirection,

    pub explanation: String,
}
