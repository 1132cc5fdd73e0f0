use bigdecimal::BigDecimal;
use tracing::warn;

use crate::external::ml_service::ScoringProvider;
use crate::models::{Position, RiskScore, StageOutcome, TrendDirection, TrendScore};

/// Symbols scored when the portfolio itself offers none.
pub const DEFAULT_TREND_SYMBOLS: [&str; 2] = ["AAPL", "MSFT"];

const MAX_TREND_SYMBOLS: usize = 5;

/// Picks the symbols worth trend-scoring: the first five distinct symbols in
/// position order, or the default pair for an empty portfolio.
pub fn select_trend_symbols(positions: &[Position]) -> Vec<String> {
    let mut symbols: Vec<String> = Vec::new();

    for p in positions {
        let symbol = p.symbol.trim();
        if symbol.is_empty() || symbols.iter().any(|s| s == symbol) {
            continue;
        }
        symbols.push(symbol.to_string());
        if symbols.len() == MAX_TREND_SYMBOLS {
            break;
        }
    }

    if symbols.is_empty() {
        return DEFAULT_TREND_SYMBOLS.iter().map(|s| s.to_string()).collect();
    }
    symbols
}

/// Portfolio risk scoring as one degradable stage: any failure yields the
/// UNKNOWN fallback score, with the cause kept in the explanation.
pub async fn score_risk_stage(
    scoring: &dyn ScoringProvider,
    cash: &BigDecimal,
    positions: &[Position],
) -> StageOutcome<RiskScore> {
    let result = scoring.score_risk(cash, positions).await;
    if let Err(e) = &result {
        warn!("Risk scoring failed: {}", e);
    }

    StageOutcome::from_result("risk scoring", result, |e| {
        RiskScore::unavailable(format!("Risk scoring unavailable: {}", e))
    })
}

/// Trend scoring fans out one concurrent call per symbol with per-symbol
/// isolation: a failed symbol becomes a neutral entry in place, the rest keep
/// their live scores, and the stage reports degraded naming the casualties.
/// Output order always matches the requested symbol order.
pub async fn score_trends_stage(
    scoring: &dyn ScoringProvider,
    symbols: &[String],
) -> StageOutcome<Vec<TrendScore>> {
    let calls: Vec<_> = symbols
        .iter()
        .map(|symbol| async move {
            let result = scoring.score_trend(symbol).await;
            (symbol.clone(), result)
        })
        .collect();

    let mut scores = Vec::with_capacity(symbols.len());
    let mut failures: Vec<String> = Vec::new();

    for (symbol, result) in futures::future::join_all(calls).await {
        match result {
            Ok(score) => scores.push(score),
            Err(e) => {
                warn!("Trend scoring failed for {}: {}", symbol, e);
                failures.push(symbol.clone());
                scores.push(TrendScore {
                    symbol,
                    score: 0.0,
                    direction: TrendDirection::Neutral,
                    explanation: format!("Trend scoring unavailable: {}", e),
                });
            }
        }
    }

    if failures.is_empty() {
        StageOutcome::Live(scores)
    } else {
        StageOutcome::degraded(
            scores,
            format!(
                "trend scoring: {} of {} symbol(s) failed: {}",
                failures.len(),
                symbols.len(),
                failures.join(", ")
            ),
        )
    }
}
