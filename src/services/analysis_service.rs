use bigdecimal::{BigDecimal, FromPrimitive, Zero};

use crate::models::{
    AnalysisThresholds, PortfolioMetrics, Position, SectorWeight, TopPosition, UNKNOWN_SECTOR,
};

pub const NO_POSITIONS_COMMENT: &str = "No positions in the portfolio.";
pub const ZERO_TOTAL_COMMENT: &str = "Total market value is 0 or negative.";
pub const BALANCED_RISK_COMMENT: &str =
    "Risk profile looks balanced (no strong concentration visible).";
pub const NO_VOLATILITY_DATA_COMMENT: &str = "No volatility data available.";
pub const NO_SECTOR_INFO_COMMENT: &str = "No sector information available.";
const COMMENT_PLACEHOLDER: &str = "-";

/// Computes the full set of portfolio metrics from normalized positions.
/// Pure and deterministic: the same position list always produces the same
/// metrics, including ordering.
///
/// Only value-bearing positions (nonzero quantity, positive market value)
/// count toward the total and every percentage derived from it, which keeps
/// sector weights summing to ~100% regardless of zero-quantity leftovers in
/// the feed.
pub fn analyse(positions: &[Position], thresholds: &AnalysisThresholds) -> PortfolioMetrics {
    if positions.is_empty() {
        return empty_metrics(NO_POSITIONS_COMMENT);
    }

    let value_bearing: Vec<&Position> = positions
        .iter()
        .filter(|p| p.counts_toward_weights())
        .collect();

    let total = value_bearing
        .iter()
        .fold(BigDecimal::zero(), |acc, p| acc + &p.market_value);

    if total <= BigDecimal::zero() {
        return empty_metrics(ZERO_TOTAL_COMMENT);
    }

    let sector_weights = build_sector_weights(&value_bearing, &total);
    let tech_weight = compute_tech_weight(&value_bearing, &total);
    let top_position = find_top_position(&value_bearing, &total);

    PortfolioMetrics {
        risk_comment: build_risk_comment(&tech_weight, top_position.as_ref(), thresholds),
        volatility_comment: build_volatility_comment(positions, thresholds),
        diversification_comment: build_diversification_comment(&sector_weights, thresholds),
        total_market_value: total,
        sector_weights,
        tech_weight,
        top_position,
    }
}

fn empty_metrics(risk_comment: &str) -> PortfolioMetrics {
    PortfolioMetrics {
        total_market_value: BigDecimal::zero(),
        sector_weights: Vec::new(),
        tech_weight: BigDecimal::zero(),
        top_position: None,
        risk_comment: risk_comment.to_string(),
        volatility_comment: COMMENT_PLACEHOLDER.to_string(),
        diversification_comment: COMMENT_PLACEHOLDER.to_string(),
    }
}

/// Market value aggregated per sector, converted to percent weights. Sorted
/// descending by value; the sort is stable, so equal sectors keep the order
/// in which they first appeared in the position list.
fn build_sector_weights(positions: &[&Position], total: &BigDecimal) -> Vec<SectorWeight> {
    let mut sector_values: Vec<(String, BigDecimal)> = Vec::new();

    for p in positions {
        let sector = if p.sector.trim().is_empty() {
            UNKNOWN_SECTOR
        } else {
            p.sector.as_str()
        };

        match sector_values.iter_mut().find(|(s, _)| s.as_str() == sector) {
            Some((_, value)) => *value += &p.market_value,
            None => sector_values.push((sector.to_string(), p.market_value.clone())),
        }
    }

    sector_values.sort_by(|a, b| b.1.cmp(&a.1));

    sector_values
        .into_iter()
        .map(|(sector, value)| {
            let weight = percent(&value, total);
            SectorWeight {
                sector,
                value,
                weight,
            }
        })
        .collect()
}

/// Share of anything whose sector name contains "tech", case-insensitively,
/// so "Information Technology" counts as well.
fn compute_tech_weight(positions: &[&Position], total: &BigDecimal) -> BigDecimal {
    let tech_value = positions
        .iter()
        .filter(|p| p.sector.to_lowercase().contains("tech"))
        .fold(BigDecimal::zero(), |acc, p| acc + &p.market_value);

    if tech_value <= BigDecimal::zero() {
        return BigDecimal::zero();
    }

    percent(&tech_value, total)
}

/// Largest position by market value; ties resolve to the first encountered.
fn find_top_position(positions: &[&Position], total: &BigDecimal) -> Option<TopPosition> {
    let mut top: Option<&Position> = None;

    for p in positions.iter().copied() {
        match top {
            Some(current) if p.market_value > current.market_value => top = Some(p),
            None => top = Some(p),
            _ => {}
        }
    }

    top.map(|p| TopPosition {
        symbol: p.symbol.clone(),
        value: p.market_value.clone(),
        weight: percent(&p.market_value, total),
    })
}

/// Concatenates the applicable warnings: a tech-weighting sentence and a
/// single-position-concentration sentence can both appear. Falls back to the
/// balanced message when nothing crosses a threshold.
fn build_risk_comment(
    tech_weight: &BigDecimal,
    top: Option<&TopPosition>,
    thresholds: &AnalysisThresholds,
) -> String {
    let mut parts: Vec<String> = Vec::new();

    if *tech_weight > thresholds.tech_weight_high {
        parts.push(format!("High tech weighting ({}%).", tech_weight));
    } else if *tech_weight > thresholds.tech_weight_moderate {
        parts.push(format!("Moderate tech weighting ({}%).", tech_weight));
    }

    if let Some(top) = top {
        if top.weight > thresholds.concentration_high {
            parts.push(format!(
                "Very high concentration in a single position ({}%).",
                top.weight
            ));
        } else if top.weight > thresholds.concentration_elevated {
            parts.push(format!(
                "Elevated concentration in a single position ({}%).",
                top.weight
            ));
        }
    }

    if parts.is_empty() {
        return BALANCED_RISK_COMMENT.to_string();
    }
    parts.join(" ")
}

/// Mean volatility over the positions that carry volatility data; positions
/// without data stay out of both numerator and denominator. No data at all
/// is its own message, not a "low" classification.
fn build_volatility_comment(positions: &[Position], thresholds: &AnalysisThresholds) -> String {
    let mut sum = BigDecimal::zero();
    let mut count: u32 = 0;

    for p in positions {
        if let Some(vol) = p.volatility.and_then(BigDecimal::from_f64) {
            sum += vol;
            count += 1;
        }
    }

    if count == 0 {
        return NO_VOLATILITY_DATA_COMMENT.to_string();
    }

    let avg = round_half_up_2(&(sum / BigDecimal::from(count)));

    if avg > thresholds.volatility_high {
        format!("Average volatility is rather high ({}).", avg)
    } else if avg > thresholds.volatility_moderate {
        format!("Average volatility is moderate ({}).", avg)
    } else {
        format!("Average volatility is rather low ({}).", avg)
    }
}

fn build_diversification_comment(
    sector_weights: &[SectorWeight],
    thresholds: &AnalysisThresholds,
) -> String {
    if sector_weights.is_empty() {
        return NO_SECTOR_INFO_COMMENT.to_string();
    }

    if sector_weights.len() <= 2 {
        return "Portfolio is concentrated in few sectors.".to_string();
    }

    let single_dominant = sector_weights
        .iter()
        .any(|s| s.weight > thresholds.sector_dominance);

    if single_dominant {
        return "One sector clearly dominates the portfolio (>50%).".to_string();
    }

    "Sector allocation looks reasonably diversified.".to_string()
}

fn percent(value: &BigDecimal, total: &BigDecimal) -> BigDecimal {
    round_half_up_2(&(value * BigDecimal::from(100) / total))
}

/// Round half away from zero to two decimal places, keeping scale 2 so the
/// value serializes as e.g. "60.00" rather than "60".
fn round_half_up_2(value: &BigDecimal) -> BigDecimal {
    let scaled = value * BigDecimal::from(100);
    let half = BigDecimal::from(1) / BigDecimal::from(2);

    let shifted = if scaled >= BigDecimal::zero() {
        scaled + half
    } else {
        scaled - half
    };

    (shifted.with_scale(0) / BigDecimal::from(100)).with_scale(2)
}
