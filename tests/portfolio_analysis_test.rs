/// Portfolio Analysis Scenario Tests
///
/// Tests for the metric rules behind GET /api/analysis:
/// - Market-value weighting, sector aggregation and ordering
/// - Tech weighting and single-position concentration
/// - Volatility averaging with missing readings excluded
/// - Comment selection for risk, volatility and diversification
///
/// NOTE: These tests validate the computation rules on plain numbers.
/// The decimal-exact pipeline is covered by unit tests next to the services.

// ---------------------------------------------------------------------------
// Position modeling
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct PositionRow {
    symbol: &'static str,
    quantity: f64,
    market_value: f64,
    sector: &'static str,
    volatility: Option<f64>,
}

fn row(symbol: &'static str, quantity: f64, market_value: f64, sector: &'static str) -> PositionRow {
    PositionRow { symbol, quantity, market_value, sector, volatility: None }
}

fn row_vol(
    symbol: &'static str,
    quantity: f64,
    market_value: f64,
    sector: &'static str,
    volatility: f64,
) -> PositionRow {
    PositionRow { symbol, quantity, market_value, sector, volatility: Some(volatility) }
}

// ---------------------------------------------------------------------------
// Weighting rules
// ---------------------------------------------------------------------------

/// A position participates in the total and in every percentage only when it
/// has both a non-zero quantity and a positive market value.
fn counts_toward_weights(p: &PositionRow) -> bool {
    p.quantity != 0.0 && p.market_value > 0.0
}

fn portfolio_total(rows: &[PositionRow]) -> f64 {
    rows.iter().filter(|p| counts_toward_weights(p)).map(|p| p.market_value).sum()
}

/// Commercial rounding at two decimals (0.005 rounds up, not to even).
fn round2(value: f64) -> f64 {
    (value * 100.0 + 0.5).floor() / 100.0
}

fn percent(part: f64, total: f64) -> f64 {
    round2(part / total * 100.0)
}

/// Sector totals in first-encounter order, then sorted by weight descending.
/// The sort is stable, so equal weights keep their first-encounter order.
fn sector_weights(rows: &[PositionRow]) -> Vec<(String, f64)> {
    let total = portfolio_total(rows);
    if total <= 0.0 {
        return Vec::new();
    }
    let mut totals: Vec<(String, f64)> = Vec::new();
    for p in rows.iter().filter(|p| counts_toward_weights(p)) {
        let sector = if p.sector.trim().is_empty() { "Unknown" } else { p.sector };
        match totals.iter_mut().find(|(s, _)| s == sector) {
            Some((_, v)) => *v += p.market_value,
            None => totals.push((sector.to_string(), p.market_value)),
        }
    }
    totals.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());
    totals.into_iter().map(|(s, v)| (s, percent(v, total))).collect()
}

fn tech_weight(rows: &[PositionRow]) -> f64 {
    let total = portfolio_total(rows);
    if total <= 0.0 {
        return 0.0;
    }
    let tech: f64 = rows
        .iter()
        .filter(|p| counts_toward_weights(p))
        .filter(|p| p.sector.to_lowercase().contains("tech"))
        .map(|p| p.market_value)
        .sum();
    percent(tech, total)
}

/// Largest value-bearing position; a strict comparison keeps the first of
/// several equal-value positions.
fn top_position(rows: &[PositionRow]) -> Option<(&'static str, f64)> {
    let total = portfolio_total(rows);
    if total <= 0.0 {
        return None;
    }
    let mut best: Option<&PositionRow> = None;
    for p in rows.iter().filter(|p| counts_toward_weights(p)) {
        match best {
            Some(b) if p.market_value > b.market_value => best = Some(p),
            None => best = Some(p),
            _ => {}
        }
    }
    best.map(|p| (p.symbol, percent(p.market_value, total)))
}

// ---------------------------------------------------------------------------
// Comment rules
// ---------------------------------------------------------------------------

const TECH_HIGH: f64 = 40.0;
const TECH_MODERATE: f64 = 20.0;
const CONCENTRATION_HIGH: f64 = 25.0;
const CONCENTRATION_ELEVATED: f64 = 15.0;
const VOLATILITY_HIGH: f64 = 0.30;
const VOLATILITY_MODERATE: f64 = 0.15;
const SECTOR_DOMINANCE: f64 = 50.0;

fn risk_comment(tech: f64, top: Option<f64>) -> String {
    let mut parts: Vec<String> = Vec::new();
    if tech > TECH_HIGH {
        parts.push(format!("High tech weighting ({:.2}%).", tech));
    } else if tech > TECH_MODERATE {
        parts.push(format!("Moderate tech weighting ({:.2}%).", tech));
    }
    if let Some(weight) = top {
        if weight > CONCENTRATION_HIGH {
            parts.push(format!("Very high concentration in a single position ({:.2}%).", weight));
        } else if weight > CONCENTRATION_ELEVATED {
            parts.push(format!("Elevated concentration in a single position ({:.2}%).", weight));
        }
    }
    if parts.is_empty() {
        return "Risk profile looks balanced (no strong concentration visible).".to_string();
    }
    parts.join(" ")
}

/// Positions without a volatility reading stay out of the average entirely.
fn volatility_comment(rows: &[PositionRow]) -> String {
    let readings: Vec<f64> = rows.iter().filter_map(|p| p.volatility).collect();
    if readings.is_empty() {
        return "No volatility data available.".to_string();
    }
    let avg = round2(readings.iter().sum::<f64>() / readings.len() as f64);
    if avg > VOLATILITY_HIGH {
        format!("Average volatility is rather high ({:.2}).", avg)
    } else if avg > VOLATILITY_MODERATE {
        format!("Average volatility is moderate ({:.2}).", avg)
    } else {
        format!("Average volatility is rather low ({:.2}).", avg)
    }
}

fn diversification_comment(weights: &[(String, f64)]) -> String {
    if weights.is_empty() {
        return "No sector information available.".to_string();
    }
    if weights.len() <= 2 {
        return "Portfolio is concentrated in few sectors.".to_string();
    }
    if weights.iter().any(|(_, w)| *w > SECTOR_DOMINANCE) {
        return "One sector clearly dominates the portfolio (>50%).".to_string();
    }
    "Sector allocation looks reasonably diversified.".to_string()
}

// ---------------------------------------------------------------------------
// Weighting
// ---------------------------------------------------------------------------

#[cfg(test)]
mod weighting {
    use super::*;

    #[test]
    fn test_two_position_weights() {
        let rows = vec![row("AAPL", 50.0, 9000.0, "Technology"), row("JNJ", 40.0, 6000.0, "Healthcare")];
        let weights = sector_weights(&rows);
        assert_eq!(weights.len(), 2);
        assert_eq!(weights[0], ("Technology".to_string(), 60.0));
        assert_eq!(weights[1], ("Healthcare".to_string(), 40.0));
    }

    #[test]
    fn test_weights_sum_close_to_hundred() {
        let rows = vec![
            row("A", 1.0, 3333.0, "Energy"),
            row("B", 1.0, 3333.0, "Utilities"),
            row("C", 1.0, 3334.0, "Materials"),
        ];
        let sum: f64 = sector_weights(&rows).iter().map(|(_, w)| w).sum();
        assert!((sum - 100.0).abs() <= 0.05, "sum was {}", sum);
    }

    #[test]
    fn test_same_sector_accumulates() {
        let rows = vec![
            row("AAPL", 10.0, 4000.0, "Technology"),
            row("MSFT", 5.0, 4000.0, "Technology"),
            row("XOM", 8.0, 2000.0, "Energy"),
        ];
        let weights = sector_weights(&rows);
        assert_eq!(weights.len(), 2);
        assert_eq!(weights[0], ("Technology".to_string(), 80.0));
    }

    #[test]
    fn test_zero_quantity_position_carries_no_weight() {
        let rows = vec![
            row("AAPL", 10.0, 1000.0, "Technology"),
            row("GHOST", 0.0, 500.0, "Energy"),
        ];
        // The expired position neither adds a sector nor shrinks the others.
        let weights = sector_weights(&rows);
        assert_eq!(weights, vec![("Technology".to_string(), 100.0)]);
        assert_eq!(tech_weight(&rows), 100.0);
    }

    #[test]
    fn test_negative_market_value_carries_no_weight() {
        let rows = vec![
            row("AAPL", 10.0, 1000.0, "Technology"),
            row("BAD", 5.0, -200.0, "Energy"),
        ];
        assert_eq!(portfolio_total(&rows), 1000.0);
        assert_eq!(sector_weights(&rows).len(), 1);
    }

    #[test]
    fn test_short_position_counts() {
        // Short quantity with a positive market value still carries weight.
        let rows = vec![
            row("AAPL", 10.0, 1000.0, "Technology"),
            row("TSLA", -5.0, 1000.0, "Automotive"),
        ];
        let weights = sector_weights(&rows);
        assert_eq!(weights.len(), 2);
        assert_eq!(weights[0].1, 50.0);
        assert_eq!(weights[1].1, 50.0);
    }

    #[test]
    fn test_blank_sector_becomes_unknown() {
        let rows = vec![row("AAPL", 1.0, 100.0, "  ")];
        let weights = sector_weights(&rows);
        assert_eq!(weights[0].0, "Unknown");
    }

    #[test]
    fn test_equal_sector_weights_keep_first_encounter_order() {
        let rows = vec![
            row("U", 1.0, 1000.0, "Utilities"),
            row("E", 1.0, 1000.0, "Energy"),
            row("M", 1.0, 1000.0, "Materials"),
        ];
        let order: Vec<String> = sector_weights(&rows).into_iter().map(|(s, _)| s).collect();
        assert_eq!(order, vec!["Utilities", "Energy", "Materials"]);
    }

    #[test]
    fn test_empty_portfolio_has_no_weights() {
        assert!(sector_weights(&[]).is_empty());
        assert_eq!(tech_weight(&[]), 0.0);
        assert!(top_position(&[]).is_none());
    }
}

// ---------------------------------------------------------------------------
// Tech weight and top position
// ---------------------------------------------------------------------------

#[cfg(test)]
mod concentration {
    use super::*;

    #[test]
    fn test_information_technology_counts_as_tech() {
        let rows = vec![
            row("MSFT", 1.0, 600.0, "Information Technology"),
            row("JNJ", 1.0, 400.0, "Healthcare"),
        ];
        assert_eq!(tech_weight(&rows), 60.0);
    }

    #[test]
    fn test_biotechnology_counts_as_tech() {
        // Substring matching is deliberate, so Biotechnology lands in tech too.
        let rows = vec![
            row("AMGN", 1.0, 500.0, "Biotechnology"),
            row("XOM", 1.0, 500.0, "Energy"),
        ];
        assert_eq!(tech_weight(&rows), 50.0);
    }

    #[test]
    fn test_no_tech_positions_means_zero() {
        let rows = vec![row("XOM", 1.0, 500.0, "Energy"), row("JNJ", 1.0, 500.0, "Healthcare")];
        assert_eq!(tech_weight(&rows), 0.0);
    }

    #[test]
    fn test_all_tech_is_exactly_hundred() {
        let rows = vec![
            row("AAPL", 1.0, 700.0, "Technology"),
            row("MSFT", 1.0, 300.0, "Technology"),
        ];
        assert_eq!(tech_weight(&rows), 100.0);
    }

    #[test]
    fn test_top_position_is_largest_by_value() {
        let rows = vec![
            row("AAPL", 1.0, 300.0, "Technology"),
            row("MSFT", 1.0, 500.0, "Technology"),
            row("JNJ", 1.0, 200.0, "Healthcare"),
        ];
        assert_eq!(top_position(&rows), Some(("MSFT", 50.0)));
    }

    #[test]
    fn test_top_position_tie_keeps_first() {
        let rows = vec![
            row("AAPL", 1.0, 500.0, "Technology"),
            row("MSFT", 1.0, 500.0, "Technology"),
        ];
        assert_eq!(top_position(&rows), Some(("AAPL", 50.0)));
    }

    #[test]
    fn test_top_position_skips_non_value_bearing() {
        let rows = vec![
            row("GHOST", 0.0, 9999.0, "Energy"),
            row("AAPL", 1.0, 100.0, "Technology"),
        ];
        assert_eq!(top_position(&rows), Some(("AAPL", 100.0)));
    }
}

// ---------------------------------------------------------------------------
// Rounding
// ---------------------------------------------------------------------------

#[cfg(test)]
mod rounding {
    use super::*;

    #[test]
    fn test_half_rounds_up() {
        assert_eq!(round2(12.345), 12.35);
        assert_eq!(round2(0.005), 0.01);
    }

    #[test]
    fn test_below_half_rounds_down() {
        assert_eq!(round2(12.344), 12.34);
    }

    #[test]
    fn test_exact_two_decimals_unchanged() {
        assert_eq!(round2(60.0), 60.0);
        assert_eq!(round2(33.33), 33.33);
    }

    #[test]
    fn test_repeating_third_rounds_to_33_33() {
        assert_eq!(percent(1.0, 3.0), 33.33);
    }
}

// ---------------------------------------------------------------------------
// Risk comment selection
// ---------------------------------------------------------------------------

#[cfg(test)]
mod risk_comments {
    use super::*;

    #[test]
    fn test_balanced_when_nothing_triggers() {
        // Ten equal positions: top weight 10%, no tech.
        let comment = risk_comment(0.0, Some(10.0));
        assert_eq!(comment, "Risk profile looks balanced (no strong concentration visible).");
    }

    #[test]
    fn test_high_tech_weighting() {
        let comment = risk_comment(60.0, Some(10.0));
        assert_eq!(comment, "High tech weighting (60.00%).");
    }

    #[test]
    fn test_moderate_tech_weighting() {
        let comment = risk_comment(30.0, Some(10.0));
        assert_eq!(comment, "Moderate tech weighting (30.00%).");
    }

    #[test]
    fn test_tech_threshold_is_strict() {
        // Exactly 40% stays moderate, exactly 20% does not trigger at all.
        assert!(risk_comment(40.0, None).starts_with("Moderate tech weighting"));
        assert!(risk_comment(20.0, None).starts_with("Risk profile looks balanced"));
    }

    #[test]
    fn test_very_high_concentration() {
        let comment = risk_comment(0.0, Some(40.0));
        assert_eq!(comment, "Very high concentration in a single position (40.00%).");
    }

    #[test]
    fn test_elevated_concentration() {
        let comment = risk_comment(0.0, Some(20.0));
        assert_eq!(comment, "Elevated concentration in a single position (20.00%).");
    }

    #[test]
    fn test_concentration_threshold_is_strict() {
        assert!(risk_comment(0.0, Some(25.0)).starts_with("Elevated concentration"));
        assert!(risk_comment(0.0, Some(15.0)).starts_with("Risk profile looks balanced"));
    }

    #[test]
    fn test_both_findings_join_with_single_space() {
        let comment = risk_comment(45.0, Some(30.0));
        assert_eq!(
            comment,
            "High tech weighting (45.00%). Very high concentration in a single position (30.00%)."
        );
        assert!(!comment.ends_with(' '));
    }

    #[test]
    fn test_moderate_tech_with_elevated_concentration() {
        let comment = risk_comment(25.0, Some(18.0));
        assert_eq!(
            comment,
            "Moderate tech weighting (25.00%). Elevated concentration in a single position (18.00%)."
        );
    }
}

// ---------------------------------------------------------------------------
// Volatility comment selection
// ---------------------------------------------------------------------------

#[cfg(test)]
mod volatility_comments {
    use super::*;

    #[test]
    fn test_no_readings_is_its_own_message() {
        let rows = vec![row("AAPL", 1.0, 100.0, "Technology")];
        assert_eq!(volatility_comment(&rows), "No volatility data available.");
    }

    #[test]
    fn test_missing_readings_are_excluded_from_the_average() {
        // 0.50 and 0.30 average to 0.40; the position without a reading does
        // not drag the average toward zero.
        let rows = vec![
            row_vol("AAPL", 1.0, 100.0, "Technology", 0.50),
            row_vol("MSFT", 1.0, 100.0, "Technology", 0.30),
            row("JNJ", 1.0, 100.0, "Healthcare"),
        ];
        assert_eq!(volatility_comment(&rows), "Average volatility is rather high (0.40).");
    }

    #[test]
    fn test_moderate_band() {
        let rows = vec![
            row_vol("AAPL", 1.0, 100.0, "Technology", 0.20),
            row_vol("MSFT", 1.0, 100.0, "Technology", 0.24),
        ];
        assert_eq!(volatility_comment(&rows), "Average volatility is moderate (0.22).");
    }

    #[test]
    fn test_low_band() {
        let rows = vec![row_vol("KO", 1.0, 100.0, "Consumer Staples", 0.08)];
        assert_eq!(volatility_comment(&rows), "Average volatility is rather low (0.08).");
    }

    #[test]
    fn test_exact_moderate_threshold_reads_low() {
        let rows = vec![row_vol("KO", 1.0, 100.0, "Consumer Staples", 0.15)];
        assert_eq!(volatility_comment(&rows), "Average volatility is rather low (0.15).");
    }
}

// ---------------------------------------------------------------------------
// Diversification comment selection
// ---------------------------------------------------------------------------

#[cfg(test)]
mod diversification_comments {
    use super::*;

    #[test]
    fn test_no_sectors() {
        assert_eq!(diversification_comment(&[]), "No sector information available.");
    }

    #[test]
    fn test_two_sectors_is_concentrated() {
        let weights = vec![("Technology".to_string(), 60.0), ("Healthcare".to_string(), 40.0)];
        assert_eq!(diversification_comment(&weights), "Portfolio is concentrated in few sectors.");
    }

    #[test]
    fn test_dominant_sector_above_half() {
        let weights = vec![
            ("Technology".to_string(), 60.0),
            ("Healthcare".to_string(), 25.0),
            ("Energy".to_string(), 15.0),
        ];
        assert_eq!(
            diversification_comment(&weights),
            "One sector clearly dominates the portfolio (>50%)."
        );
    }

    #[test]
    fn test_exactly_half_does_not_dominate() {
        let weights = vec![
            ("Technology".to_string(), 50.0),
            ("Healthcare".to_string(), 30.0),
            ("Energy".to_string(), 20.0),
        ];
        assert_eq!(
            diversification_comment(&weights),
            "Sector allocation looks reasonably diversified."
        );
    }

    #[test]
    fn test_spread_portfolio_reads_diversified() {
        let weights = vec![
            ("Technology".to_string(), 30.0),
            ("Healthcare".to_string(), 25.0),
            ("Energy".to_string(), 25.0),
            ("Utilities".to_string(), 20.0),
        ];
        assert_eq!(
            diversification_comment(&weights),
            "Sector allocation looks reasonably diversified."
        );
    }

    #[test]
    fn test_concentration_beats_dominance_for_two_sectors() {
        // Two sectors with one above 50% still reads as "few sectors".
        let weights = vec![("Technology".to_string(), 80.0), ("Energy".to_string(), 20.0)];
        assert_eq!(diversification_comment(&weights), "Portfolio is concentrated in few sectors.");
    }
}

// ---------------------------------------------------------------------------
// End-to-end scenarios
// ---------------------------------------------------------------------------

#[cfg(test)]
mod scenarios {
    use super::*;

    #[test]
    fn test_tech_heavy_two_stock_portfolio() {
        let rows = vec![
            row_vol("AAPL", 50.0, 9000.0, "Technology", 0.35),
            row_vol("JNJ", 40.0, 6000.0, "Healthcare", 0.18),
        ];

        assert_eq!(tech_weight(&rows), 60.0);
        assert_eq!(top_position(&rows), Some(("AAPL", 60.0)));

        let risk = risk_comment(60.0, Some(60.0));
        assert!(risk.contains("High tech weighting (60.00%)."));
        assert!(risk.contains("Very high concentration in a single position (60.00%)."));

        // (0.35 + 0.18) / 2 = 0.265, in the moderate band.
        assert_eq!(volatility_comment(&rows), "Average volatility is moderate (0.27).");

        let weights = sector_weights(&rows);
        assert_eq!(diversification_comment(&weights), "Portfolio is concentrated in few sectors.");
    }

    #[test]
    fn test_evenly_spread_portfolio() {
        let rows = vec![
            row_vol("XOM", 10.0, 2500.0, "Energy", 0.12),
            row_vol("JNJ", 10.0, 2500.0, "Healthcare", 0.10),
            row_vol("NEE", 10.0, 2500.0, "Utilities", 0.14),
            row_vol("LIN", 10.0, 2500.0, "Materials", 0.12),
        ];

        assert_eq!(tech_weight(&rows), 0.0);
        let top = top_position(&rows).unwrap();
        assert_eq!(top.1, 25.0);

        assert_eq!(
            risk_comment(0.0, Some(25.0)),
            "Elevated concentration in a single position (25.00%)."
        );
        assert_eq!(volatility_comment(&rows), "Average volatility is rather low (0.12).");
        assert_eq!(
            diversification_comment(&sector_weights(&rows)),
            "Sector allocation looks reasonably diversified."
        );
    }

    #[test]
    fn test_weights_are_deterministic() {
        let rows = vec![
            row("AAPL", 3.0, 1200.0, "Technology"),
            row("XOM", 2.0, 800.0, "Energy"),
            row("JNJ", 4.0, 1000.0, "Healthcare"),
        ];
        let first = sector_weights(&rows);
        for _ in 0..10 {
            assert_eq!(sector_weights(&rows), first);
        }
    }
}
