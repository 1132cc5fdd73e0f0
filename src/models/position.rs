use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};

/// A normalized holding, independent of any one broker's payload shape.
///
/// Monetary fields are `BigDecimal` end to end; the normalizer maps missing
/// or unparseable upstream values to zero rather than failing the batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub symbol: String,

    /// Share count; fractional quantities are valid.
    pub quantity: BigDecimal,

    /// Current market value of the whole position, never negative after
    /// normalization.
    pub market_value: BigDecimal,

    /// Open profit/loss as reported by the broker.
    pub unrealized_pnl: BigDecimal,

    /// Sector classification, `"Unknown"` until enrichment fills it in.
    pub sector: String,

    /// Volatility supplied by a scoring service, absent for broker-only data.
    pub volatility: Option<f64>,
}

pub const UNKNOWN_SECTOR: &str = "Unknown";

impl Position {
    /// Whether this position counts toward percentage metrics. A position
    /// with zero quantity or non-positive value stays in the list but
    /// contributes no weight.
    pub fn counts_toward_weights(&self) -> bool {
        !self.quantity.is_zero() && self.market_value > BigDecimal::zero()
    }
}

/// Account snapshot from the trading API.
///
/// `cash` and `portfolio_value` default to zero when the upstream field is
/// missing or unparseable; the remaining fields pass through for the account
/// view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub id: Option<String>,
    pub status: Option<String>,
    pub currency: Option<String>,
    pub cash: BigDecimal,
    pub portfolio_value: BigDecimal,
    pub buying_power: Option<BigDecimal>,
    pub created_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn position(qty: &str, value: &str) -> Position {
        Position {
            symbol: "AAPL".to_string(),
            quantity: BigDecimal::from_str(qty).unwrap(),
            market_value: BigDecimal::from_str(value).unwrap(),
            unrealized_pnl: BigDecimal::zero(),
            sector: UNKNOWN_SECTOR.to_string(),
            volatility: None,
        }
    }

    #[test]
    fn positive_quantity_and_value_counts() {
        assert!(position("10", "1500").counts_toward_weights());
    }

    #[test]
    fn zero_quantity_does_not_count() {
        assert!(!position("0", "500").counts_toward_weights());
    }

    #[test]
    fn zero_value_does_not_count() {
        assert!(!position("10", "0").counts_toward_weights());
    }

    #[test]
    fn fractional_quantity_counts() {
        assert!(position("0.5", "75.25").counts_toward_weights());
    }
}
