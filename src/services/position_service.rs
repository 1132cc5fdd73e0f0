use std::collections::HashMap;
use std::str::FromStr;

use bigdecimal::{BigDecimal, Zero};
use serde_json::Value;
use tracing::{debug, warn};

use crate::external::sectors::SectorProvider;
use crate::models::{Position, UNKNOWN_SECTOR};

/// Turns raw broker position records into normalized positions. One bad
/// record or field never aborts the batch: records without a symbol are
/// dropped, unparseable numbers fall back to zero, and negative market
/// values clamp to zero. Everything dropped or defaulted gets a warning.
pub fn normalize_positions(records: Vec<Value>) -> Vec<Position> {
    let mut positions = Vec::with_capacity(records.len());

    for record in records {
        if !record.is_object() {
            warn!("Skipping non-object position record: {}", record);
            continue;
        }

        let Some(symbol) = field_text(&record, "symbol").filter(|s| !s.trim().is_empty())
        else {
            warn!("Skipping position record without symbol: {}", record);
            continue;
        };
        let symbol = symbol.trim().to_string();

        let quantity = field_decimal(&record, "qty", &symbol);
        let mut market_value = field_decimal(&record, "market_value", &symbol);
        if market_value < BigDecimal::zero() {
            warn!(
                "Clamping negative market value for {}: {}",
                symbol, market_value
            );
            market_value = BigDecimal::zero();
        }

        positions.push(Position {
            symbol,
            quantity,
            market_value,
            unrealized_pnl: field_decimal(&record, "unrealized_pl", ""),
            sector: UNKNOWN_SECTOR.to_string(),
            volatility: None,
        });
    }

    positions
}

/// Fills in sectors from the metadata provider, one concurrent lookup per
/// distinct symbol. Positions whose lookup failed or came back empty keep
/// `"Unknown"`; the returned list names those symbols so the caller can
/// mark the stage degraded. Never errors.
pub async fn enrich_sectors(
    sectors: &dyn SectorProvider,
    positions: &mut [Position],
) -> Vec<String> {
    let mut symbols: Vec<String> = Vec::new();
    for p in positions.iter() {
        if !symbols.contains(&p.symbol) {
            symbols.push(p.symbol.clone());
        }
    }

    let lookups: Vec<_> = symbols
        .into_iter()
        .map(|symbol| async move {
            let result = sectors.get_sector(&symbol).await;
            (symbol, result)
        })
        .collect();

    let mut resolved: HashMap<String, String> = HashMap::new();
    let mut failed: Vec<String> = Vec::new();

    for (symbol, result) in futures::future::join_all(lookups).await {
        match result {
            Ok(Some(sector)) => {
                resolved.insert(symbol, sector);
            }
            Ok(None) => {
                debug!("No sector known for {}", symbol);
                failed.push(symbol);
            }
            Err(e) => {
                warn!("Sector lookup failed for {}: {}", symbol, e);
                failed.push(symbol);
            }
        }
    }

    for p in positions.iter_mut() {
        if let Some(sector) = resolved.get(&p.symbol) {
            p.sector = sector.clone();
        }
    }

    failed
}

fn field_text(record: &Value, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn field_decimal(record: &Value, key: &str, symbol: &str) -> BigDecimal {
    let Some(raw) = field_text(record, key) else {
        return BigDecimal::zero();
    };

    match BigDecimal::from_str(raw.trim()) {
        Ok(value) => value,
        Err(_) => {
            warn!("Unparseable {} for {:?}: {:?}, using 0", key, symbol, raw);
            BigDecimal::zero()
        }
    }
}
