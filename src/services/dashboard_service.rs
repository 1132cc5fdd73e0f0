use bigdecimal::{BigDecimal, Zero};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::external::broker::BrokerApi;
use crate::external::ml_service::ScoringProvider;
use crate::external::narrative::NarrativeGenerator;
use crate::external::sectors::SectorProvider;
use crate::models::{
    AccountSummary, AnalysisReport, AnalysisThresholds, DashboardView, MarketIndicators,
    PerformanceSeries, Position,
};
use crate::services::advisor_service::explain_portfolio;
use crate::services::analysis_service::analyse;
use crate::services::position_service::{enrich_sectors, normalize_positions};
use crate::services::scoring_service::{score_risk_stage, score_trends_stage, select_trend_symbols};

const HISTORY_PERIOD: &str = "1M";
const HISTORY_TIMEFRAME: &str = "1D";

/// The full analysis pipeline. Loading the account/position snapshot is the
/// only fatal step; every stage after it degrades in place and leaves a note
/// in `degraded_stages`, so the report always renders with whatever could be
/// gathered.
pub async fn run_portfolio_analysis(
    broker: &dyn BrokerApi,
    sectors: &dyn SectorProvider,
    scoring: &dyn ScoringProvider,
    narrator: &dyn NarrativeGenerator,
    thresholds: &AnalysisThresholds,
) -> Result<AnalysisReport, AppError> {
    info!("Running portfolio analysis");

    let (account, records) = tokio::join!(broker.get_account(), broker.get_positions());
    let account = account?;
    let records = records?;

    let mut degraded: Vec<String> = Vec::new();
    let mut positions = normalize_positions(records);

    let failed = enrich_sectors(sectors, &mut positions).await;
    if !failed.is_empty() {
        degraded.push(format!(
            "sector enrichment: {} lookup(s) failed or returned no sector ({})",
            failed.len(),
            failed.join(", ")
        ));
    }

    let metrics = analyse(&positions, thresholds);

    let symbols = select_trend_symbols(&positions);
    let (risk_outcome, trend_outcome) = tokio::join!(
        score_risk_stage(scoring, &account.cash, &positions),
        score_trends_stage(scoring, &symbols)
    );
    let risk = risk_outcome.collect_into(&mut degraded);
    let trend_scores = trend_outcome.collect_into(&mut degraded);

    let narrative = explain_portfolio(narrator, &metrics, &positions)
        .await
        .collect_into(&mut degraded);

    let performance = match broker
        .get_portfolio_history(HISTORY_PERIOD, HISTORY_TIMEFRAME)
        .await
    {
        Ok(series) => series,
        Err(e) => {
            warn!("Portfolio history unavailable: {}", e);
            degraded.push(format!("performance history: {}", e));
            PerformanceSeries::empty()
        }
    };

    info!(
        "📊 Analysis assembled: {} position(s), {} degraded stage(s)",
        positions.len(),
        degraded.len()
    );

    Ok(AnalysisReport {
        metrics,
        risk_score: risk,
        trend_scores,
        narrative,
        positions,
        performance,
        degraded_stages: degraded,
    })
}

/// Everything on the landing page in one round trip. Only the account lookup
/// is fatal; orders, fills, market indicators and both scoring calls degrade
/// independently.
pub async fn build_dashboard(
    broker: &dyn BrokerApi,
    scoring: &dyn ScoringProvider,
) -> Result<DashboardView, AppError> {
    info!("Building dashboard view");

    let account = broker.get_account().await?;

    let mut degraded: Vec<String> = Vec::new();

    let positions = match broker.get_positions().await {
        Ok(records) => normalize_positions(records),
        Err(e) => {
            warn!("Positions unavailable for dashboard: {}", e);
            degraded.push(format!("positions: {}", e));
            Vec::new()
        }
    };

    let (orders, fills, nasdaq, dow) = tokio::join!(
        broker.get_open_orders(),
        broker.get_recent_fills(10),
        broker.get_last_trade("QQQ"),
        broker.get_last_trade("DIA"),
    );

    let open_orders = match orders {
        Ok(orders) => orders,
        Err(e) => {
            warn!("Open orders unavailable: {}", e);
            degraded.push(format!("open orders: {}", e));
            Vec::new()
        }
    };

    let recent_fills = match fills {
        Ok(fills) => fills,
        Err(e) => {
            warn!("Recent fills unavailable: {}", e);
            degraded.push(format!("recent fills: {}", e));
            Vec::new()
        }
    };

    let markets = MarketIndicators {
        nasdaq: match nasdaq {
            Ok(trade) => Some(trade),
            Err(e) => {
                warn!("Nasdaq indicator unavailable: {}", e);
                degraded.push(format!("nasdaq indicator: {}", e));
                None
            }
        },
        dow: match dow {
            Ok(trade) => Some(trade),
            Err(e) => {
                warn!("Dow indicator unavailable: {}", e);
                degraded.push(format!("dow indicator: {}", e));
                None
            }
        },
    };

    let symbols = select_trend_symbols(&positions);
    let (risk_outcome, trend_outcome) = tokio::join!(
        score_risk_stage(scoring, &account.cash, &positions),
        score_trends_stage(scoring, &symbols)
    );
    let risk = risk_outcome.collect_into(&mut degraded);
    let trend_scores = trend_outcome.collect_into(&mut degraded);

    let portfolio_value = effective_portfolio_value(&account, &positions);

    Ok(DashboardView {
        account,
        portfolio_value,
        open_orders,
        recent_fills,
        markets,
        risk_score: risk,
        trend_scores,
        degraded_stages: degraded,
    })
}

/// The broker occasionally reports a zero or negative portfolio value right
/// after market open; reconstruct it as cash plus position values then.
fn effective_portfolio_value(account: &AccountSummary, positions: &[Position]) -> BigDecimal {
    if account.portfolio_value > BigDecimal::zero() {
        return account.portfolio_value.clone();
    }

    positions
        .iter()
        .fold(account.cash.clone(), |acc, p| acc + &p.market_value)
}
