use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::AnalysisReport;
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_analysis))
}

pub async fn get_analysis(
    State(state): State<AppState>,
) -> Result<Json<AnalysisReport>, AppError> {
    info!("GET /analysis - Running portfolio analysis");
    let report = services::dashboard_service::run_portfolio_analysis(
        state.broker.as_ref(),
        state.sectors.as_ref(),
        state.scoring.as_ref(),
        state.narrator.as_ref(),
        &state.thresholds,
    )
    .await
    .map_err(|e| {
        error!("Portfolio analysis failed: {}", e);
        e
    })?;
    Ok(Json(report))
}
