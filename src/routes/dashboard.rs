use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::DashboardView;
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_dashboard))
}

pub async fn get_dashboard(
    State(state): State<AppState>,
) -> Result<Json<DashboardView>, AppError> {
    info!("GET /dashboard - Building dashboard view");
    let view = services::dashboard_service::build_dashboard(
        state.broker.as_ref(),
        state.scoring.as_ref(),
    )
    .await
    .map_err(|e| {
        error!("Failed to build dashboard: {}", e);
        e
    })?;
    Ok(Json(view))
}
