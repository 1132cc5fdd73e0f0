use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::Position;
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_positions))
}

pub async fn list_positions(
    State(state): State<AppState>,
) -> Result<Json<Vec<Position>>, AppError> {
    info!("GET /positions - Listing normalized positions");
    let records = state.broker.get_positions().await.map_err(|e| {
        error!("Failed to fetch positions: {}", e);
        AppError::from(e)
    })?;
    Ok(Json(services::position_service::normalize_positions(
        records,
    )))
}
