use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::AccountSummary;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_account))
}

pub async fn get_account(
    State(state): State<AppState>,
) -> Result<Json<AccountSummary>, AppError> {
    info!("GET /account - Fetching account summary");
    let account = state.broker.get_account().await.map_err(|e| {
        error!("Failed to fetch account: {}", e);
        AppError::from(e)
    })?;
    Ok(Json(account))
}
